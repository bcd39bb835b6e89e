//! Scroll position of the result area and the smooth scroll that keeps the
//! selected row on screen.

use std::time::{Duration, Instant};

use tracing::trace;

/// Geometry of one rendered row in content coordinates (lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowHandle {
    pub top: u16,
    pub height: u16,
    pub margin_bottom: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: u16,
    to: u16,
    start: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    fn offset_at(&self, now: Instant) -> (u16, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = ease_in_out_quad(t);
        let from = f32::from(self.from);
        let to = f32::from(self.to);
        let value = (to - from).mul_add(eased, from).round();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        (value.clamp(0.0, f32::from(u16::MAX)) as u16, false)
    }
}

fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        (4.0 - 2.0 * t).mul_add(t, -1.0)
    }
}

#[derive(Debug, Clone)]
pub struct ResultsViewport {
    offset: u16,
    height: u16,
    content_height: u16,
    duration: Duration,
    animation: Option<ScrollAnimation>,
    reveal_requested: bool,
}

impl ResultsViewport {
    pub const fn new(duration: Duration) -> Self {
        Self {
            offset: 0,
            height: 0,
            content_height: 0,
            duration,
            animation: None,
            reveal_requested: false,
        }
    }

    pub const fn offset(&self) -> u16 {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Back to the top, e.g. when a new result list replaces the old one.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.animation = None;
        self.reveal_requested = false;
    }

    /// Ask the next render to bring the selected row into view.
    pub fn request_reveal(&mut self) {
        self.reveal_requested = true;
    }

    pub fn take_reveal_request(&mut self) -> bool {
        std::mem::take(&mut self.reveal_requested)
    }

    /// Update the visible height and total content height for this frame.
    pub fn set_bounds(&mut self, height: u16, content_height: u16) {
        self.height = height;
        self.content_height = content_height;
        let max = self.max_offset();
        if self.offset > max {
            self.offset = max;
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }

    /// Offset that brings `row` into view, or `None` if it is fully visible.
    ///
    /// A row above the fold is aligned to the top edge. A row below it is
    /// aligned so its bottom margin touches the bottom edge.
    pub fn scroll_target(&self, row: RowHandle) -> Option<u16> {
        let viewport = i32::from(self.height);
        let rect_top = i32::from(row.top) - i32::from(self.offset);
        let rect_bottom = rect_top + i32::from(row.height);

        let is_after_top = rect_top >= 0;
        let is_before_bottom = rect_bottom - viewport <= 0;
        if is_after_top && is_before_bottom {
            return None;
        }

        let adjust = if is_after_top {
            i32::from(row.height) + i32::from(row.margin_bottom) - viewport
        } else {
            0
        };

        let target = (i32::from(row.top) + adjust).clamp(0, i32::from(self.max_offset()));
        u16::try_from(target).ok()
    }

    /// Start scrolling towards `row` if it is not fully visible.
    pub fn reveal(&mut self, row: RowHandle, now: Instant) -> bool {
        let Some(to) = self.scroll_target(row) else {
            return false;
        };
        if to == self.offset {
            return false;
        }

        trace!(from = self.offset, to, "scrolling selected row into view");
        self.animation = Some(ScrollAnimation {
            from: self.offset,
            to,
            start: now,
            duration: self.duration,
        });
        self.tick(now);
        true
    }

    /// Advance the animation. Returns true if the offset moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };

        let (offset, done) = anim.offset_at(now);
        if done {
            self.animation = None;
        }
        let moved = offset != self.offset;
        self.offset = offset;
        moved
    }
}

impl Default for ResultsViewport {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(offset: u16) -> ResultsViewport {
        let mut vp = ResultsViewport::new(Duration::from_millis(200));
        vp.set_bounds(20, 200);
        vp.offset = offset;
        vp
    }

    const ROW: RowHandle = RowHandle {
        top: 0,
        height: 4,
        margin_bottom: 1,
    };

    #[test]
    fn test_fully_visible_row_does_not_scroll() {
        let vp = viewport(10);
        let row = RowHandle { top: 12, ..ROW };
        assert_eq!(vp.scroll_target(row), None);

        // touching the bottom edge still counts as visible
        let row = RowHandle { top: 26, ..ROW };
        assert_eq!(vp.scroll_target(row), None);
    }

    #[test]
    fn test_row_above_fold_aligns_to_top() {
        let vp = viewport(10);
        let row = RowHandle { top: 8, ..ROW };
        assert_eq!(vp.scroll_target(row), Some(8));
    }

    #[test]
    fn test_row_below_fold_respects_bottom_margin() {
        let vp = viewport(0);
        let row = RowHandle { top: 20, ..ROW };
        // top + (height + margin - viewport) = 20 + (4 + 1 - 20)
        assert_eq!(vp.scroll_target(row), Some(5));
    }

    #[test]
    fn test_target_is_clamped_to_content() {
        let mut vp = ResultsViewport::new(Duration::ZERO);
        vp.set_bounds(20, 30);
        let row = RowHandle { top: 26, ..ROW };
        // 26 + 5 - 20 = 11, content only allows 10
        assert_eq!(vp.scroll_target(row), Some(10));
    }

    #[test]
    fn test_reveal_animates_then_settles() {
        let mut vp = viewport(0);
        let start = Instant::now();

        assert!(vp.reveal(RowHandle { top: 40, ..ROW }, start));
        assert!(vp.is_animating());
        assert_eq!(vp.offset(), 0);

        vp.tick(start + Duration::from_millis(100));
        let mid = vp.offset();
        assert!(mid > 0 && mid < 25, "mid offset {mid}");

        vp.tick(start + Duration::from_millis(250));
        assert_eq!(vp.offset(), 25);
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut vp = ResultsViewport::new(Duration::ZERO);
        vp.set_bounds(10, 100);
        assert!(vp.reveal(RowHandle { top: 50, ..ROW }, Instant::now()));
        assert_eq!(vp.offset(), 45);
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_reveal_request_is_taken_once() {
        let mut vp = ResultsViewport::default();
        vp.request_reveal();
        assert!(vp.take_reveal_request());
        assert!(!vp.take_reveal_request());
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = viewport(150);
        vp.set_bounds(20, 40);
        assert_eq!(vp.offset(), 20);
    }
}
