//! Opening a selected result's target.

use tracing::info;

use crate::error::AppError;

pub trait Navigator: Send {
    fn open(&mut self, target: &str) -> Result<(), AppError>;
}

/// Hands targets to the platform opener (browser, file manager).
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenNavigator;

impl Navigator for OpenNavigator {
    fn open(&mut self, target: &str) -> Result<(), AppError> {
        info!("Opening {}", target);
        open::that_detached(target).map_err(|e| AppError::Io(e).with_context(target))
    }
}
