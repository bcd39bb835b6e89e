//! src/main.rs
//! Gugul search TUI: terminal setup, the event loop and shutdown.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{
    signal,
    sync::{Notify, mpsc},
};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use gugul_core::{
    Logger,
    config::Config,
    controller::{
        actions::Action,
        event_loop::{EventLoop, TaskResult},
        navigator::OpenNavigator,
        search_controller::{ControllerOptions, SearchController},
    },
    model::location::{Location, LocationSync},
    tasks::search_task::backend_from_config,
    util::debounce::Throttler,
    view::ui::UIRenderer,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

const APP_TITLE: &str = "Gugul";

/// Debounced, keyboard-driven search in the terminal.
#[derive(Debug, Parser)]
#[command(name = "gugul", version, about)]
struct Cli {
    /// Initial query
    query: Option<String>,

    /// Initial location such as "/?query=cats"; wins over QUERY
    #[arg(long)]
    url: Option<String>,

    /// Config file instead of the platform default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn initial_location(&self) -> Result<Location> {
        match (&self.url, &self.query) {
            (Some(url), _) => Location::parse(url).context("Invalid --url"),
            (None, Some(query)) => Ok(Location::for_query(query)),
            (None, None) => Ok(Location::default()),
        }
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_panic_handler();

    let app = App::new(&cli)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

/// Mirrors the current location's query in the terminal title.
#[derive(Debug, Default)]
struct TerminalTitle {
    current: Option<Location>,
}

impl TerminalTitle {
    fn title_for(location: &Location) -> String {
        location
            .query()
            .map_or_else(|| APP_TITLE.to_owned(), |q| format!("{q} · {APP_TITLE}"))
    }

    /// Replace the current location. Returns the new title if it changed.
    fn update(&mut self, location: &Location) -> Option<String> {
        if self.current.as_ref() == Some(location) {
            return None;
        }
        self.current = Some(location.clone());
        Some(Self::title_for(location))
    }
}

impl LocationSync for TerminalTitle {
    fn push(&mut self, location: &Location) {
        debug!("Location -> {}", location);
        let Some(title) = self.update(location) else {
            return;
        };
        if let Err(e) = execute!(io::stdout(), SetTitle(title)) {
            warn!("Failed to set terminal title: {}", e);
        }
    }
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop,
    controller: SearchController,
    ui_renderer: UIRenderer,
    initial: Location,
    shutdown: Arc<Notify>,
    metrics_log: Throttler,
    _log_guard: WorkerGuard,
}

impl App {
    async fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::load().await.unwrap_or_else(|e| {
                eprintln!("Failed to load config, using defaults: {e}");
                Config::default()
            }),
        };

        let log_dir = config.log_dir().context("No log directory")?;
        let log_guard = Logger::init_tracing(&log_dir, &config.logging.level)
            .context("Failed to initialize logging")?;
        info!("Starting Gugul, logging to {}", log_dir.display());

        let initial = cli.initial_location()?;
        let backend = backend_from_config(&config).context("Failed to create search backend")?;

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();
        let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();

        let controller = SearchController::new(
            ControllerOptions::from(&config),
            backend,
            action_tx,
            task_tx,
            Box::new(TerminalTitle {
                current: Some(initial.clone()),
            }),
            Box::new(OpenNavigator),
        );

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        execute!(io::stdout(), SetTitle(TerminalTitle::title_for(&initial)))
            .context("Failed to set terminal title")?;

        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            event_loop: EventLoop::new(task_rx, action_rx),
            controller,
            ui_renderer: UIRenderer::new(config.theme),
            initial,
            shutdown: Arc::new(Notify::new()),
            metrics_log: Throttler::new(Duration::from_secs(30)),
            _log_guard: log_guard,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        self.controller.mount(&self.initial);
        info!("Starting event loop");

        loop {
            self.render()?;

            if self.controller.should_quit() {
                info!("Quit requested by controller");
                break;
            }

            tokio::select! {
                () = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                action = self.event_loop.next_action() => {
                    let Some(action) = action else {
                        info!("Event sources closed");
                        break;
                    };
                    self.controller.dispatch(action);
                }
            }

            if self.metrics_log.should_trigger() {
                self.log_metrics();
            }
        }

        self.controller.teardown();
        self.log_metrics();
        info!("Event loop terminated cleanly");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if !self.controller.needs_redraw() {
            return Ok(());
        }

        let mut layout = None;
        {
            let snap = self.controller.snapshot();
            let renderer = &mut self.ui_renderer;
            self.terminal
                .draw(|frame: &mut Frame<'_>| {
                    layout = Some(renderer.render(frame, &snap));
                })
                .context("Failed to draw terminal")?;
        }

        self.controller.take_redraw();
        if let Some(layout) = layout {
            self.controller.after_render(layout, Instant::now());
        }
        Ok(())
    }

    fn log_metrics(&self) {
        let stats = self.ui_renderer.stats();
        info!(
            "Performance: events: {}, frames: {}, avg frame: {:.2}ms, slow frames: {}",
            self.event_loop.event_count(),
            stats.frames,
            stats.avg_ms(),
            stats.slow
        );
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Failed to install signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_wins_over_positional_query() {
        let cli = Cli::parse_from(["gugul", "dogs", "--url", "/?query=cats"]);
        assert_eq!(cli.initial_location().unwrap().query(), Some("cats"));

        let cli = Cli::parse_from(["gugul", "dogs"]);
        assert_eq!(cli.initial_location().unwrap().query(), Some("dogs"));

        let cli = Cli::parse_from(["gugul"]);
        assert_eq!(cli.initial_location().unwrap(), Location::default());
    }

    #[test]
    fn test_title_follows_query() {
        assert_eq!(TerminalTitle::title_for(&Location::default()), "Gugul");
        assert_eq!(
            TerminalTitle::title_for(&Location::for_query("rust")),
            "rust · Gugul"
        );
    }

    #[test]
    fn test_title_keeps_only_current_location() {
        let mut title = TerminalTitle::default();

        assert_eq!(title.update(&Location::for_query("a")).as_deref(), Some("a · Gugul"));
        assert_eq!(title.update(&Location::for_query("a")), None);
        assert_eq!(title.update(&Location::default()).as_deref(), Some("Gugul"));
        assert_eq!(title.current, Some(Location::default()));
    }
}
