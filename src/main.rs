use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flowtimer::{
    app::{App, Control},
    app_dirs::AppDirs,
    chime::{Notifier, TerminalBell},
    config::{Config, ConfigStore, FileConfigStore},
    durations::SessionLength,
    logging::init_file_logger,
    runtime::{ChannelSource, FlowEvent, Runner},
    view::Redraw,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// focused pomodoro tui with a productivity curve, break suggestions and a tiny task list
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal pomodoro timer: pick a session length, start the countdown, choose a suggested break and tick off tasks while a synthetic productivity curve tracks your progress."
)]
pub struct Cli {
    /// session length in minutes: 5, 10, 15, 30, 60, 90 or 120
    #[clap(short = 'd', long)]
    duration: Option<SessionLength>,

    /// task to start with; repeat for more (replaces the configured tasks)
    #[clap(short = 't', long = "task")]
    tasks: Vec<String>,

    /// do not ring the terminal bell when a session completes
    #[clap(long)]
    no_bell: bool,

    /// frame interval of the render loop in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings to the config file and exit
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the stored config.
    fn merge(&self, mut config: Config) -> Config {
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if !self.tasks.is_empty() {
            config.tasks = self.tasks.clone();
        }
        if self.no_bell {
            config.bell = false;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn notifier_for(config: &Config) -> Notifier {
    if config.bell {
        Notifier::new(Box::new(TerminalBell::stdout()))
    } else {
        Notifier::silent()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = init_file_logger(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let store = cli.config_store();
    let config = cli.merge(store.load());

    if cli.save_config {
        store.save(&config)?;
        println!("saved settings to {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    log::info!(
        "starting with {} sessions, {} tasks, bell {}",
        config.duration,
        config.tasks.len(),
        if config.bell { "on" } else { "off" }
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::from_config(&config, notifier_for(&config));
    let result = start_tui(&mut terminal, &mut app, config.tick_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!(
        "exiting after {} completed sessions",
        app.timer.sessions_completed
    );
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::with_frame_millis(ChannelSource::terminal(), tick_ms);

    terminal.draw(|f| ui(app, f))?;

    loop {
        let redraw = match runner.step() {
            FlowEvent::Frame => {
                let size = terminal.size().unwrap_or_default();
                app.on_frame(Instant::now(), size.width, size.height)
            }
            FlowEvent::Resize => Redraw::Full,
            FlowEvent::Key(key) => match app.on_key(key, Instant::now()) {
                Control::Quit => break,
                Control::Continue(redraw) => redraw,
            },
            FlowEvent::Closed => {
                log::warn!("input closed, shutting down");
                break;
            }
        };

        if redraw != Redraw::None {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
