use catswitch::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    registry::Registry,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    TICK_RATE_MS,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// category switch task: how much slower are you when the rule changes?
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal category switch task. Words are judged by a rule that changes unpredictably; the difference in speed and accuracy between switch and stay trials is your switch cost."
)]
pub struct Cli {
    /// number of trials in the main test
    #[clap(short = 't', long)]
    trials: Option<usize>,

    /// probability that the rule changes between two consecutive trials
    #[clap(short = 'p', long)]
    switch_probability: Option<f64>,

    /// pause in milliseconds between an answer and the next trial
    #[clap(short = 'd', long)]
    delay_ms: Option<u64>,

    /// seed for a reproducible trial sequence
    #[clap(long)]
    seed: Option<u64>,

    /// write the trial log of the main test to this CSV file
    #[clap(short = 'e', long)]
    export: Option<PathBuf>,

    /// go straight to the main test
    #[clap(long)]
    no_practice: bool,

    /// do not announce rule changes on switch trials
    #[clap(long)]
    no_cue: bool,

    /// never show a word twice; fails when there are more trials than words
    #[clap(long)]
    strict_words: bool,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// debug level logging to the log file
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    /// Overlay command line flags on the stored configuration
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(trials) = self.trials {
            config.trial_count = trials;
        }
        if let Some(p) = self.switch_probability {
            config.switch_probability = p;
        }
        if let Some(delay) = self.delay_ms {
            config.feedback_delay_ms = delay;
        }
        if self.no_practice {
            config.skip_practice = true;
        }
        if self.no_cue {
            config.show_switch_cue = false;
        }
        if self.strict_words {
            config.allow_word_repeats = false;
        }
        config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Log to a file; stdout is owned by the terminal UI
fn init_tracing(verbose: bool) {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    let registry = Arc::new(Registry::builtin()?);

    if let Err(e) = config.validate(registry.words().len()) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }

    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config, registry, cli.rng()).with_export(cli.export.clone());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now())?,
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now())? == Control::Quit {
                    break;
                }
                true
            }
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
