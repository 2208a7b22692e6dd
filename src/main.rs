mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;

use typtr::config::Config;
use typtr::session::cancel::CancelToken;
use typtr::session::drill::{DrillPhase, DrillState};
use typtr::session::input;
use typtr::session::result::DrillResult;
use typtr::store::csv_export;
use typtr::store::stats_file::StatsStore;
use typtr::text::layout::TextLayout;

use app::{App, RoundWords};
use event::{AppEvent, EventHandler};
use ui::theme::Theme;

const LOG_FILE_NAME: &str = "typtr.log";

#[derive(Parser)]
#[command(name = "typtr", version, about = "Terminal typing drill that adapts to your weakest keys")]
struct Cli {
    #[arg(short, long, help = "Number of words per round")]
    words: Option<usize>,

    #[arg(long, help = "Word list file, one word per line")]
    word_list: Option<PathBuf>,

    #[arg(long, help = "Directory holding stats, history and the log")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the stats tables as CSV files
    ExportCsv {
        /// Output directory (current directory when omitted)
        dir: Option<PathBuf>,
    },
}

enum RoundOutcome {
    Completed(DrillResult),
    Canceled,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(words) = cli.words {
        config.words_per_round = words;
    }
    if let Some(path) = cli.word_list {
        config.word_list = Some(path);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    config.validate();

    init_logging(&config)?;

    match cli.command {
        Some(Command::ExportCsv { dir }) => export_csv(&config, dir),
        None => run_tui(config),
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory '{}'", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();
    Ok(())
}

fn export_csv(config: &Config, dir: Option<PathBuf>) -> Result<()> {
    let store = StatsStore::with_base_dir(&config.data_dir())?;
    let model = store.load()?;
    let out_dir = dir.unwrap_or_else(|| PathBuf::from("."));
    for path in csv_export::export_all(&model, &out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_tui(config: Config) -> Result<()> {
    let cancel = CancelToken::new();
    let mut app = App::new(config, cancel.clone())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100), cancel);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let theme = Theme::default();
    loop {
        let round = app.prepare_round()?;
        match run_round(terminal, app, &round, events, &theme)? {
            RoundOutcome::Completed(result) => app.finish_round(result)?,
            RoundOutcome::Canceled => {
                tracing::info!("round canceled, exiting");
                return Ok(());
            }
        }
    }
}

/// Drives one round from the start screen to completion or cancellation.
/// The layout is rebuilt on resize until typing starts.
fn run_round(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &App,
    round: &RoundWords,
    events: &EventHandler,
    theme: &Theme,
) -> Result<RoundOutcome> {
    let mut size = terminal.size()?;

    'layout: loop {
        let layout = TextLayout::new(
            &round.words,
            &round.indices,
            size.height,
            size.width,
            app.config.horizontal_margin,
        )?;
        let mut drill = DrillState::new(&layout);

        loop {
            if input::poll_cancel(&mut drill, &app.cancel) {
                return Ok(RoundOutcome::Canceled);
            }

            terminal.draw(|frame| ui::draw(frame, app, &drill, theme))?;

            match events.next()? {
                AppEvent::Key(key) => {
                    if let KeyCode::Char(ch) = key.code {
                        if !key.modifiers.contains(KeyModifiers::CONTROL) {
                            input::process_char(&mut drill, ch);
                        }
                    }
                }
                AppEvent::Resize(width, height) if drill.phase == DrillPhase::AwaitingStart => {
                    size = Size::new(width, height);
                    continue 'layout;
                }
                AppEvent::Resize(..) | AppEvent::Tick => {}
            }

            if let Some(result) = DrillResult::from_drill(&drill) {
                return Ok(RoundOutcome::Completed(result));
            }
        }
    }
}
