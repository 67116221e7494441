use anyhow::Context;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use quiz_wizard::{
    config::Config,
    db::SessionStore,
    handle_key, logger,
    worker::{spawn_generation, spawn_health_check},
    HttpQuizGenerator, KeyAction, QuizController, QuizGenerator,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logger::init(&config.log_file, config.log_level)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    log::info!("Starting quiz-wizard against {}", config.server_url);

    let store = SessionStore::open(&config.db_path())
        .with_context(|| format!("cannot open database {}", config.db_path().display()))?;
    let generator: Arc<dyn QuizGenerator> =
        Arc::new(HttpQuizGenerator::new(&config.server_url, config.http_timeout));

    let (tx, rx) = mpsc::unbounded_channel();
    let mut controller = QuizController::new(store, tx.clone(), &config);
    controller.restore();
    spawn_health_check(Arc::clone(&generator), tx.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut controller, generator, tx, rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    log::info!("Shutting down");
    result
}

async fn run(
    terminal: &mut Tui,
    controller: &mut QuizController,
    generator: Arc<dyn QuizGenerator>,
    tx: mpsc::UnboundedSender<quiz_wizard::AppEvent>,
    mut rx: mpsc::UnboundedReceiver<quiz_wizard::AppEvent>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| quiz_wizard::draw(f, controller))?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    break;
                };
                if let Event::Key(key) = event?
                    && key.kind == KeyEventKind::Press
                {
                    match handle_key(controller, key) {
                        KeyAction::Quit => break,
                        KeyAction::Generate(ticket) => {
                            spawn_generation(Arc::clone(&generator), ticket, tx.clone());
                        }
                        KeyAction::None => {}
                    }
                }
            }
            Some(app_event) = rx.recv() => {
                controller.handle_event(app_event);
            }
        }
    }

    Ok(())
}
