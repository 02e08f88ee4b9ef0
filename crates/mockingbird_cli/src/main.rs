use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use mockingbird::{EnvConfig, ProcessTerminal, SessionController};
use mockingbird_cli::app;
use mockingbird_cli::logging::init_logging;
use mockingbird_cli::questions::QuestionPicker;
use mockingbird_cli::runtime::{HttpBackend, RuntimeController};

fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let config = EnvConfig::from_env().map_err(io::Error::other)?;
    init_logging(&config).map_err(io::Error::other)?;

    let (events, receiver) = mpsc::channel();
    let backend = Arc::new(HttpBackend::from_config(&config));
    let host = RuntimeController::new(backend, events.clone(), QuestionPicker::new())?;
    let controller = SessionController::new(config.session_options(), Instant::now());

    app::run(
        ProcessTerminal::new(),
        controller,
        host,
        events,
        receiver,
        &app::username(),
    )
}
