//! Runs the architecture council once and prints the transcript.
//!
//! Configuration comes from the environment (see [`archcouncil::config`]):
//!
//! ```text
//! export OPENAI_API_KEY=...
//! export OPENAI_MODEL=gpt-4o-mini
//! cargo run
//! ```

use archcouncil::{council, transcript, CouncilConfig, EventHandler, LoggingEventHandler};
use std::io;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    archcouncil::init_logger();

    let config = match CouncilConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("archcouncil: {}", err);
            process::exit(1);
        }
    };
    log::debug!("loaded {:?}", config);

    let client = council::client_from_config(&config);
    let handler: Arc<dyn EventHandler> = Arc::new(LoggingEventHandler);
    let mut chat = match council::build_council(&config, client, Some(handler)) {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("archcouncil: {}", err);
            process::exit(1);
        }
    };

    let result = chat.run(council::task_for(&config)).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = transcript::write_transcript(&mut out, chat.history()) {
        eprintln!("archcouncil: failed to write transcript: {}", err);
        process::exit(1);
    }

    match result {
        Ok(response) => log::info!(
            "{} turns, complete: {}, {} tokens",
            response.rounds,
            response.is_complete,
            response.total_tokens_used
        ),
        Err(err) => {
            eprintln!("archcouncil: {}", err);
            process::exit(1);
        }
    }
}
