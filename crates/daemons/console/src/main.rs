#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

#[macro_use]
extern crate warden_result;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use warden_classifier::Classifier;
use warden_moderation::Dispatcher;
use warden_result::Result;

mod input;
mod platform;

use input::parse_line;
use platform::ConsolePlatform;

#[tokio::main]
async fn main() -> Result<()> {
    warden_config::setup_logging();
    warden_config::init().await;

    let fixture = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fixture.json".to_string());

    let platform = Arc::new(ConsolePlatform::from_fixture(&fixture).await?);
    let classifier = Arc::new(Classifier::from_config().await);
    let dispatcher = Dispatcher::from_config(platform, classifier).await?;

    info!("Loaded {fixture}, reading `sender dm|public|mod text` lines from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|error| {
        error!("Failed to read stdin: {error}");
        create_error!(InternalError)
    })? {
        let turn = match parse_line(&line) {
            Some(turn) => turn,
            None => {
                if !line.trim().is_empty() {
                    warn!("Ignoring malformed line {line:?}");
                }

                continue;
            }
        };

        for reply in dispatcher
            .handle_turn(turn.sender, turn.context, turn.text)
            .await
        {
            println!("-> {reply}");
        }
    }

    Ok(())
}
