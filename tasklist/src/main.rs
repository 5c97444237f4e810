//! Tasklist terminal binary
//!
//! Runs the to-do screen over stdin/stdout. Type `help` for commands.

use tasklist::cli::{Reply, Session};
use tasklist::{Config, ScreenReducer, ScreenState, TaskEnvironment};
use tasklist_runtime::Store;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // Initialize tracing (stderr, so it does not interleave with the screen)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tasklist::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(?config, "Starting tasklist");

    let store = Store::with_config(
        ScreenState::new(),
        ScreenReducer::new(),
        TaskEnvironment::live(),
        config.store_config(),
    );
    let mut session = Session::new(store, config.header_title.clone());

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(session.render().await.as_bytes()).await?;
    stdout.write_all(b"Type `help` for commands.\n").await?;

    loop {
        stdout.write_all(session.prompt().await.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match session.handle_line(&line).await {
            Ok(Reply::Render) => session.render().await,
            Ok(Reply::Message(message)) => format!("{message}\n"),
            Ok(Reply::Quit) => break,
            Err(error) => {
                tracing::error!(%error, "Gesture rejected");
                format!("Error: {error}\n")
            },
        };
        stdout.write_all(output.as_bytes()).await?;
    }

    tracing::info!("Exiting tasklist");
    Ok(())
}
