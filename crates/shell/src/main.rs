use clap::Parser;
use hakwon_client::{ClientConfig, HttpRemoteStore, MemoryStore};
use hakwon_history::{HistoryConfig, HistoryManager, Notifier};
use hakwon_shell::{Cli, Outcome, Session};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROMPT: &str = "hakwon> ";

/// Starts the console.
///
/// The line editor blocks the main thread; each parsed line is run to
/// completion on the tokio runtime before the next prompt.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hakwon_shell=info,hakwon_history=info,hakwon_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = tokio::runtime::Runtime::new()?;

    let notifier = Notifier::default();
    let history = HistoryManager::new(HistoryConfig::from_env()?).with_notifier(notifier.clone());

    let mut session = if cli.offline {
        tracing::info!("Using in-memory store");
        Session::new(MemoryStore::new(), history)
    } else {
        let mut config = ClientConfig::from_env()?;
        cli.apply(&mut config);
        tracing::info!(
            base_url = %config.base_url,
            delete_mode = ?config.delete_mode,
            "Using remote store",
        );
        Session::new(HttpRemoteStore::new(&config)?, history)
    };

    let mut notifications = notifier.subscribe();
    runtime.spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            eprintln!("[{}] {}", notification.title, notification.description);
        }
    });

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }

        match runtime.block_on(session.handle_line(&line)) {
            Ok(Outcome::Continue(output)) if output.is_empty() => {}
            Ok(Outcome::Continue(output)) => println!("{output}"),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    tracing::info!(commands = session.history().len(), "Session ended");
    Ok(())
}
