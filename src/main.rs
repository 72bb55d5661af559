//! taskbrew - a command console for programs, projects, tasks and subtasks.

use std::sync::Arc;

use taskbrew::cli::Cli;
use taskbrew::commands::output::{ChannelSink, StdoutSink};
use taskbrew::config::Config;
use taskbrew::console::{self, script};
use taskbrew::error::Result;
use taskbrew::interpreter::Interpreter;
use taskbrew::logging;
use taskbrew::session::Session;
use taskbrew::store::{LogNotifier, SqliteStore};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    let headless = cli.is_headless();
    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        // Console logs go to a file; show the failure on the terminal too.
        if !headless {
            eprintln!("{}: {}", e.category(), e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let store = Arc::new(open_store(&cli, &config).await?);
    let session = Session::with_context(
        config.context.program.clone(),
        config.context.project.clone(),
    );
    let prompt = config.console.prompt.clone();

    let result = if cli.is_headless() {
        let mut lines = cli.exec.clone();
        if let Some(path) = &cli.script {
            lines.extend(script::load_script(path)?);
        }

        let mut interpreter =
            Interpreter::new(store.clone(), Arc::new(LogNotifier), Box::new(StdoutSink))
                .with_session(session);
        script::ScriptRunner::new(&mut interpreter, Box::new(StdoutSink), prompt)
            .run(lines)
            .await;
        Ok(())
    } else {
        let (tx, rx) = mpsc::unbounded_channel();
        let interpreter = Interpreter::new(
            store.clone(),
            Arc::new(LogNotifier),
            Box::new(ChannelSink::new(tx)),
        )
        .with_session(session);
        console::run(interpreter, rx, &prompt).await
    };

    store.close().await;
    result
}

/// Opens the store named by `--memory`, `--db`, the config file, or the default path.
async fn open_store(cli: &Cli, config: &Config) -> Result<SqliteStore> {
    if cli.memory {
        info!("Using in-memory store");
        return SqliteStore::in_memory().await;
    }

    let path = match cli.db.clone().or_else(|| config.store.path.clone()) {
        Some(path) => path,
        None => SqliteStore::default_path()?,
    };
    info!("Opening record store at {}", path.display());
    SqliteStore::open(&path).await
}
