//! Application entry orchestration for the chit CLI.

use crate::cli::Args;
use chit::board;
use chit::config::{load_config, Config};
use chit::error::ResolveError;
use chit::resolve::{resolve, Resolution};
use chit::session::{Session, SessionOptions};
use chit::spec::ThreadSpec;
use chit::tui::settings::{LABEL_ERROR, LABEL_WARNING};
use chit::tui::{Console, PipedConsole, TerminalConsole};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

/// Env var holding the log filter directive.
const LOG_ENV: &str = "CHIT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the CLI and return the process exit code.
pub(crate) async fn run(args: Args) -> i32 {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{LABEL_ERROR} {e}");
            return 1;
        }
    };
    if args.no_color {
        config.display.color = false;
    }
    init_logging(config.display.color);

    let spec = match ThreadSpec::parse(&args.spec) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{LABEL_ERROR} {e}");
            return 1;
        }
    };
    let client = board::connect(&spec, config.http_timeout());
    let resolution = match resolve(&spec, client.as_ref()).await {
        Ok(resolution) => resolution,
        Err(ResolveError::NotFound) => {
            eprintln!("No such thread");
            return 1;
        }
        Err(e) => {
            eprintln!("{LABEL_ERROR} {e}");
            return 1;
        }
    };
    tracing::debug!(
        candidates = resolution.candidates.len(),
        thread = resolution.first().id,
        "resolved thread"
    );

    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let color = config.display.color && io::stdout().is_terminal();
    let history = args.history.clone().or_else(|| config.history_file());
    let options = session_options(&config, color);

    let result = if interactive {
        let mut console = TerminalConsole::new(color, history);
        if let Err(e) = console.load_history() {
            eprintln!("{LABEL_WARNING} could not load history: {e}");
        }
        attach(&args.spec, client.as_ref(), &mut console, resolution, options).await
    } else {
        let mut console = PipedConsole::new(color, history);
        if let Err(e) = console.load_history() {
            eprintln!("{LABEL_WARNING} could not load history: {e}");
        }
        attach(&args.spec, client.as_ref(), &mut console, resolution, options).await
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{LABEL_ERROR} {e}");
            1
        }
    }
}

async fn attach(
    spec_text: &str,
    client: &dyn board::BoardClient,
    console: &mut dyn Console,
    resolution: Resolution,
    options: SessionOptions,
) -> Result<(), chit::error::SessionError> {
    let mut session = Session::new(spec_text, client, console, resolution, options);
    session.run().await
}

fn session_options(config: &Config, color: bool) -> SessionOptions {
    SessionOptions {
        poll_interval: config.poll_interval(),
        name: config.post.name.clone(),
        mail: config.post.mail.clone(),
        color,
    }
}

/// Install the stderr `tracing` subscriber, filtered by `CHIT_LOG`.
fn init_logging(color: bool) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .try_init();
}
