//! Request host for the IPP tracker.
//!
//! Serves length-prefixed JSON requests on stdin and writes responses to stdout. Logs go
//! to stderr, filtered by `RUST_LOG`.

use ipp_lib::{config::Config, host::RequestHost, init};
use std::io;
use std::process::ExitCode;

/// Install the stderr subscriber. Returns false when a global logger was already set, in
/// which case records keep flowing to that one.
fn init_logging() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
    match installed {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Keeping the existing logger: {e}");
            false
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Initialization error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let app = match init(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let host = RequestHost::new(app);
    match host.run(&mut io::stdin().lock(), &mut io::stdout().lock()) {
        // EOF is how the client closes the session
        Err(e) if e.kind() != io::ErrorKind::UnexpectedEof => {
            log::error!("Request host error: {e}");
            ExitCode::FAILURE
        }
        Err(_) | Ok(()) => ExitCode::SUCCESS,
    }
}
