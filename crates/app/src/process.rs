use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::state::AppState;

/// Pick the default log level.
///
/// Priority: explicit `--log-level` flag > config file `log_level` > info.
/// `RUST_LOG` still overrides the result through the env filter.
pub fn resolve_log_level(explicit: Option<Level>, config_path: Option<PathBuf>) -> Level {
    if let Some(level) = explicit {
        return level;
    }
    AppState::load(config_path)
        .ok()
        .and_then(|state| state.config.log_level())
        .unwrap_or(Level::INFO)
}

/// Initialize logging to stderr and install the panic logger.
/// The returned guard must be kept alive until the program exits.
pub fn init_logging(level: Level) -> WorkerGuard {
    // stdout carries command output, so logs go to stderr
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    register_panic_logger();
    report_build_info();

    guard
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}

pub fn report_build_info() {
    let build = common::prelude::build_info();

    tracing::debug!(
        build_profile = ?build.build_profile,
        features = ?build.build_features,
        version = ?build.version,
        "algotric starting up"
    );
}
