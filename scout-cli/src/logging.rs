//! Log setup. Logs go to standard error so stdout carries only the answer.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initialize logging with the given verbosity level.
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "scout={level},scout_cli={level},city_guide={level},research={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}
