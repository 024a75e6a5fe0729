//! Logging bootstrap for the command-line binary.
//!
//! The library only emits through the `log` facade; nothing is printed
//! until a backend is started here.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Start a stderr logger at `level` ("warn", "info", "debug", or a
/// module spec like "epic_timeline=debug"). `RUST_LOG` takes precedence.
///
/// Calling again after a successful start is a no-op. Never panics.
pub fn init_logging(level: &str) -> Result<(), String> {
    LOGGER
        .get_or_try_init(|| {
            Logger::try_with_env_or_str(level)
                .map_err(|err| format!("invalid log level `{level}`: {err}"))?
                .log_to_stderr()
                .format(flexi_logger::default_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))
        })
        .map(|_| ())
}
