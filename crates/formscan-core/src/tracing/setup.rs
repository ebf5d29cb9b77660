//! Log output for hosts embedding the scanner.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Variable holding `EnvFilter` directives,
/// e.g. `FORMSCAN_LOG=formscan_analysis=debug,formscan_storage=warn`.
pub const LOG_ENV: &str = "FORMSCAN_LOG";

/// Used when `FORMSCAN_LOG` is unset or does not parse.
pub const DEFAULT_DIRECTIVES: &str = "formscan=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// The filter `init_tracing` installs.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a compact stderr subscriber filtered by [`log_filter`].
///
/// Corpus scans log from named pool threads (`formscan-scan-N`), so thread
/// names are part of each line. Returns whether this subscriber is the
/// global one; `false` means the host installed its own first. Only the
/// first call does any work.
pub fn init_tracing() -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true),
            )
            .with(log_filter())
            .try_init()
            .is_ok()
    })
}
