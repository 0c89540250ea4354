//! Logging and tracing infrastructure for pspview.
//!
//! Events are written to stderr so that tables printed on stdout can be
//! piped without interleaved log lines.

use std::io;
use std::sync::Once;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// This should be called once at program startup.
/// Subsequent calls are ignored.
pub fn init_tracing() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        // A subscriber may already be installed by the host program.
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init();

        debug!("pspview tracing initialized");
    });
}

/// Initialize tracing with JSON output for structured logging.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_current_span(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init();

        debug!("pspview tracing initialized (JSON mode)");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_once() {
        // Should be callable multiple times without panic
        init_tracing();
        init_tracing();
        init_tracing_json();
    }

    #[test]
    fn test_structured_logging() {
        init_tracing();
        let image = "bios.rom";
        let size = 0x100_0000;
        info!(image = %image, size_bytes = size, "Loaded image");
        trace!("This is a trace message");
        warn!("This is a warning message");
    }
}
