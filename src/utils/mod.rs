pub mod build_info;

use std::sync::Once;

use crate::config::DEFAULT_LOG_FILTER;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` directives are
/// combined with `directive` (usually [`DEFAULT_LOG_FILTER`]).
pub fn init_tracing(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env();
        let filter = match directive.parse() {
            Ok(parsed) => filter.add_directive(parsed),
            Err(_) => match DEFAULT_LOG_FILTER.parse() {
                Ok(parsed) => filter.add_directive(parsed),
                Err(_) => filter,
            },
        };

        // A subscriber installed by the host application takes precedence.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
