pub mod build_info;

use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".compliance_desk";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` adds directives on
/// top of the crate's `info` default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env();
        let filter = match "compliance_desk=info".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Application data directory: `$COMPLIANCE_DESK_HOME`, else `~/.compliance_desk`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("COMPLIANCE_DESK_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
