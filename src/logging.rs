//! Logging configuration for the brisk driver
//!
//! Libraries log through the `log` facade; this module installs
//! `env_logger` for the binary.
//!
//! - `warn!` - failing module queries, module names linked twice
//! - `info!` - runtime boot summary
//! - `debug!` - module registration, raised faults
//! - `trace!` - individual routine registrations
//!
//! `RUST_LOG` overrides the level chosen on the command line:
//!
//! ```bash
//! RUST_LOG=brisk_runtime=trace brisk routines
//! ```

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging at the default level (Warn).
///
/// This only initializes once; subsequent calls are no-ops.
pub fn init() {
    init_with_level(LevelFilter::Warn);
}

/// Initialize logging with a default level; `RUST_LOG` still wins.
///
/// This only initializes once; subsequent calls are no-ops.
pub fn init_with_level(level: LevelFilter) {
    INIT.call_once(|| {
        let mut builder = Builder::new();
        builder
            .filter_level(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {} - {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            });
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        let _ = builder.try_init();
    });
}

/// Initialize logging from `RUST_LOG` alone, defaulting to Warn.
///
/// This only initializes once; subsequent calls are no-ops.
pub fn init_from_env() {
    INIT.call_once(|| {
        let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();
    });
}

/// Initialize logging for tests: captured output, Warn unless `RUST_LOG`
/// says otherwise. Safe to call from every test.
#[cfg(test)]
pub fn init_test() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// Whether one of the `init*` functions has run.
#[cfg(test)]
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
