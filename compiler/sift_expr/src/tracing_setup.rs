//! Opt-in diagnostic output for hosts embedding the engine.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for the engine's debug output.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=sift_expr=trace`
/// to see coercion insertion and evaluation entry. Repeated calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);
        // A host may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(EnvFilter::from_default_env())
            .try_init();
    });
}
