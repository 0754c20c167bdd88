//! Opt-in log output for test suites.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical `tracing` subscriber when `RUST_LOG` is set.
///
/// Call it at the top of a test; repeated calls are no-ops, and an already
/// installed global subscriber is left in place.
/// Enable with `RUST_LOG=autoctor=debug` or `RUST_LOG=autoctor=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let installed = tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .with(filter)
                .try_init();
            if installed.is_err() {
                tracing::debug!("global subscriber already installed");
            }
        }
    });
}
