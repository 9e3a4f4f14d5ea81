//! IFCC - Interface-Compiler Session
//!
//! A [`Session`] owns everything one compilation builds up: the scope and
//! typedef graph, the template registry, the parse tree and the diagnostic
//! queue. The parser drives it with a stream of [`Directive`]s:
//!
//! ```text
//! Session::new(config)
//!     │  apply(Directive, SourceLoc)     typedefs, classes, scopes,
//!     │  replace_descriptors(text, loc)  templates, remembered types
//!     ▼
//! finish() ──► SessionOutput { tree, type table, diagnostics }
//! ```
//!
//! A directive that fails reports its diagnostic and leaves the session
//! usable; the next directive is applied as if the failed one was never
//! seen.
//!
//! # Debugging
//!
//! - `RUST_LOG=ifc_resolve=debug` - scope and typedef mutations
//! - `RUST_LOG=ifc_template=debug` - template location decisions
//! - `RUST_LOG=ifc_types=trace` - everything (very verbose)

mod config;
mod directive;
mod session;

use std::sync::Once;

pub use config::SessionConfig;
pub use directive::Directive;
pub use session::{Session, SessionOutput};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
