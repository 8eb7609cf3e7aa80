//! Fatal error reporting
//!
//! Recoverable generation failures never reach this module. What does is a
//! content defect (corrupt catalog, a level that can never be built), and the
//! process stops loudly instead of retrying forever.

use std::fmt::Display;

/// Log a fatal generation error and abort
pub fn fatal(err: impl Display) -> ! {
    tracing::error!(error = %err, "fatal level generation error");
    panic!("level generation aborted: {}", err);
}
