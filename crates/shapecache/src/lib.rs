//! ## Crate layout
//! - `core`: query shapes, index compatibility, cache keys, the plan cache,
//!   and its statistics.
//!
//! The `prelude` module mirrors the surface a query engine touches on its
//! planning path: eligibility, key computation, lookup and `set`.

pub use shapecache_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::error::InternalError as Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        cache::{EntryReport, LookupState},
        obs::CacheStats,
        prelude::*,
    };
}
