//! Pipeline nodes.
//!
//! Each node reads the case state, calls its collaborators, and returns a
//! [`CaseDelta`](crate::types::CaseDelta) with only the fields it produced.
//! Nodes never return `Err`: fatal failures become the delta's `error`.

pub mod drafter;
pub mod retrieval;
pub mod router;
pub mod specialist;

use std::time::Instant;

/// Milliseconds since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
