//! Expression node identity.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_EXPR_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of one expression node.
///
/// Assigned once when a node is built and never reused, so it can key
/// results that outlive a single evaluation pass (suspended calls resumed
/// by re-walking the same tree).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Reserved for nodes that never participate in caching.
    pub const INVALID: ExprId = ExprId(0);

    /// Allocate a fresh identity.
    #[inline]
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}
