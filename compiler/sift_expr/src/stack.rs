//! Stack growth for evaluation of deeply nested trees.
//!
//! Trees come straight from script source, so nesting is unbounded. Each
//! recursive evaluation step runs inside [`ensure_sufficient_stack`].

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Grow the stack when less than this remains.
    const RED_ZONE: usize = 100 * 1024;
    /// Size of each new stack segment.
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
