// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancel-and-reschedule coalescing for bursty signals.
//!
//! The platform owns the clock. Each signal calls [`Debouncer::schedule`], which supersedes any
//! earlier pending value and returns a fresh [`PendingToken`]; the platform arms one timer per
//! token (clearing the previous one) and hands the token back through [`Debouncer::take`] when
//! the timer fires. Only the newest token yields a value, so a storm of signals produces exactly
//! one recomputation after it settles, even if a superseded timer still fires.
//!
//! ```
//! use embedsync_toc::debounce::Debouncer;
//!
//! let mut d = Debouncer::new();
//! let first = d.schedule(480.0);
//! let second = d.schedule(500.0);
//! assert_eq!(d.take(first), None);
//! assert_eq!(d.take(second), Some(500.0));
//! assert_eq!(d.take(second), None);
//! ```

/// Default settle delay for viewport resize signals, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

/// Handle for one scheduled value. Stale once a newer value is scheduled or the debouncer is cancelled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PendingToken(u64);

/// Holds at most one pending value.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<(u64, T)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debouncer<T> {
    /// Create an idle debouncer.
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    /// Replace any pending value with `value`.
    pub fn schedule(&mut self, value: T) -> PendingToken {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some((self.generation, value));
        PendingToken(self.generation)
    }

    /// Take the pending value if `token` is still the newest.
    pub fn take(&mut self, token: PendingToken) -> Option<T> {
        match self.pending.take() {
            Some((generation, value)) if generation == token.0 => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop the pending value; every outstanding token becomes stale.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` if a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn storm_coalesces_to_last_value() {
        let mut d = Debouncer::new();
        let tokens: Vec<_> = (1..=50).map(|h| d.schedule(h)).collect();
        // Every superseded timer fires first and finds nothing.
        let fired: Vec<_> = tokens.iter().filter_map(|&t| d.take(t)).collect();
        assert_eq!(fired, [50]);
        assert!(!d.is_pending());
    }

    #[test]
    fn stale_take_keeps_newest_pending() {
        let mut d = Debouncer::new();
        let old = d.schedule('a');
        let new = d.schedule('b');
        assert_eq!(d.take(old), None);
        assert!(d.is_pending());
        assert_eq!(d.take(new), Some('b'));
    }

    #[test]
    fn cancel_invalidates() {
        let mut d = Debouncer::new();
        let t = d.schedule(1);
        d.cancel();
        assert_eq!(d.take(t), None);
        d.cancel();
        assert!(!d.is_pending());
    }
}
