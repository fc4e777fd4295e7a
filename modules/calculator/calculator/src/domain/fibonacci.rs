//! Memoized Fibonacci computation.
//!
//! `fib(1) = fib(2) = 1`, `fib(k) = fib(k-1) + fib(k-2)`. Slot 0 of the cache
//! is never written and always reads as `0`.

use calculator_sdk::MAX_FIBONACCI_INDEX;

use super::error::DomainError;

/// Per-call memoization cache covering indices `0..=n`.
#[derive(Debug, Clone)]
pub struct FibonacciMemo {
    cache: Vec<i64>,
}

impl FibonacciMemo {
    /// Allocate a cache for positions `0..=n`.
    ///
    /// # Errors
    /// Returns [`DomainError::PositionOutOfRange`] if `n` is negative or its
    /// term would not fit in an `i64`.
    pub fn new(n: i64) -> Result<Self, DomainError> {
        if !(0..=MAX_FIBONACCI_INDEX).contains(&n) {
            return Err(DomainError::PositionOutOfRange(n));
        }
        let len = usize::try_from(n).map_err(|_| DomainError::PositionOutOfRange(n))? + 1;
        Ok(Self {
            cache: vec![0; len],
        })
    }

    /// Number of slots, i.e. `n + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Always `false`; a memo holds at least slot 0.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Term at `position`, computing and caching missing predecessors.
    ///
    /// Returns `None` for positions beyond the cache.
    pub fn term(&mut self, position: usize) -> Option<i64> {
        let cached = *self.cache.get(position)?;
        if position == 0 || cached != 0 {
            return Some(cached);
        }

        let value = if position <= 2 {
            1
        } else {
            self.term(position - 1)? + self.term(position - 2)?
        };
        self.cache[position] = value;
        Some(value)
    }
}
