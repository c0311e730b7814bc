//! # Codec Options
//!
//! The codec carries no global state; every knob lives in [`CodecOptions`] and is passed to
//! the `*_with` variants of the entry points. The plain variants use [`CodecOptions::default`].

/// The nesting limit `prost` applies to decoding.
pub const DEFAULT_RECURSION_LIMIT: usize = 100;

/// Tunables shared by encode, decode, wrap and unwrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Maximum number of nested `Struct`/`ListValue` levels (and skipped groups) a single
    /// call will traverse before failing with a `RecursionLimitExceeded` error.
    pub recursion_limit: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl CodecOptions {
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }
}

/// Nesting level of the traversal in progress.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    current: usize,
    limit: usize,
}

impl Depth {
    pub(crate) fn root(options: &CodecOptions) -> Self {
        Self {
            current: 0,
            limit: options.recursion_limit,
        }
    }

    /// Descends one level, or `None` once the limit would be exceeded.
    pub(crate) fn enter(self) -> Option<Self> {
        (self.current < self.limit).then(|| Self {
            current: self.current + 1,
            limit: self.limit,
        })
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_stops_at_limit() {
        let options = CodecOptions::default().with_recursion_limit(2);
        let root = Depth::root(&options);

        let first = root.enter().unwrap();
        let second = first.enter().unwrap();

        assert!(second.enter().is_none());
        assert_eq!(second.limit(), 2);
    }
}
