// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(1);

/// A process-unique opaque token.
///
/// Tokens back every identity in the crate: interfaces, kinds, callables and
/// providers all draw from the same counter, so a token never collides across
/// the different identity spaces that share a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Token(u64);

impl Token {
    /// Mints a token distinct from every token minted before it.
    pub(crate) fn next() -> Self {
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    #[test]
    fn next_should_mint_distinct_tokens() {
        let a = Token::next();
        let b = Token::next();
        assert_ne!(a, b);
    }
}
