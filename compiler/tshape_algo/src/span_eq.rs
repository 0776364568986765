//! Equality and hashing over contiguous spans.
//!
//! String comparison in structural equality goes through these, so the
//! ordinal and case-insensitive rules live in one place.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Equality and a consistent hash over `[T]`.
pub trait SpanEquality<T> {
    fn equals(&self, a: &[T], b: &[T]) -> bool;

    /// Equal spans hash equally.
    fn hash(&self, span: &[T]) -> u64;
}

/// Byte-for-byte comparison.
#[derive(Copy, Clone, Debug, Default)]
pub struct ByteOrdinal;

impl SpanEquality<u8> for ByteOrdinal {
    fn equals(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }

    fn hash(&self, span: &[u8]) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(span.len());
        hasher.write(span);
        hasher.finish()
    }
}

/// Code point comparison.
#[derive(Copy, Clone, Debug, Default)]
pub struct CharOrdinal;

impl SpanEquality<char> for CharOrdinal {
    fn equals(&self, a: &[char], b: &[char]) -> bool {
        a == b
    }

    fn hash(&self, span: &[char]) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(span.len());
        for c in span {
            hasher.write_u32(u32::from(*c));
        }
        hasher.finish()
    }
}

/// Code point comparison after simple uppercase folding.
#[derive(Copy, Clone, Debug, Default)]
pub struct CharOrdinalIgnoreCase;

impl CharOrdinalIgnoreCase {
    fn fold(c: char) -> impl Iterator<Item = char> {
        c.to_uppercase()
    }
}

impl SpanEquality<char> for CharOrdinalIgnoreCase {
    fn equals(&self, a: &[char], b: &[char]) -> bool {
        let a = a.iter().copied().flat_map(Self::fold);
        let b = b.iter().copied().flat_map(Self::fold);
        a.eq(b)
    }

    fn hash(&self, span: &[char]) -> u64 {
        let mut hasher = FxHasher::default();
        for c in span.iter().copied().flat_map(Self::fold) {
            hasher.write_u32(u32::from(c));
        }
        hasher.finish()
    }
}
