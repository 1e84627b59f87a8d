//! Chunked shift utilities.
//!
//! Shift distances are arbitrary-precision, but bignum primitives take
//! machine-sized amounts. These helpers break a distance into bounded chunks
//! so no single primitive call does unbounded work.

use std::ops::ShlAssign;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Largest number of digit or bit positions handled by one primitive shift.
pub(crate) const SHIFT_CHUNK: u64 = 1_000_000;

/// Calls `step` with successive chunks of at most `chunk_limit` that sum to
/// `amount`.
pub(crate) fn for_each_chunk<F>(amount: &BigUint, chunk_limit: u64, mut step: F)
where
    F: FnMut(u64),
{
    let chunk_limit = chunk_limit.max(1);
    let limit = BigUint::from(chunk_limit);
    let mut remaining = amount.clone();
    while !remaining.is_zero() {
        let chunk = if remaining > limit {
            chunk_limit
        } else {
            remaining.to_u64().unwrap_or(chunk_limit)
        };
        step(chunk);
        remaining -= chunk;
    }
}

/// Left-shifts `mantissa` by a potentially huge amount, one chunk at a time.
pub(crate) fn shift_left_chunked<M>(mantissa: &M, shift: &BigUint, chunk_limit: u64) -> M
where
    M: Clone + ShlAssign<usize>,
{
    let mut shifted = mantissa.clone();
    for_each_chunk(shift, chunk_limit, |chunk| {
        // chunk <= chunk_limit, which callers keep far below usize::MAX
        shifted <<= chunk as usize;
    });
    shifted
}
