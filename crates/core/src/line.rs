//! Line reducer - the slide/merge rule for a single row or column
//!
//! A line is always reduced toward index 0. Callers that slide toward the far
//! end reverse the line first and reverse the result back (see [`crate::engine`]).
//! Uses stack-only storage, no allocation.

use arrayvec::ArrayVec;

use crate::types::{can_merge, Score, Tile};

/// Reduce one line toward index 0.
///
/// Returns the new line and the score gained (the sum of every tile created by
/// a merge). Merges happen in a single left-to-right pass over the compacted
/// tiles, so a tile produced by a merge is never merged again in the same move:
///
/// ```
/// use tui_2048_core::reduce_line;
///
/// assert_eq!(reduce_line(&[2, 2, 2, 2]), ([4, 4, 0, 0], 8));
/// assert_eq!(reduce_line(&[0, 2, 0, 2]), ([4, 0, 0, 0], 4));
/// assert_eq!(reduce_line(&[4, 4, 8, 0]), ([8, 8, 0, 0], 8));
/// ```
///
/// A pair of [`MAX_TILE`](crate::types::MAX_TILE) tiles has no larger tile to
/// become, so it only compacts.
pub fn reduce_line<const N: usize>(line: &[Tile; N]) -> ([Tile; N], Score) {
    let mut compacted: ArrayVec<Tile, N> = line.iter().copied().filter(|&v| v != 0).collect();

    let mut score: Score = 0;
    let mut j = 0;
    while j + 1 < compacted.len() {
        if can_merge(compacted[j], compacted[j + 1]) {
            compacted[j] *= 2;
            score += Score::from(compacted[j]);
            compacted[j + 1] = 0;
            j += 2;
        } else {
            j += 1;
        }
    }

    let mut out = [0; N];
    for (slot, v) in out
        .iter_mut()
        .zip(compacted.into_iter().filter(|&v| v != 0))
    {
        *slot = v;
    }
    (out, score)
}
