//! Seeded shuffle used to freeze the round-1 seating order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-16 code units of a tournament id.
pub fn seed_from_id(id: &str) -> u32 {
    id.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic permutation of `items`: same seed and input, same output.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut out = items.to_vec();
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    out.shuffle(&mut rng);
    out
}

/// Round-1 seating: sorted names, shuffled with `seed`.
///
/// If the shuffle leaves the alphabetically first name at the head, the head is swapped
/// with a position drawn from `[1, n-1]` by a second generator seeded with `seed + 1`.
pub fn initial_seating(names: &[String], seed: u32) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort();
    let mut seating = seeded_shuffle(&sorted, seed);
    if seating.len() > 1 && seating[0] == sorted[0] {
        let mut rng = StdRng::seed_from_u64(u64::from(seed.wrapping_add(1)));
        let swap_idx = rng.gen_range(1..seating.len());
        seating.swap(0, swap_idx);
    }
    seating
}
