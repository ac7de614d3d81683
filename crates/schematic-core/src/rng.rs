// crates/schematic-core/src/rng.rs
//
// Seeded watermark stream: `rand_pcg::Pcg32` (PCG XSH-RR, 64-bit state,
// 32-bit output) plus the bounded draws the watermark engine needs.
//
// `rand_pcg` guarantees its output stream across versions. The derived
// draws below are written against `RngCore::next_u32` directly instead of
// `rand`'s distributions, whose sampling algorithms may change between
// releases.

use rand::RngCore;
pub use rand_pcg::Pcg32;

/// Stream selector used by [`seeded`].
pub const DEFAULT_STREAM: u64 = 1442695040888963407 >> 1;

/// Generator for `seed` on the default stream.
///
/// `Pcg32::new` follows the reference `pcg32_srandom_r` seeding, so the
/// stream matches every other PCG32 implementation given the same pair.
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::new(seed, DEFAULT_STREAM)
}

/// Uniform integer in `[0, bound)` without modulo bias. `bound` must be > 0.
pub fn next_below<R: RngCore + ?Sized>(rng: &mut R, bound: u32) -> u32 {
    debug_assert!(bound > 0, "bound must be positive");
    let threshold = bound.wrapping_neg() % bound;
    loop {
        let r = rng.next_u32();
        if r >= threshold {
            return r % bound;
        }
    }
}

/// Uniform integer in `[low, high)`. Returns `low` if the range is empty.
pub fn next_in_range<R: RngCore + ?Sized>(rng: &mut R, low: u32, high: u32) -> u32 {
    if high <= low {
        return low;
    }
    low + next_below(rng, high - low)
}

/// Uniform `f32` in `[0, 1)` built from the top 24 bits of one draw.
pub fn next_unit<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Uniform `f32` in `[-1, 1)`. Exact: the largest value is `1 - 2^-23`.
pub fn next_signed_unit<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    next_unit(rng) * 2.0 - 1.0
}
