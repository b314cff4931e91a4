//! Integer hashing and seed helpers shared by the generators.

const HASH_X: i64 = 645_654_564;
const HASH_Y: i64 = 5_466_343_253;

/// Deterministic bit mix of a tile coordinate.
///
/// Each product is reduced to its low 32 bits and read as a signed integer
/// before the XOR, so the result is stable across platforms.
pub fn hash(x: i32, y: i32) -> i32 {
    let hx = (x as i64).wrapping_mul(HASH_X) as i32;
    let hy = (y as i64).wrapping_mul(HASH_Y) as i32;
    hx ^ hy
}

/// Fractional part of `|v|`, always in `[0, 1)`.
pub fn unit_fract(v: f64) -> f64 {
    v.abs().fract()
}

/// Splitmix64 step: a fast, well-distributed 64-bit mixer.
pub fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
