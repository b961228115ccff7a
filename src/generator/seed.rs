//! Per-output seed derivation.

use blake3::Hasher;
use rand::Rng;

/// Seed for output `index` of a batch started from `base`.
///
/// seed = first 8 bytes (little-endian) of BLAKE3(base_le || index_le).
/// Pure in both arguments, so any output can be reproduced on its own.
pub fn derive_output_seed(base: u64, index: u64) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&base.to_le_bytes());
    hasher.update(&index.to_le_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Non-deterministic base seed for calls that do not supply one.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}
