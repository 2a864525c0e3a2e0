//! Deterministic per-statement random streams.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub type SequenceRng = Pcg32;

/// The random stream for the statement defining `name`.
///
/// Depends only on the context seed and the name, so a statement's random
/// values do not change when other statements are added or reordered.
pub fn rng_for(seed: u32, name: &str) -> SequenceRng {
    let name_hash = fnv1a(name.as_bytes());

    // Spread the 32-bit seed over 128 bits, fold in the name, then run the
    // result through the generator once to get a well mixed seed.
    #[expect(clippy::cast_possible_truncation, reason = "taking the low and high halves")]
    let words = [
        seed ^ 0xa5a5_a5a5 ^ (name_hash as u32),
        seed ^ 0x5a5a_5a5a ^ ((name_hash >> 32) as u32),
        seed ^ 0x5555_5555,
        seed ^ 0xaaaa_aaaa,
    ];
    let mut whitening = Pcg32::from_seed(to_bytes(words));
    let mixed = [whitening.gen(), whitening.gen(), whitening.gen(), whitening.gen()];
    Pcg32::from_seed(to_bytes(mixed))
}

/// 64-bit FNV-1a. Fixed here so streams stay the same across platforms and
/// toolchain releases.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

fn to_bytes(words: [u32; 4]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    bytes
}
