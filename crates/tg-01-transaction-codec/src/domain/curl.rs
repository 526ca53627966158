//! Curl-P sponge over balanced trits.

use super::trits::Trit;

/// Width of one absorbed or squeezed block, also the hash width in trits.
pub const HASH_LENGTH: usize = 243;

/// Sponge state width: rate (243) plus capacity (486).
pub const STATE_LENGTH: usize = 3 * HASH_LENGTH;

/// Rounds used for transaction content hashes.
pub const TRANSACTION_HASH_ROUNDS: usize = 123;

const TRUTH_TABLE: [Trit; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

/// A Curl-P sponge with a configurable round count.
#[derive(Clone)]
pub struct Curl {
    rounds: usize,
    state: [Trit; STATE_LENGTH],
    scratch: [Trit; STATE_LENGTH],
}

impl Curl {
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds,
            state: [0; STATE_LENGTH],
            scratch: [0; STATE_LENGTH],
        }
    }

    /// Absorbs `trits` block by block. A short final block overwrites only
    /// the leading part of the rate.
    pub fn absorb(&mut self, trits: &[Trit]) {
        for block in trits.chunks(HASH_LENGTH) {
            self.state[..block.len()].copy_from_slice(block);
            self.transform();
        }
    }

    /// Squeezes one block into `out`.
    pub fn squeeze(&mut self, out: &mut [Trit; HASH_LENGTH]) {
        out.copy_from_slice(&self.state[..HASH_LENGTH]);
        self.transform();
    }

    pub fn reset(&mut self) {
        self.state = [0; STATE_LENGTH];
    }

    fn transform(&mut self) {
        for _ in 0..self.rounds {
            self.scratch.copy_from_slice(&self.state);
            let mut index = 0usize;
            for slot in self.state.iter_mut() {
                let a = self.scratch[index];
                index = if index < 365 { index + 364 } else { index - 365 };
                let b = self.scratch[index];
                *slot = TRUTH_TABLE[(a + (b << 2) + 5) as usize];
            }
        }
    }
}

/// Hashes `trits` with a fresh sponge of `rounds` rounds.
pub fn hash_trits(trits: &[Trit], rounds: usize) -> [Trit; HASH_LENGTH] {
    let mut curl = Curl::new(rounds);
    curl.absorb(trits);
    let mut out = [0; HASH_LENGTH];
    curl.squeeze(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let input = [1i8; HASH_LENGTH];
        assert_eq!(hash_trits(&input, 27), hash_trits(&input, 27));
    }

    #[test]
    fn test_round_count_matters() {
        let input = [1i8; HASH_LENGTH];
        assert_ne!(hash_trits(&input, 9), hash_trits(&input, 27));
    }

    #[test]
    fn test_output_is_balanced() {
        let input: Vec<Trit> = (0..2 * HASH_LENGTH).map(|i| (i % 3) as Trit - 1).collect();
        let out = hash_trits(&input, TRANSACTION_HASH_ROUNDS);
        assert!(out.iter().all(|t| (-1..=1).contains(t)));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut curl = Curl::new(27);
        let mut first = [0; HASH_LENGTH];
        curl.absorb(&[1; HASH_LENGTH]);
        curl.squeeze(&mut first);

        curl.reset();
        let mut second = [0; HASH_LENGTH];
        curl.absorb(&[1; HASH_LENGTH]);
        curl.squeeze(&mut second);
        assert_eq!(first, second);
    }
}
