//! Seedable RNG wrapper used for run identifier suffixes.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// RNG handle exposed to ablate consumers.
///
/// The handle is a thin wrapper around `StdRng`. A caller that needs
/// reproducible identifiers supplies a fixed `seed: u64`; otherwise
/// [`RngHandle::from_entropy`] draws the seed from the operating system.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a new RNG handle seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Returns `len` lowercase hexadecimal characters.
    pub fn hex_token(&mut self, len: usize) -> String {
        let mut token = String::with_capacity(len);
        while token.len() < len {
            let word = self.rng.next_u64();
            for shift in (0..16).rev() {
                if token.len() == len {
                    break;
                }
                let nibble = ((word >> (shift * 4)) & 0xf) as u32;
                // nibble < 16 so the digit always exists
                token.push(char::from_digit(nibble, 16).unwrap_or('0'));
            }
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_token_has_requested_length() {
        let mut rng = RngHandle::from_seed(7);
        for len in [0, 1, 8, 16, 21] {
            let token = rng.hex_token(len);
            assert_eq!(token.len(), len);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn same_seed_same_tokens() {
        let mut first = RngHandle::from_seed(11);
        let mut second = RngHandle::from_seed(11);
        assert_eq!(first.hex_token(8), second.hex_token(8));
        assert_eq!(first.hex_token(20), second.hex_token(20));
    }
}
