use crate::error::GeneratorError;
use crate::Generator;
use burrow_core::shortcode::{ALPHABET, LENGTH};
use burrow_core::ShortCode;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::OsRng;
use rand::RngCore;

/// Generates short codes from the operating system's entropy source.
///
/// Symbols are sampled from [`OsRng`] directly. The source is checked with a
/// fallible read before each code, so a failing entropy source surfaces as
/// [`GeneratorError::Entropy`] instead of a panic. Each position is drawn through [`Uniform`] over exactly 62 outcomes,
/// which rejects out-of-range samples rather than reducing them modulo 62.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    index: Uniform<usize>,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self {
            index: Uniform::from(0..ALPHABET.len()),
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Result<Self::Output, GeneratorError> {
        OsRng
            .try_fill_bytes(&mut [0u8; 1])
            .map_err(|e| GeneratorError::Entropy(e.to_string()))?;

        let code: String = (0..LENGTH)
            .map(|_| ALPHABET[self.index.sample(&mut OsRng)] as char)
            .collect();

        Ok(ShortCode::new_unchecked(code))
    }
}
