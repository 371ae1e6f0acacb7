use crate::error::GeneratorError;
use crate::Generator;
use burrow_core::shortcode::{ALPHABET, LENGTH};
use burrow_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// 62^6, the number of distinct short codes.
pub const CODE_SPACE: u64 = 56_800_235_584;

/// A short code generator backed by a sequential counter.
///
/// This generator produces the base-62 rendering of its counter, padded to
/// six symbols: "aaaaaa", "aaaaab", ... It is deterministic, which makes it
/// useful for tests and for reproducing collisions. It does not consult the
/// store: after a restart, build it with [`SeqGenerator::resuming`] over the
/// loaded codes, otherwise it starts again at "aaaaaa" and every code it
/// yields is one that was already issued.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator whose first code encodes `offset`.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    /// Creates a generator that continues after the highest of `codes`.
    ///
    /// Codes that are not six alphabet symbols are ignored.
    pub fn resuming<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let offset = codes
            .into_iter()
            .filter_map(Self::decode)
            .max()
            .map_or(0, |last| last + 1);
        Self::with_offset(offset)
    }

    /// Returns the code the next call to `generate` will yield.
    pub fn peek(&self) -> ShortCode {
        Self::encode(self.counter.load(Ordering::SeqCst))
    }

    /// Decodes a code produced by [`SeqGenerator::encode`].
    pub fn decode(code: &str) -> Option<u64> {
        if code.len() != LENGTH {
            return None;
        }

        let base = ALPHABET.len() as u64;
        code.bytes().try_fold(0u64, |value, b| {
            let digit = ALPHABET.iter().position(|&s| s == b)?;
            Some(value * base + digit as u64)
        })
    }

    /// Encodes `value` (modulo the code space) as a six symbol code.
    pub fn encode(value: u64) -> ShortCode {
        let base = ALPHABET.len() as u64;
        let mut value = value % CODE_SPACE;
        let mut buf = [ALPHABET[0]; LENGTH];

        for slot in buf.iter_mut().rev() {
            *slot = ALPHABET[(value % base) as usize];
            value /= base;
        }

        ShortCode::new_unchecked(buf.iter().map(|&b| b as char).collect::<String>())
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Result<Self::Output, GeneratorError> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(Self::encode(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_space_is_62_to_the_6th() {
        assert_eq!(CODE_SPACE, 62u64.pow(6));
    }

    #[test]
    fn seq_generator_produces_sequential_codes() {
        let generator = SeqGenerator::new();

        assert_eq!(generator.generate().unwrap().as_str(), "aaaaaa");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaaab");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaaac");
    }

    #[test]
    fn seq_generator_with_offset() {
        let generator = SeqGenerator::with_offset(62);

        assert_eq!(generator.generate().unwrap().as_str(), "aaaaba");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaabb");
    }

    #[test]
    fn last_code_then_wraps() {
        let generator = SeqGenerator::with_offset(CODE_SPACE - 1);

        assert_eq!(generator.generate().unwrap().as_str(), "999999");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaaaa");
    }

    #[test]
    fn encoded_codes_are_valid() {
        for value in [0, 61, 62, 3_843, 1_000_000, CODE_SPACE - 1] {
            let code = SeqGenerator::encode(value);
            assert!(ShortCode::new(code.as_str()).is_ok(), "bad code {code}");
        }
    }

    #[test]
    fn decode_inverts_encode() {
        for value in [0, 61, 62, 150, 3_843, 1_000_000, CODE_SPACE - 1] {
            let code = SeqGenerator::encode(value);
            assert_eq!(SeqGenerator::decode(code.as_str()), Some(value));
        }

        assert_eq!(SeqGenerator::decode(""), None);
        assert_eq!(SeqGenerator::decode("aaaaa"), None);
        assert_eq!(SeqGenerator::decode("aaaaaaa"), None);
        assert_eq!(SeqGenerator::decode("aaa-aa"), None);
    }

    #[test]
    fn resuming_continues_after_highest_code() {
        let issued: Vec<_> = (0..150).map(SeqGenerator::encode).collect();

        let generator = SeqGenerator::resuming(issued.iter().map(ShortCode::as_str));

        assert_eq!(generator.generate().unwrap().as_str(), "aaaacA");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaacB");
    }

    #[test]
    fn peek_does_not_advance() {
        let generator = SeqGenerator::with_offset(150);

        assert_eq!(generator.peek().as_str(), "aaaacA");
        assert_eq!(generator.generate().unwrap().as_str(), "aaaacA");
        assert_eq!(generator.peek().as_str(), "aaaacB");
    }

    #[test]
    fn resuming_ignores_foreign_codes() {
        let generator = SeqGenerator::resuming(["aaaaba", "not-a-code", "abc"]);

        assert_eq!(generator.generate().unwrap().as_str(), "aaaabb");
        assert_eq!(
            SeqGenerator::resuming(std::iter::empty()).generate().unwrap().as_str(),
            "aaaaaa"
        );
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::new();
        generator.generate().unwrap();
        generator.generate().unwrap();

        let cloned = generator.clone();

        assert_eq!(generator.generate().unwrap().as_str(), "aaaaac");
        assert_eq!(cloned.generate().unwrap().as_str(), "aaaaac");
    }
}
