pub mod error;
pub mod random;
pub mod seq;

pub use error::GeneratorError;
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use burrow_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// the store is responsible for rejecting candidates that are already taken.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Produces a candidate short code.
    ///
    /// An error means the generator cannot make progress at all and must not be retried.
    fn generate(&self) -> Result<Self::Output, GeneratorError>;
}
