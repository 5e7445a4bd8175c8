pub mod digest;

pub use digest::DigestGenerator;

use snip_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// The code is derived from the input alone, so the same input must produce
/// the same code on every call, in every process, on every machine.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Derives a short code from the given long URL.
    fn generate(&self, input: &str) -> Self::Output;
}
