//! # Outbound Ports

/// Source of randomness for codes and brand draws.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `0..max`. Returns 0 when `max` is 0.
    fn random_usize(&self, max: usize) -> usize;
}
