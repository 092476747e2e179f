//! Id generation abstraction so identity is injectable and deterministic in
//! tests

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated ids
const ID_LENGTH: usize = 16;

/// Source of unique opaque id strings
pub trait IdGenerator {
    /// Produce a fresh unique id
    fn generate(&self) -> String;
}

/// Random alphanumeric ids, 16 characters
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect()
    }
}
