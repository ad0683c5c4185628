use crate::model::sampler::random_permutation;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

/// Numbers in play are `0..NUMBER_COUNT`.
pub const NUMBER_COUNT: u8 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("number {0} is outside the 0..90 range")]
    OutOfRange(u8),
    #[error("number {0} is drawn more than once")]
    Duplicate(u8),
}

/// The order in which numbers are called during one trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOrder {
    numbers: Vec<u8>,
}

impl DrawOrder {
    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let all: Vec<u8> = (0..NUMBER_COUNT).collect();
        Self {
            numbers: random_permutation(&all, rng),
        }
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Builds an explicit order. A partial order is allowed; repeats are not.
    pub fn from_numbers(numbers: Vec<u8>) -> Result<Self, DrawError> {
        let mut seen = [false; NUMBER_COUNT as usize];
        for &number in &numbers {
            let slot = seen
                .get_mut(number as usize)
                .ok_or(DrawError::OutOfRange(number))?;
            if *slot {
                return Err(DrawError::Duplicate(number));
            }
            *slot = true;
        }
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}
