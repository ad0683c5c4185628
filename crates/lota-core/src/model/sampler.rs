use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("cannot pick {requested} distinct items from a universe of {available}")]
    NotEnoughItems { requested: usize, available: usize },
}

/// Picks `n` distinct positions of `universe` uniformly at random.
///
/// The returned items are themselves in random order.
pub fn pick_n<T, R>(universe: &[T], n: usize, rng: &mut R) -> Result<Vec<T>, SampleError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if n > universe.len() {
        return Err(SampleError::NotEnoughItems {
            requested: n,
            available: universe.len(),
        });
    }

    let mut pool = universe.to_vec();
    let (picked, _) = pool.partial_shuffle(rng, n);
    Ok(picked.to_vec())
}

/// Returns every item of `universe` in uniformly random order.
pub fn random_permutation<T, R>(universe: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut items = universe.to_vec();
    items.shuffle(rng);
    items
}
