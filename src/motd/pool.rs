//! Immutable selection pools for messages and icons.

use std::sync::Arc;

use rand::Rng;

use super::{Icon, Message};

/// Status messages in config-file order.
pub type MessagePool = Pool<Message>;
/// Decoded server icons in file-name order.
pub type IconPool = Pool<Icon>;

/// Ordered, read-only collection with uniform random selection.
///
/// Elements are kept behind `Arc` so a picked element outlives the pool it came
/// from (a reload may drop the pool while a response is still being written).
#[derive(Debug)]
pub struct Pool<T> {
    items: Vec<Arc<T>>,
}

impl<T> Pool<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Arc<T>> {
        self.items.get(index).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| item.as_ref())
    }

    /// Uniform draw using the calling thread's RNG. `None` when empty.
    pub fn pick_random(&self) -> Option<Arc<T>> {
        self.pick_with(&mut rand::thread_rng())
    }

    /// Uniform draw from a caller-supplied RNG, for seeded selection.
    pub fn pick_with<R: Rng>(&self, rng: &mut R) -> Option<Arc<T>> {
        if self.items.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.items.len());
        self.get(idx)
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_pool_returns_none() {
        let pool: Pool<Message> = Pool::empty();
        assert!(pool.is_empty());
        for _ in 0..10 {
            assert!(pool.pick_random().is_none());
        }
    }

    #[test]
    fn single_element_is_always_picked() {
        let pool: MessagePool = [Message::new("only")].into_iter().collect();
        for _ in 0..20 {
            assert_eq!(pool.pick_random().unwrap().as_str(), "only");
        }
    }

    #[test]
    fn preserves_insertion_order_and_duplicates() {
        let pool = Pool::new(vec!["a", "b", "a"]);
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(*pool.get(2).unwrap(), "a");
        assert!(pool.get(3).is_none());
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let pool = Pool::new((0..10).collect());
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8).map(|_| *pool.pick_with(&mut rng).unwrap()).collect::<Vec<i32>>()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn draws_are_roughly_uniform() {
        const N: usize = 4;
        const DRAWS: usize = 40_000;
        let pool = Pool::new((0..N).collect());
        let mut counts = [0usize; N];
        for _ in 0..DRAWS {
            counts[*pool.pick_random().unwrap()] += 1;
        }
        let expected = DRAWS as f64 / N as f64;
        for (i, count) in counts.iter().enumerate() {
            let deviation = (*count as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.1,
                "element {i} drawn {count} times, expected about {expected}"
            );
        }
    }
}
