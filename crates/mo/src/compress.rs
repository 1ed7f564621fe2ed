//! Coordinate compression: arbitrary ordered values to dense ranks `1..=V`.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compressed<T> {
    sorted: Vec<T>,
    ranks: Vec<usize>,
}

impl<T: Ord + Copy> Compressed<T> {
    pub fn new(values: &[T]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let ranks = values
            .iter()
            .map(|v| sorted.partition_point(|x| x < v) + 1)
            .collect();
        Self { sorted, ranks }
    }

    /// Rank of each input value, in input order.
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn into_ranks(self) -> Vec<usize> {
        self.ranks
    }

    /// Number of distinct values `V`.
    pub fn distinct(&self) -> usize {
        self.sorted.len()
    }

    pub fn value_of(&self, rank: usize) -> T {
        self.sorted[rank - 1]
    }

    pub fn rank_of(&self, value: &T) -> Option<usize> {
        self.sorted.binary_search(value).ok().map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Compressed;

    #[test]
    fn ranks_are_dense_and_order_preserving() {
        let values = [100_i64, -5, 100, 7, -5, 1_000_000_000];
        let c = Compressed::new(&values);
        assert_eq!(c.ranks(), &[3, 1, 3, 2, 1, 4]);
        assert_eq!(c.distinct(), 4);
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(c.value_of(c.ranks()[i]), v);
            assert_eq!(c.rank_of(&v), Some(c.ranks()[i]));
        }
        assert_eq!(c.rank_of(&8), None);
    }

    #[test]
    fn empty_input() {
        let c = Compressed::<u32>::new(&[]);
        assert_eq!(c.distinct(), 0);
        assert!(c.ranks().is_empty());
    }
}
