//! Sort-on-write for list entries.

/// Direction of the sort applied after a list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Stable sort of `items` by the key `order_by` extracts.
    /// Elements with equal keys keep their relative order in both directions.
    pub fn sort<T, K, F>(self, items: &mut [T], order_by: F)
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        match self {
            SortOrder::Ascending => items.sort_by_key(|item| order_by(item)),
            SortOrder::Descending => items.sort_by(|a, b| order_by(b).cmp(&order_by(a))),
        }
    }
}
