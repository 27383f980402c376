/// Row-limiting state of a query: skip `offset` rows, then return at most
/// `count` rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: Option<usize>,
    pub offset: usize,
}

impl Limit {
    pub fn count(count: usize) -> Self {
        Self {
            count: Some(count),
            offset: 0,
        }
    }

    pub fn offset(offset: usize) -> Self {
        Self {
            count: None,
            offset,
        }
    }

    /// Returns `true` if applying the limit cannot drop any row.
    pub fn is_unbounded(&self) -> bool {
        self.count.is_none() && self.offset == 0
    }
}
