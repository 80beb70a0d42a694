/// Pagination cursor for offset-based query endpoints whose result set can
/// shrink while it is being consumed.
///
/// Marking a lead's completion field removes it from the query on the next
/// fetch, which shifts every later result left by one. The cursor therefore
/// advances past a page by `page_len - removed`: records that were mutated
/// out of the result set no longer occupy a position, while records that
/// stayed behind (e.g. leads with nothing to migrate) still do and must be
/// skipped over, or the same page would be fetched forever.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    skip: usize,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset to request the next page at.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Consume a page of `page_len` records, `removed` of which were mutated
    /// out of the query result set.
    pub fn advance(&mut self, page_len: usize, removed: usize) {
        debug_assert!(removed <= page_len);
        self.skip += page_len.saturating_sub(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_by_page_length_when_nothing_removed() {
        let mut cursor = PageCursor::new();
        cursor.advance(100, 0);
        cursor.advance(40, 0);
        assert_eq!(cursor.skip(), 140);
    }

    #[test]
    fn test_stays_put_when_whole_page_removed() {
        let mut cursor = PageCursor::new();
        cursor.advance(100, 100);
        assert_eq!(cursor.skip(), 0);
    }

    #[test]
    fn test_mixed_page_advances_past_remaining_records() {
        // 100 fetched, 70 marked out of the query: the 30 left behind still
        // occupy positions 0..30, so the next fetch starts at 30.
        let mut cursor = PageCursor::new();
        cursor.advance(100, 70);
        assert_eq!(cursor.skip(), 30);

        cursor.advance(50, 50);
        assert_eq!(cursor.skip(), 30);

        cursor.advance(10, 0);
        assert_eq!(cursor.skip(), 40);
    }
}
