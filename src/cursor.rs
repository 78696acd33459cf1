/// Where a paginated list continues from. Requests ask for entries with an id
/// strictly greater than `cursor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageContext {
    pub cursor: i64,
}

impl PageContext {
    pub fn after(cursor: i64) -> PageContext {
        PageContext { cursor }
    }

    /// The context following a page whose last entry had `last_id`. An empty page keeps the cursor.
    pub fn next(self, last_id: Option<i64>) -> PageContext {
        last_id.map_or(self, PageContext::after)
    }
}
