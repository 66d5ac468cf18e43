//! Offset -> element hit testing.
//!
//! Linear scan over every kind list. Label-sized text holds tens of elements,
//! so no interval index is kept.
//!
//! Containment is inclusive at both ends (`start <= offset <= end`): a tap on
//! the character right after an element still hits it. When two elements touch,
//! the shared offset resolves by kind order (mention, hashtag, url, regex) and
//! then by scan order, so the left neighbour of the same kind wins.

use super::types::{ActiveKind, ActiveTable, RangedElement};

impl ActiveTable {
    /// First element whose range contains `offset`
    pub fn lookup(&self, offset: usize) -> Option<&RangedElement> {
        ActiveKind::TABLE_ORDER
            .iter()
            .flat_map(|kind| self.get(*kind))
            .find(|entry| entry.range.contains_inclusive(offset))
    }
}

pub fn lookup(table: &ActiveTable, offset: usize) -> Option<&RangedElement> {
    table.lookup(offset)
}
