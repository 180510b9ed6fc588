use super::payment::PaymentRecord;
use std::slice;

/// Append-only, chronological log of settled payments.
///
/// There is no removal, reordering or deduplication; iteration always yields
/// records in the order they were appended and can be restarted at will.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentHistory {
    records: Vec<PaymentRecord>,
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: PaymentRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lazily walks the records in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, PaymentRecord> {
        self.records.iter()
    }
}

impl From<Vec<PaymentRecord>> for PaymentHistory {
    fn from(records: Vec<PaymentRecord>) -> Self {
        Self { records }
    }
}

impl From<PaymentHistory> for Vec<PaymentRecord> {
    fn from(history: PaymentHistory) -> Self {
        history.records
    }
}

impl<'a> IntoIterator for &'a PaymentHistory {
    type Item = &'a PaymentRecord;
    type IntoIter = slice::Iter<'a, PaymentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
