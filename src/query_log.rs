use chrono::NaiveDateTime;

use crate::domain::{FarmRequest, QueryRecord};

/// Append-only record of every successful query in this session.
/// Ids keep counting across a clear so a stale download link never
/// resolves to a newer record.
#[derive(Debug, Default)]
pub struct QueryLog {
    records: Vec<QueryRecord>,
    next_id: usize,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        timestamp: NaiveDateTime,
        request: &FarmRequest,
        recommendation: String,
    ) -> &QueryRecord {
        let record = QueryRecord {
            id: self.next_id,
            timestamp,
            location: request.location.clone(),
            crop: request.crop.clone(),
            stage: request.stage,
            recommendation,
        };
        self.next_id += 1;

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records in append order.
    pub fn all(&self) -> &[QueryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&QueryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in reverse append order, for the history list.
    pub fn newest_first(&self) -> impl Iterator<Item = &QueryRecord> {
        self.records.iter().rev()
    }
}
