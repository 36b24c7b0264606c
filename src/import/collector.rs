use crate::parser::RowResult;
use crate::transaction::ParsedTransaction;

use tokio::sync::mpsc;
use tracing::debug;

/// Accepted rows and the category names they reference, in arrival order.
#[derive(Debug, Default)]
pub struct CollectedRows {
    pub candidates: Vec<ParsedTransaction>,
    /// One entry per accepted row, duplicates kept.
    pub category_names: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RowCollector {
    rows: CollectedRows,
    rejected: usize,
}

impl RowCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a row and keeps it if it is well formed. Rejected rows are
    /// dropped without surfacing an error.
    pub fn offer(&mut self, row: RowResult) -> bool {
        match row.and_then(ParsedTransaction::try_from) {
            Ok(candidate) => {
                self.rows.category_names.push(candidate.category_name.clone());
                self.rows.candidates.push(candidate);
                true
            }
            Err(_) => {
                self.rejected += 1;
                false
            }
        }
    }

    pub fn finish(self) -> CollectedRows {
        debug!(
            accepted = self.rows.candidates.len(),
            rejected = self.rejected,
            "Row stream drained"
        );
        self.rows
    }
}

/// Drains the row channel to its end before returning anything.
pub async fn collect_rows(mut rx: mpsc::Receiver<RowResult>) -> CollectedRows {
    let mut collector = RowCollector::new();

    while let Some(row) = rx.recv().await {
        collector.offer(row);
    }

    collector.finish()
}
