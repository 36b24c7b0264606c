use crate::error::ImportError;
use crate::import::collector::collect_rows;
use crate::import::materializer::materialize_transactions;
use crate::import::reconciler::reconcile_categories;
use crate::parser::{open_rows, spawn_row_stream};
use crate::store::{CategoryStore, TransactionStore};
use crate::transaction::Transaction;

use std::fmt;
use std::path::Path;
use tracing::{debug, info, info_span, Instrument};

/// Where a run is. There is no way back to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Streaming,
    Reconciling,
    Persisting,
    CleaningUp,
    Done,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Streaming => "streaming",
            ImportPhase::Reconciling => "reconciling",
            ImportPhase::Persisting => "persisting",
            ImportPhase::CleaningUp => "cleaning-up",
            ImportPhase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Rows buffered between the file reader and the collector.
    pub channel_capacity: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
        }
    }
}

pub struct TransactionImporter<C, T> {
    categories: C,
    transactions: T,
    options: ImportOptions,
}

impl<C, T> TransactionImporter<C, T>
where
    C: CategoryStore,
    T: TransactionStore,
{
    pub fn new(categories: C, transactions: T) -> Self {
        Self {
            categories,
            transactions,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Imports every valid row of the file at `path` and removes the file.
    ///
    /// Returns the created transactions in file order. On any error the run
    /// stops where it is and the file is left in place.
    pub async fn import(&self, path: impl AsRef<Path>) -> Result<Vec<Transaction>, ImportError> {
        let path = path.as_ref();
        let span = info_span!("import", path = %path.display());

        self.run(path).instrument(span).await
    }

    async fn run(&self, path: &Path) -> Result<Vec<Transaction>, ImportError> {
        enter(ImportPhase::Idle);
        let rows = open_rows(path).await?;

        enter(ImportPhase::Streaming);
        let (rx, reader) =
            spawn_row_stream(rows, path.to_path_buf(), self.options.channel_capacity);
        let collected = collect_rows(rx).await;
        reader.await??;

        enter(ImportPhase::Reconciling);
        let reconciliation =
            reconcile_categories(&self.categories, &collected.category_names).await?;

        enter(ImportPhase::Persisting);
        let created = materialize_transactions(
            &self.transactions,
            collected.candidates,
            &reconciliation.catalog,
        )
        .await?;

        enter(ImportPhase::CleaningUp);
        tokio::fs::remove_file(path)
            .await
            .map_err(|source| ImportError::Cleanup {
                path: path.to_path_buf(),
                source,
            })?;

        enter(ImportPhase::Done);
        info!(
            transactions = created.len(),
            categories_created = reconciliation.created.len(),
            "Import complete"
        );

        Ok(created)
    }
}

fn enter(phase: ImportPhase) {
    debug!(%phase, "Import phase");
}
