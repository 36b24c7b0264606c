pub mod memory;

use crate::category::Category;
use crate::error::StoreError;
use crate::transaction::{NewTransaction, Transaction};

use std::collections::HashSet;
use std::future::Future;

/// Persistent category catalog the importer reconciles against.
pub trait CategoryStore: Send + Sync {
    /// Every stored category whose title is in `titles`, in one lookup.
    fn find_by_titles(
        &self,
        titles: &HashSet<String>,
    ) -> impl Future<Output = Result<Vec<Category>, StoreError>> + Send;

    /// Builds pending categories. Nothing is stored until `save_many`.
    fn create_many(&self, titles: &[String]) -> Vec<Category> {
        titles.iter().map(|title| Category::new(title.as_str())).collect()
    }

    /// Commits a batch. An empty batch is a no-op.
    fn save_many(
        &self,
        categories: &[Category],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub trait TransactionStore: Send + Sync {
    fn create_many(&self, specs: Vec<NewTransaction>) -> Vec<Transaction> {
        specs.into_iter().map(Transaction::new).collect()
    }

    /// Commits a batch, all or nothing.
    fn save_many(
        &self,
        transactions: &[Transaction],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
