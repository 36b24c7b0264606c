use crate::category::{Category, CategoryId};
use crate::error::StoreError;
use crate::store::{CategoryStore, TransactionStore};
use crate::transaction::Transaction;

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct LedgerState {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

/// Process-local ledger backing both store capabilities.
///
/// Saves are all-or-nothing. Category titles are unique across the ledger and
/// transactions may only reference saved categories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_store(&self) -> MemoryCategoryStore {
        MemoryCategoryStore {
            state: Arc::clone(&self.state),
        }
    }

    pub fn transaction_store(&self) -> MemoryTransactionStore {
        MemoryTransactionStore {
            state: Arc::clone(&self.state),
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.lock().await.categories.clone()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.clone()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCategoryStore {
    state: Arc<Mutex<LedgerState>>,
}

impl CategoryStore for MemoryCategoryStore {
    async fn find_by_titles(&self, titles: &HashSet<String>) -> Result<Vec<Category>, StoreError> {
        let state = self.state.lock().await;

        Ok(state
            .categories
            .iter()
            .filter(|category| titles.contains(&category.title))
            .cloned()
            .collect())
    }

    async fn save_many(&self, categories: &[Category]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;

        let mut titles: HashSet<&str> = state
            .categories
            .iter()
            .map(|category| category.title.as_str())
            .collect();
        for category in categories {
            if !titles.insert(category.title.as_str()) {
                return Err(StoreError::DuplicateCategory(category.title.clone()));
            }
        }

        state.categories.extend_from_slice(categories);
        debug!(count = categories.len(), "Saved categories");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryTransactionStore {
    state: Arc<Mutex<LedgerState>>,
}

impl TransactionStore for MemoryTransactionStore {
    async fn save_many(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;

        let known: HashSet<CategoryId> = state
            .categories
            .iter()
            .map(|category| category.id)
            .collect();
        if let Some(orphan) = transactions
            .iter()
            .find(|tx| !known.contains(&tx.category.id))
        {
            return Err(StoreError::UnknownCategory(orphan.category.id));
        }

        state.transactions.extend_from_slice(transactions);
        debug!(count = transactions.len(), "Saved transactions");
        Ok(())
    }
}
