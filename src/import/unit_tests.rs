use crate::category::{Category, CategoryCatalog};
use crate::error::{ImportError, RowFormatError, StoreError};
use crate::import::collector::{collect_rows, RowCollector};
use crate::import::materializer::{materialize_transactions, resolve_candidates};
use crate::import::reconciler::{reconcile_categories, titles_to_create};
use crate::store::memory::InMemoryLedger;
use crate::store::{CategoryStore, TransactionStore};
use crate::transaction::{ParsedTransaction, RawRow, Transaction, TransactionType};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn raw(title: &str, kind: &str, value: &str, category: &str) -> RawRow {
    RawRow {
        title: title.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        category: category.to_string(),
    }
}

fn candidate(title: &str, category: &str) -> ParsedTransaction {
    ParsedTransaction {
        title: title.to_string(),
        value: Decimal::from(10),
        kind: TransactionType::Outcome,
        category_name: category.to_string(),
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

/// Wraps the in-memory category store and counts calls.
#[derive(Clone, Default)]
struct CountingCategoryStore {
    inner: Option<crate::store::memory::MemoryCategoryStore>,
    finds: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl CountingCategoryStore {
    fn over(ledger: &InMemoryLedger) -> Self {
        Self {
            inner: Some(ledger.category_store()),
            ..Default::default()
        }
    }
}

impl CategoryStore for CountingCategoryStore {
    async fn find_by_titles(&self, titles: &HashSet<String>) -> Result<Vec<Category>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            Some(inner) => inner.find_by_titles(titles).await,
            None => Ok(Vec::new()),
        }
    }

    async fn save_many(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            Some(inner) => inner.save_many(categories).await,
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingTransactionStore {
    saved: Arc<AtomicUsize>,
}

impl TransactionStore for RecordingTransactionStore {
    async fn save_many(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        self.saved.fetch_add(transactions.len(), Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod collector_tests {
    use super::*;

    #[test]
    fn test_offer_accepts_valid_row() {
        let mut collector = RowCollector::new();

        assert!(collector.offer(Ok(raw("Salary", "income", "5000", "Jobs"))));

        let rows = collector.finish();
        assert_eq!(rows.candidates.len(), 1);
        assert_eq!(rows.category_names, names(&["Jobs"]));
    }

    #[test]
    fn test_offer_drops_rows_missing_required_fields() {
        let mut collector = RowCollector::new();

        assert!(!collector.offer(Ok(raw("", "income", "100", "Jobs"))));
        assert!(!collector.offer(Ok(raw("Salary", "", "100", "Jobs"))));
        assert!(!collector.offer(Ok(raw("Salary", "income", "", "Jobs"))));

        let rows = collector.finish();
        assert!(rows.candidates.is_empty());
        assert!(rows.category_names.is_empty());
    }

    #[test]
    fn test_offer_drops_malformed_lines() {
        let mut collector = RowCollector::new();

        let accepted = collector.offer(Err(RowFormatError::Malformed {
            line: Some(3),
            message: "invalid utf-8".to_string(),
        }));

        assert!(!accepted);
        assert!(collector.finish().candidates.is_empty());
    }

    #[test]
    fn test_offer_keeps_duplicate_and_empty_category_names() {
        let mut collector = RowCollector::new();
        collector.offer(Ok(raw("Salary", "income", "5000", "Jobs")));
        collector.offer(Ok(raw("Tip", "income", "20", "")));
        collector.offer(Ok(raw("Bonus", "income", "300", "Jobs")));

        let rows = collector.finish();
        assert_eq!(rows.category_names, names(&["Jobs", "", "Jobs"]));
        assert_eq!(rows.candidates[1].title, "Tip");
        assert_eq!(rows.candidates[2].title, "Bonus");
    }

    #[tokio::test]
    async fn test_collect_rows_waits_for_end_of_stream() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);

        let producer = tokio::spawn(async move {
            for i in 0..10 {
                let row = raw(&format!("Row {}", i), "outcome", "1", "Misc");
                tx.send(Ok(row)).await.unwrap();
            }
        });

        let rows = collect_rows(rx).await;
        producer.await.unwrap();

        assert_eq!(rows.candidates.len(), 10);
        assert_eq!(rows.candidates[9].title, "Row 9");
    }
}

#[cfg(test)]
mod reconciler_tests {
    use super::*;

    #[test]
    fn test_titles_to_create_dedups_in_first_occurrence_order() {
        let existing = vec![Category::new("Jobs")];
        let titles = titles_to_create(
            &names(&["Travel", "Jobs", "Food", "Travel", "Food", "Jobs"]),
            &existing,
        );

        assert_eq!(titles, names(&["Travel", "Food"]));
    }

    #[tokio::test]
    async fn test_reconcile_creates_each_new_title_once() {
        let ledger = InMemoryLedger::new();
        let store = CountingCategoryStore::over(&ledger);

        let result = reconcile_categories(&store, &names(&["Food"; 5])).await.unwrap();

        assert_eq!(result.created.len(), 1);
        assert_eq!(result.catalog.len(), 1);
        assert_eq!(ledger.categories().await.len(), 1);
        assert_eq!(store.finds.load(Ordering::SeqCst), 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reconcile_reuses_existing_categories() {
        let ledger = InMemoryLedger::new();
        let jobs = Category::new("Jobs");
        ledger.category_store().save_many(&[jobs.clone()]).await.unwrap();
        let store = CountingCategoryStore::over(&ledger);

        let result = reconcile_categories(&store, &names(&["Jobs", "Travel"])).await.unwrap();

        assert_eq!(result.created.len(), 1);
        assert_eq!(result.created[0].title, "Travel");
        assert_eq!(result.catalog.resolve("Jobs"), Some(&jobs));
        assert_eq!(ledger.categories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_reconcile_skips_save_when_nothing_is_new() {
        let ledger = InMemoryLedger::new();
        ledger
            .category_store()
            .save_many(&[Category::new("Jobs")])
            .await
            .unwrap();
        let store = CountingCategoryStore::over(&ledger);

        let result = reconcile_categories(&store, &names(&["Jobs", "Jobs"])).await.unwrap();

        assert!(result.created.is_empty());
        assert_eq!(store.finds.load(Ordering::SeqCst), 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reconcile_without_names_touches_nothing() {
        let store = CountingCategoryStore::default();

        let result = reconcile_categories(&store, &[]).await.unwrap();

        assert!(result.catalog.is_empty());
        assert_eq!(store.finds.load(Ordering::SeqCst), 0);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reconcile_treats_empty_name_as_a_category() {
        let store = CountingCategoryStore::default();

        let result = reconcile_categories(&store, &names(&["", "Jobs", ""])).await.unwrap();

        assert_eq!(result.created.len(), 2);
        assert!(result.catalog.resolve("").is_some());
    }
}

#[cfg(test)]
mod materializer_tests {
    use super::*;

    #[test]
    fn test_resolve_candidates_links_categories_in_order() {
        let catalog: CategoryCatalog = vec![Category::new("Jobs"), Category::new("Food")]
            .into_iter()
            .collect();
        let specs = resolve_candidates(
            vec![
                candidate("Lunch", "Food"),
                candidate("Salary", "Jobs"),
                candidate("Dinner", "Food"),
            ],
            &catalog,
        )
        .unwrap();

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].title, "Lunch");
        assert_eq!(specs[1].category, *catalog.resolve("Jobs").unwrap());
        assert_eq!(specs[2].category, specs[0].category);
    }

    #[tokio::test]
    async fn test_unresolved_category_aborts_before_writing() {
        let store = RecordingTransactionStore::default();
        let catalog: CategoryCatalog = vec![Category::new("Jobs")].into_iter().collect();

        let result = materialize_transactions(
            &store,
            vec![candidate("Salary", "Jobs"), candidate("Flight", "Travel")],
            &catalog,
        )
        .await;

        match result {
            Err(ImportError::FatalReconciliation { category }) => assert_eq!(category, "Travel"),
            other => panic!("Expected FatalReconciliation, got {:?}", other),
        }
        assert_eq!(store.saved.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_materialize_persists_one_batch() {
        let store = RecordingTransactionStore::default();
        let catalog: CategoryCatalog = vec![Category::new("Food")].into_iter().collect();

        let created = materialize_transactions(
            &store,
            vec![candidate("Lunch", "Food"), candidate("Dinner", "Food")],
            &catalog,
        )
        .await
        .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(store.saved.load(Ordering::SeqCst), 2);
    }
}
