use crate::category::{Category, CategoryCatalog};
use crate::error::StoreError;
use crate::store::CategoryStore;

use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Existing and newly created categories for this run.
    pub catalog: CategoryCatalog,
    /// Categories created by this run, in first-reference order.
    pub created: Vec<Category>,
}

/// Titles from `names` that are not in `existing`, first occurrence wins.
pub fn titles_to_create(names: &[String], existing: &[Category]) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut seen = HashSet::new();

    names
        .iter()
        .filter(|name| !existing.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Matches referenced names to stored categories and creates the rest.
///
/// The store is queried once and written once at most.
pub async fn reconcile_categories<S: CategoryStore>(
    store: &S,
    names: &[String],
) -> Result<Reconciliation, StoreError> {
    if names.is_empty() {
        return Ok(Reconciliation::default());
    }

    let lookup: HashSet<String> = names.iter().cloned().collect();
    let existing = store.find_by_titles(&lookup).await?;

    let to_create = titles_to_create(names, &existing);
    let created = store.create_many(&to_create);
    if !created.is_empty() {
        store.save_many(&created).await?;
    }

    debug!(
        existing = existing.len(),
        created = created.len(),
        "Categories reconciled"
    );

    let catalog: CategoryCatalog = existing.into_iter().chain(created.iter().cloned()).collect();

    Ok(Reconciliation { catalog, created })
}
