use crate::category::CategoryCatalog;
use crate::error::ImportError;
use crate::store::TransactionStore;
use crate::transaction::{NewTransaction, ParsedTransaction, Transaction};

/// Joins every candidate to its category. Fails on the first name the catalog
/// cannot resolve, before anything is written.
pub fn resolve_candidates(
    candidates: Vec<ParsedTransaction>,
    catalog: &CategoryCatalog,
) -> Result<Vec<NewTransaction>, ImportError> {
    candidates
        .into_iter()
        .map(|candidate| {
            let category = catalog
                .resolve(&candidate.category_name)
                .cloned()
                .ok_or_else(|| ImportError::FatalReconciliation {
                    category: candidate.category_name.clone(),
                })?;

            Ok(NewTransaction {
                title: candidate.title,
                value: candidate.value,
                kind: candidate.kind,
                category,
            })
        })
        .collect()
}

pub async fn materialize_transactions<S: TransactionStore>(
    store: &S,
    candidates: Vec<ParsedTransaction>,
    catalog: &CategoryCatalog,
) -> Result<Vec<Transaction>, ImportError> {
    let specs = resolve_candidates(candidates, catalog)?;
    if specs.is_empty() {
        return Ok(Vec::new());
    }

    let transactions = store.create_many(specs);
    store.save_many(&transactions).await?;

    Ok(transactions)
}
