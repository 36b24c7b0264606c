pub mod collector;
pub mod importer;
pub mod materializer;
pub mod reconciler;

#[cfg(test)]
mod unit_tests;

pub use importer::{ImportOptions, ImportPhase, TransactionImporter};
