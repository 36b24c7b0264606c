pub mod category;
pub mod error;
pub mod import;
pub mod parser;
pub mod store;
pub mod transaction;

pub use category::{Category, CategoryCatalog, CategoryId};
pub use error::{ImportError, RowFormatError, StoreError};
pub use import::{ImportOptions, ImportPhase, TransactionImporter};
pub use parser::{open_rows, RowReader};
pub use store::memory::InMemoryLedger;
pub use store::{CategoryStore, TransactionStore};
pub use transaction::{ParsedTransaction, RawRow, Transaction, TransactionId, TransactionType};
