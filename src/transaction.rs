use crate::category::Category;
use crate::error::RowFormatError;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One data line of the import file, cells named by position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub title: String,
    pub kind: String,
    pub value: String,
    pub category: String,
}

impl RawRow {
    pub fn from_record(record: &csv::StringRecord) -> Self {
        let cell = |index: usize| record.get(index).unwrap_or_default().to_string();
        Self {
            title: cell(0),
            kind: cell(1),
            value: cell(2),
            category: cell(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Outcome,
}

impl FromStr for TransactionType {
    type Err = RowFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if s.eq_ignore_ascii_case("outcome") {
            Ok(TransactionType::Outcome)
        } else {
            Err(RowFormatError::InvalidType(s.to_string()))
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Outcome => write!(f, "outcome"),
        }
    }
}

/// A validated row waiting for its category to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub title: String,
    pub value: Decimal,
    pub kind: TransactionType,
    pub category_name: String,
}

impl TryFrom<RawRow> for ParsedTransaction {
    type Error = RowFormatError;

    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        // Category may be empty, the other three may not
        if row.title.is_empty() {
            return Err(RowFormatError::MissingField("title"));
        }
        if row.kind.is_empty() {
            return Err(RowFormatError::MissingField("type"));
        }
        if row.value.is_empty() {
            return Err(RowFormatError::MissingField("value"));
        }

        let kind = row.kind.parse::<TransactionType>()?;
        // rust_decimal skips '_' separators, a plain decimal has none
        if row.value.contains('_') {
            return Err(RowFormatError::InvalidValue(row.value));
        }
        let value = Decimal::from_str(&row.value)
            .map_err(|_| RowFormatError::InvalidValue(row.value.clone()))?;

        Ok(ParsedTransaction {
            title: row.title,
            value,
            kind,
            category_name: row.category,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the transaction store needs to build a pending transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub title: String,
    pub value: Decimal,
    pub kind: TransactionType,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub value: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
}

impl Transaction {
    pub fn new(spec: NewTransaction) -> Self {
        Self {
            id: TransactionId(Uuid::new_v4()),
            title: spec.title,
            value: spec.value,
            kind: spec.kind,
            category: spec.category,
        }
    }
}
