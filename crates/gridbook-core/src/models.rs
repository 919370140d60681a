//! Core data models for the transaction grid

use chrono::NaiveDate;
use gridbook_utils::format_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Persistence status of a row
///
/// Rows move through an explicit lifecycle so the UI can render and retry
/// failures instead of silently losing an optimistic commit:
/// `New` -> `Saving` -> `Clean` | `SaveFailed`, and
/// `Clean` -> (edit committed) `Saving` -> `Clean` | `SaveFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    /// Matches the stored record
    #[default]
    Clean,
    /// Created locally, never persisted
    New,
    /// Edited locally, not yet sent to the save callback
    Updated,
    /// A save is in flight
    Saving,
    /// The save callback rejected; committed value was rolled back
    SaveFailed,
}

impl RowStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, RowStatus::Clean)
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowStatus::Clean => write!(f, "clean"),
            RowStatus::New => write!(f, "new"),
            RowStatus::Updated => write!(f, "updated"),
            RowStatus::Saving => write!(f, "saving"),
            RowStatus::SaveFailed => write!(f, "save-failed"),
        }
    }
}

/// A double-entry transfer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique record identifier, immutable after creation
    pub uid: String,
    /// Transfer date
    pub date: NaiveDate,
    /// Source account reference
    pub from: String,
    /// Destination account reference
    pub to: String,
    /// Transfer amount
    pub amount: Decimal,
    /// Free-text note
    #[serde(default)]
    pub note: String,
    /// Row lifecycle status, not part of the wire payload when clean
    #[serde(default, skip_serializing_if = "RowStatus::is_clean")]
    pub status: RowStatus,
}

impl Transaction {
    pub fn new(
        uid: impl Into<String>,
        date: NaiveDate,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Decimal,
        note: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            date,
            from: from.into(),
            to: to.into(),
            amount,
            note: note.into(),
            status: RowStatus::Clean,
        }
    }
}

/// Field keys for [`Transaction`] columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    From,
    To,
    Amount,
    Note,
}

impl std::str::FromStr for Field {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Field::Date),
            "from" => Ok(Field::From),
            "to" => Ok(Field::To),
            "amount" => Ok(Field::Amount),
            "note" => Ok(Field::Note),
            _ => Err(format!("Invalid field: {}", s)),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Date => write!(f, "date"),
            Field::From => write!(f, "from"),
            Field::To => write!(f, "to"),
            Field::Amount => write!(f, "amount"),
            Field::Note => write!(f, "note"),
        }
    }
}

/// A heterogeneously typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Option<Decimal>),
    Currency(Option<Decimal>),
    Date(Option<NaiveDate>),
    Select(Option<String>),
}

impl FieldValue {
    /// Natural ordering used for column sorting. Values of mismatched
    /// kinds compare equal so a stable sort leaves them in place.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Select(a), FieldValue::Select(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b))
            | (FieldValue::Currency(a), FieldValue::Currency(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Display string for a read-only cell
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Select(v) => v.clone().unwrap_or_default(),
            FieldValue::Number(Some(n)) => n.to_string(),
            FieldValue::Currency(Some(n)) => format!("Rp {}", format_amount(*n)),
            FieldValue::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Number(None) | FieldValue::Currency(None) | FieldValue::Date(None) => {
                String::new()
            }
        }
    }

    /// The decimal payload of numeric kinds, if any
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) | FieldValue::Currency(n) => *n,
            _ => None,
        }
    }
}

/// The seam that keeps the grid engine generic over record shapes.
///
/// A record exposes its identity, per-field cell access and its lifecycle
/// status. The engine never touches record fields directly.
pub trait TableRecord: Clone {
    /// Field key type, one variant per column
    type Field: Copy + Eq + std::fmt::Debug;

    /// Stable unique identifier
    fn uid(&self) -> &str;

    /// Read one field as a cell value
    fn get(&self, field: Self::Field) -> FieldValue;

    /// Write one field from a cell value; kind mismatches are ignored
    fn set(&mut self, field: Self::Field, value: FieldValue);

    /// A blank record with a freshly generated identifier
    fn fresh(uid: String) -> Self;

    fn status(&self) -> RowStatus;

    fn set_status(&mut self, status: RowStatus);
}

impl TableRecord for Transaction {
    type Field = Field;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::Date => FieldValue::Date(Some(self.date)),
            Field::From => FieldValue::Select(Some(self.from.clone())),
            Field::To => FieldValue::Select(Some(self.to.clone())),
            Field::Amount => FieldValue::Currency(Some(self.amount)),
            Field::Note => FieldValue::Text(self.note.clone()),
        }
    }

    fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::Date, FieldValue::Date(Some(d))) => self.date = d,
            (Field::From, FieldValue::Select(Some(v))) | (Field::From, FieldValue::Text(v)) => {
                self.from = v
            }
            (Field::To, FieldValue::Select(Some(v))) | (Field::To, FieldValue::Text(v)) => {
                self.to = v
            }
            (Field::Amount, FieldValue::Currency(Some(n)))
            | (Field::Amount, FieldValue::Number(Some(n))) => self.amount = n,
            (Field::Note, FieldValue::Text(v)) => self.note = v,
            _ => {}
        }
    }

    fn fresh(uid: String) -> Self {
        let mut record = Transaction::new(
            uid,
            chrono::Utc::now().date_naive(),
            "",
            "",
            Decimal::ZERO,
            "",
        );
        record.status = RowStatus::New;
        record
    }

    fn status(&self) -> RowStatus {
        self.status
    }

    fn set_status(&mut self, status: RowStatus) {
        self.status = status;
    }
}

/// One entry in a select column's option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOption {
    pub value: String,
    pub label: String,
}

impl AccountOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Equality and range filters over the transaction collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Exact match on the source account
    pub from: Option<String>,
    /// Exact match on the destination account
    pub to: Option<String>,
    /// Inclusive lower bound on the amount
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the amount
    pub max_amount: Option<Decimal>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(ref from) = self.from {
            if &tx.from != from {
                return false;
            }
        }
        if let Some(ref to) = self.to {
            if &tx.to != to {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if tx.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if tx.amount > max {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none()
            && self.to.is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }
}

// ==================== Tests ====================
