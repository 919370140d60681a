//! Column configuration for the grid
//!
//! A column maps one record field to a label, an input kind and optional
//! behavior overrides. Select columns carry an asynchronous option source
//! so the account list can come from anywhere.

use crate::error::CoreError;
use crate::models::{AccountOption, Field};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input kind tag for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    #[default]
    Text,
    Textarea,
    Number,
    Currency,
    Date,
    Select,
}

/// Asynchronous provider of select-column options
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn options(&self) -> Result<Vec<AccountOption>, CoreError>;
}

/// Option source backed by a fixed in-memory list
pub struct StaticOptions {
    options: Vec<AccountOption>,
}

impl StaticOptions {
    pub fn new(options: Vec<AccountOption>) -> Self {
        Self { options }
    }
}

#[async_trait]
impl OptionSource for StaticOptions {
    async fn options(&self) -> Result<Vec<AccountOption>, CoreError> {
        Ok(self.options.clone())
    }
}

/// Configuration for one grid column
#[derive(Clone)]
pub struct ColumnSpec<F> {
    /// Record field rendered by this column
    pub field: F,
    /// Header label
    pub label: String,
    /// Input kind used for editing and display formatting
    pub input: InputKind,
    /// Preferred width hint
    pub size: Option<u16>,
    /// Minimum width hint
    pub min_size: Option<u16>,
    /// Maximum width hint
    pub max_size: Option<u16>,
    /// Per-column override of the grid-level sortable flag
    pub sortable: Option<bool>,
    /// Per-column override of the grid-level editable flag
    pub editable: Option<bool>,
    /// Per-column override of the grid-level filterable flag
    pub filterable: Option<bool>,
    /// Option source for select columns
    pub options: Option<Arc<dyn OptionSource>>,
}

impl<F: Copy + Eq> ColumnSpec<F> {
    pub fn new(field: F, label: impl Into<String>, input: InputKind) -> Self {
        Self {
            field,
            label: label.into(),
            input,
            size: None,
            min_size: None,
            max_size: None,
            sortable: None,
            editable: None,
            filterable: None,
            options: None,
        }
    }

    pub fn size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    pub fn min_size(mut self, min_size: u16) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn max_size(mut self, max_size: u16) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn with_options(mut self, source: Arc<dyn OptionSource>) -> Self {
        self.options = Some(source);
        self
    }

    /// Effective sortable flag: column override, else the grid default
    pub fn is_sortable(&self, grid_default: bool) -> bool {
        self.sortable.unwrap_or(grid_default)
    }

    /// Effective editable flag: column override, else the grid default
    pub fn is_editable(&self, grid_default: bool) -> bool {
        self.editable.unwrap_or(grid_default)
    }

    /// Effective filterable flag: column override, else the grid default
    pub fn is_filterable(&self, grid_default: bool) -> bool {
        self.filterable.unwrap_or(grid_default)
    }
}

impl<F: std::fmt::Debug> std::fmt::Debug for ColumnSpec<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("input", &self.input)
            .field("has_options", &self.options.is_some())
            .finish()
    }
}

/// The canonical column set for the transaction grid
pub fn transaction_columns(accounts: Arc<dyn OptionSource>) -> Vec<ColumnSpec<Field>> {
    vec![
        ColumnSpec::new(Field::Date, "Date", InputKind::Date).min_size(100),
        ColumnSpec::new(Field::From, "From", InputKind::Select)
            .size(100)
            .min_size(200)
            .with_options(accounts.clone()),
        ColumnSpec::new(Field::To, "To", InputKind::Select)
            .size(100)
            .min_size(200)
            .with_options(accounts),
        ColumnSpec::new(Field::Amount, "Amount", InputKind::Currency)
            .size(100)
            .min_size(200),
        ColumnSpec::new(Field::Note, "Note", InputKind::Textarea)
            .size(100)
            .min_size(400)
            .max_size(600)
            .filterable(false),
    ]
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_overrides() {
        let col = ColumnSpec::new(Field::Amount, "Amount", InputKind::Currency).sortable(false);
        assert!(!col.is_sortable(true));
        assert!(!col.is_editable(false));
        assert!(col.is_editable(true));
        assert!(col.is_filterable(true));
        assert!(!col.is_filterable(false));
    }

    #[test]
    fn test_filterable_and_size_overrides() {
        let col = ColumnSpec::new(Field::Note, "Note", InputKind::Textarea)
            .max_size(600)
            .filterable(false);
        assert_eq!(col.max_size, Some(600));
        assert!(!col.is_filterable(true));

        let columns = transaction_columns(Arc::new(StaticOptions::new(vec![])));
        let note = &columns[4];
        assert!(!note.is_filterable(true));
        assert!(columns[3].is_filterable(true));
    }

    #[test]
    fn test_transaction_columns_shape() {
        let accounts: Arc<dyn OptionSource> = Arc::new(StaticOptions::new(vec![]));
        let columns = transaction_columns(accounts);
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0].input, InputKind::Date);
        assert!(columns[1].options.is_some());
        assert!(columns[2].options.is_some());
        assert_eq!(columns[3].input, InputKind::Currency);
        assert!(columns[4].options.is_none());
    }

    #[tokio::test]
    async fn test_static_options() {
        let source = StaticOptions::new(vec![AccountOption::new("cash", "Cash")]);
        let options = source.options().await.unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "cash");
    }
}
