//! Core library for Gridbook
//!
//! Provides the generic editable grid engine, the transaction data model
//! and the repository seam the HTTP API is built on. The engine is
//! deliberately free of I/O: it produces payloads and fetch requests that
//! callers resolve against a [`repo::TransactionRepository`].

pub mod columns;
pub mod error;
pub mod grid;
pub mod models;
pub mod repo;

pub use columns::{transaction_columns, ColumnSpec, InputKind, OptionSource, StaticOptions};
pub use error::CoreError;
pub use grid::{
    DeletePayload, FetchRequest, Grid, GridOptions, GridView, PageChange, RowView, SavePayload,
    SortDirection, SortState, Summary,
};
pub use models::{
    AccountOption, Field, FieldValue, RowStatus, TableRecord, Transaction, TransactionFilter,
};
pub use repo::{seed_accounts, seed_transactions, MemoryRepository, Page, TransactionRepository};
