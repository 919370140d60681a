//! Transaction routes

pub mod api;
pub mod page;

pub use api::{
    api_transaction_summary, api_transactions, api_transactions_create, api_transactions_delete,
    api_transactions_update,
};
pub use page::page_transactions;
