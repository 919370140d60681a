//! Transaction persistence
//!
//! [`TransactionRepository`] is the seam between the grid API and storage.
//! The only implementation here keeps everything in memory behind a
//! `RwLock`, which is all the scaffold needs; a database-backed
//! implementation would slot in behind the same trait.

use crate::error::CoreError;
use crate::models::{AccountOption, RowStatus, Transaction, TransactionFilter};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::RwLock;

/// One page of records plus the collection total
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }
}

/// Storage operations for transaction records
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// One page of the collection, newest first. `page` is 1-based.
    async fn list(
        &self,
        page: usize,
        page_size: usize,
        filter: &TransactionFilter,
    ) -> Result<Page<Transaction>, CoreError>;

    /// Prepend a batch of new records. Fails on a duplicate uid.
    async fn create(&self, batch: Vec<Transaction>) -> Result<(), CoreError>;

    /// Replace existing records in place. Fails on an unknown uid.
    async fn update(&self, batch: Vec<Transaction>) -> Result<(), CoreError>;

    /// Remove records by uid, returning what was actually removed.
    /// Unknown uids are skipped.
    async fn delete(&self, uids: Vec<String>) -> Result<Vec<Transaction>, CoreError>;

    async fn total(&self) -> Result<usize, CoreError>;
}

/// In-memory repository, the mock data source for the scaffold
pub struct MemoryRepository {
    rows: RwLock<Vec<Transaction>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Repository pre-loaded with the demo transaction set
    pub fn seeded() -> Self {
        Self {
            rows: RwLock::new(seed_transactions()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn list(
        &self,
        page: usize,
        page_size: usize,
        filter: &TransactionFilter,
    ) -> Result<Page<Transaction>, CoreError> {
        if page_size == 0 {
            return Err(CoreError::invalid_payload("page_size must be positive"));
        }
        let rows = self.rows.read().unwrap();
        let filtered: Vec<&Transaction> = rows.iter().filter(|tx| filter.matches(tx)).collect();
        let total_count = filtered.len();
        let page = page.max(1);
        let start = (page - 1) * page_size;
        let items = filtered
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total_count,
            page,
            page_size,
        })
    }

    async fn create(&self, batch: Vec<Transaction>) -> Result<(), CoreError> {
        let mut rows = self.rows.write().unwrap();
        for tx in &batch {
            if rows.iter().any(|existing| existing.uid == tx.uid) {
                return Err(CoreError::DuplicateUid {
                    uid: tx.uid.clone(),
                });
            }
        }
        log::info!("Creating {} transaction(s)", batch.len());
        // new records go to the head so they show on the first page
        rows.splice(0..0, batch);
        Ok(())
    }

    async fn update(&self, batch: Vec<Transaction>) -> Result<(), CoreError> {
        let mut rows = self.rows.write().unwrap();
        for tx in batch {
            let position = rows
                .iter()
                .position(|existing| existing.uid == tx.uid)
                .ok_or_else(|| CoreError::not_found(&tx.uid))?;
            let mut stored = tx;
            stored.status = RowStatus::Clean;
            rows[position] = stored;
        }
        Ok(())
    }

    async fn delete(&self, uids: Vec<String>) -> Result<Vec<Transaction>, CoreError> {
        let mut rows = self.rows.write().unwrap();
        let mut removed = Vec::new();
        for uid in uids {
            match rows.iter().position(|existing| existing.uid == uid) {
                Some(position) => removed.push(rows.remove(position)),
                None => log::warn!("Delete skipped unknown transaction: {}", uid),
            }
        }
        log::info!("Deleted {} transaction(s)", removed.len());
        Ok(removed)
    }

    async fn total(&self) -> Result<usize, CoreError> {
        Ok(self.rows.read().unwrap().len())
    }
}

/// The demo transaction set
pub fn seed_transactions() -> Vec<Transaction> {
    let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap_or_default();
    vec![
        Transaction::new(
            "txn-1",
            date,
            "11.01.01",
            "61.01.01",
            Decimal::from(75_626),
            "Adjustment",
        ),
        Transaction::new(
            "txn-2",
            date,
            "11.03.03",
            "61.01.01",
            Decimal::from(593_473),
            "Adjustment",
        ),
        Transaction::new(
            "txn-3",
            date,
            "11.01.03",
            "61.01.01",
            Decimal::from(6_403_971),
            "Adjustment",
        ),
        Transaction::new(
            "txn-4",
            date,
            "11.01.03",
            "51.01.03",
            Decimal::from(18_900),
            "Shampoo",
        ),
        Transaction::new(
            "txn-5",
            date,
            "11.01.03",
            "52.01.03",
            Decimal::from(17_000),
            "Fit me up",
        ),
    ]
}

/// The demo account list for the From/To select columns
pub fn seed_accounts() -> Vec<AccountOption> {
    vec![
        AccountOption::new("11.01.01", "11.01.01 - Mandiri - Main"),
        AccountOption::new("11.01.03", "11.01.03 - Jago - Main"),
        AccountOption::new("11.03.03", "11.03.03 - Dipay"),
        AccountOption::new("51.01.03", "51.01.03 - Toiletries"),
        AccountOption::new("52.01.03", "52.01.03 - Snack"),
        AccountOption::new("61.01.01", "61.01.01 - Reclass Adjustments"),
    ]
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RowStatus;

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let repo = MemoryRepository::seeded();
        let filter = TransactionFilter::default();

        let page = repo.list(1, 2, &filter).await.unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].uid, "txn-1");

        let last = repo.list(3, 2, &filter).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].uid, "txn-5");
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let repo = MemoryRepository::seeded();
        let tx = Transaction::new(
            "txn-6",
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            "11.01.01",
            "52.01.03",
            Decimal::from(5000),
            "Coffee",
        );
        repo.create(vec![tx]).await.unwrap();

        let page = repo
            .list(1, 10, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 6);
        assert_eq!(page.items[0].uid, "txn-6");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_uid() {
        let repo = MemoryRepository::seeded();
        let dup = seed_transactions().remove(0);
        let err = repo.create(vec![dup]).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateUid { .. }));
    }

    #[tokio::test]
    async fn test_update_replaces_and_cleans_status() {
        let repo = MemoryRepository::seeded();
        let mut tx = seed_transactions().remove(0);
        tx.amount = Decimal::from(99_999);
        tx.status = RowStatus::Saving;
        repo.update(vec![tx]).await.unwrap();

        let page = repo
            .list(1, 10, &TransactionFilter::default())
            .await
            .unwrap();
        let stored = page.items.iter().find(|t| t.uid == "txn-1").unwrap();
        assert_eq!(stored.amount, Decimal::from(99_999));
        assert_eq!(stored.status, RowStatus::Clean);
    }

    #[tokio::test]
    async fn test_update_unknown_uid_fails() {
        let repo = MemoryRepository::seeded();
        let mut tx = seed_transactions().remove(0);
        tx.uid = "txn-missing".to_string();
        let err = repo.update(vec![tx]).await.unwrap_err();
        assert!(matches!(err, CoreError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_skips_unknown() {
        let repo = MemoryRepository::seeded();
        let removed = repo
            .delete(vec!["txn-2".to_string(), "txn-missing".to_string()])
            .await
            .unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].uid, "txn-2");
        assert_eq!(repo.total().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let repo = MemoryRepository::seeded();
        let filter = TransactionFilter {
            from: Some("11.01.03".to_string()),
            min_amount: Some(Decimal::from(18_000)),
            ..Default::default()
        };
        let page = repo.list(1, 10, &filter).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert!(page
            .items
            .iter()
            .all(|t| t.from == "11.01.03" && t.amount >= Decimal::from(18_000)));
    }
}
