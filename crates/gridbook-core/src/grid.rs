//! The editable grid engine
//!
//! [`Grid`] owns a loaded collection of records plus view state (sort,
//! filter, page, selection, the single edit draft) and exposes the
//! draft/commit lifecycle. It performs no I/O: persistence is delegated to
//! the caller through the payloads returned by [`Grid::commit_edit`] and
//! [`Grid::delete_selected`], and server-side paging is driven through
//! [`FetchRequest`] tokens.

use crate::columns::{ColumnSpec, InputKind};
use crate::error::CoreError;
use crate::models::{FieldValue, RowStatus, TableRecord};
use gridbook_config::PagingMode;
use gridbook_utils::parse_amount;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Grid-level behavior flags and paging setup
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Default editable flag, overridable per column
    pub editable: bool,
    /// Default sortable flag, overridable per column
    pub sortable: bool,
    /// Records per page
    pub page_size: usize,
    /// Client-side slicing or server-side fetching; fixed for the
    /// lifetime of the grid
    pub paging: PagingMode,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            editable: false,
            sortable: false,
            page_size: 5,
            paging: PagingMode::Client,
        }
    }
}

/// Sort direction for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

/// Records handed to the save callback after a commit
#[derive(Debug, Clone, PartialEq)]
pub struct SavePayload<R> {
    pub added: Vec<R>,
    pub updated: Vec<R>,
}

/// Records handed to the delete callback
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePayload<R> {
    pub deleted: Vec<R>,
}

/// A server-side page fetch keyed by a monotonically increasing token.
///
/// The token lets the grid ignore responses that arrive out of order after
/// rapid page changes; only the latest issued token is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub page: usize,
    pub page_size: usize,
}

/// Result of a page or page-size change
#[derive(Debug)]
pub struct PageChange<R> {
    /// Fetch to perform (server paging only)
    pub fetch: Option<FetchRequest>,
    /// Draft that was abandoned because its row left the current page
    pub abandoned: Option<R>,
}

/// Aggregates over the filtered collection
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: Decimal,
    pub average: Decimal,
}

/// One row of the rendered page
#[derive(Debug, Clone)]
pub struct RowView<R> {
    /// Committed record, or the draft for the row under edit
    pub record: R,
    pub editing: bool,
    pub selected: bool,
}

/// Pure rendering snapshot of the current grid state
#[derive(Debug, Clone)]
pub struct GridView<R: TableRecord> {
    pub rows: Vec<RowView<R>>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub sort: Option<SortState<R::Field>>,
}

struct Draft<R> {
    uid: String,
    record: R,
}

/// Generic editable, sortable, paginated table over [`TableRecord`]s
pub struct Grid<R: TableRecord> {
    columns: Vec<ColumnSpec<R::Field>>,
    options: GridOptions,
    rows: Vec<R>,
    total_count: usize,
    page: usize,
    sort: Option<SortState<R::Field>>,
    filter: Option<Box<dyn Fn(&R) -> bool + Send + Sync>>,
    editing: Option<Draft<R>>,
    // uid -> committed value before the optimistic commit, for rollback
    pending: HashMap<String, R>,
    selected: BTreeSet<String>,
    fetch_token: u64,
}

impl<R: TableRecord> Grid<R> {
    pub fn new(columns: Vec<ColumnSpec<R::Field>>, options: GridOptions) -> Self {
        Self {
            columns,
            options,
            rows: Vec::new(),
            total_count: 0,
            page: 1,
            sort: None,
            filter: None,
            editing: None,
            pending: HashMap::new(),
            selected: BTreeSet::new(),
            fetch_token: 0,
        }
    }

    /// Load the full collection (client paging) or the initial page
    pub fn with_rows(mut self, rows: Vec<R>) -> Self {
        self.total_count = rows.len();
        self.rows = rows;
        self
    }

    pub fn columns(&self) -> &[ColumnSpec<R::Field>] {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.options.page_size - 1) / self.options.page_size
        }
    }

    pub fn can_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn can_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn sort_state(&self) -> Option<SortState<R::Field>> {
        self.sort
    }

    pub fn is_editing(&self, uid: &str) -> bool {
        self.editing.as_ref().map(|d| d.uid.as_str()) == Some(uid)
    }

    // ==================== Rendering ====================

    /// Filtered and sorted indices into `rows`, in display order.
    /// `Vec::sort_by` is stable, so equal sort keys keep their original
    /// relative order.
    fn ordered_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| match &self.filter {
                Some(f) => f(&self.rows[i]),
                None => true,
            })
            .collect();

        if let Some(sort) = self.sort {
            indices.sort_by(|&a, &b| {
                let ord = self.rows[a]
                    .get(sort.field)
                    .compare(&self.rows[b].get(sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        indices
    }

    /// Indices of the rows on the current page, in display order
    fn page_indices(&self) -> Vec<usize> {
        let ordered = self.ordered_indices();
        match self.options.paging {
            // Server paging: the loaded rows already are one page
            PagingMode::Server => ordered,
            PagingMode::Client => {
                let start = (self.page.saturating_sub(1)) * self.options.page_size;
                ordered
                    .into_iter()
                    .skip(start)
                    .take(self.options.page_size)
                    .collect()
            }
        }
    }

    fn page_contains(&self, uid: &str) -> bool {
        self.page_indices()
            .into_iter()
            .any(|i| self.rows[i].uid() == uid)
    }

    /// Snapshot of the current page for rendering. Pure: no state change,
    /// no I/O. The row under edit carries its draft value.
    pub fn view(&self) -> GridView<R> {
        let rows = self
            .page_indices()
            .into_iter()
            .map(|i| {
                let committed = &self.rows[i];
                let (record, editing) = match &self.editing {
                    Some(draft) if draft.uid == committed.uid() => (draft.record.clone(), true),
                    _ => (committed.clone(), false),
                };
                let selected = self.selected.contains(committed.uid());
                RowView {
                    record,
                    editing,
                    selected,
                }
            })
            .collect();

        GridView {
            rows,
            page: self.page,
            page_size: self.options.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages(),
            sort: self.sort,
        }
    }

    // ==================== Edit lifecycle ====================

    /// Snapshot a record into a draft and mark its row as editing.
    ///
    /// Returns false without touching state when the grid is not editable,
    /// when another row is already being edited (the at-most-one-editor
    /// invariant is enforced by ignoring the request), or when the target
    /// is not on the current page.
    pub fn begin_edit(&mut self, uid: &str) -> bool {
        if !self.options.editable || self.editing.is_some() || !self.page_contains(uid) {
            return false;
        }
        match self.rows.iter().find(|r| r.uid() == uid) {
            Some(record) => {
                self.editing = Some(Draft {
                    uid: uid.to_string(),
                    record: record.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Update one field of the active draft from raw input.
    ///
    /// The input is parsed according to the column's input kind; a numeric
    /// or date input that does not parse leaves the previous value in
    /// place rather than raising a validation error. Only the draft is
    /// mutated, never the committed collection.
    pub fn update_draft(&mut self, uid: &str, field: R::Field, raw: &str) -> Result<(), CoreError> {
        let kind = self
            .columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.input)
            .unwrap_or(InputKind::Text);

        let value = match kind {
            InputKind::Number => match parse_amount(raw) {
                Some(n) => FieldValue::Number(Some(n)),
                None => return self.require_draft(uid).map(|_| ()),
            },
            InputKind::Currency => match parse_amount(raw) {
                Some(n) => FieldValue::Currency(Some(n)),
                None => return self.require_draft(uid).map(|_| ()),
            },
            InputKind::Date => match chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => FieldValue::Date(Some(d)),
                Err(_) => return self.require_draft(uid).map(|_| ()),
            },
            InputKind::Select => FieldValue::Select(Some(raw.to_string())),
            InputKind::Text | InputKind::Textarea => FieldValue::Text(raw.to_string()),
        };

        self.update_draft_value(uid, field, value)
    }

    /// Update one field of the active draft with an already typed value
    pub fn update_draft_value(
        &mut self,
        uid: &str,
        field: R::Field,
        value: FieldValue,
    ) -> Result<(), CoreError> {
        let draft = self.require_draft(uid)?;
        draft.record.set(field, value);
        Ok(())
    }

    fn require_draft(&mut self, uid: &str) -> Result<&mut Draft<R>, CoreError> {
        match self.editing {
            Some(ref mut draft) if draft.uid == uid => Ok(draft),
            _ => Err(CoreError::NotEditing {
                uid: uid.to_string(),
            }),
        }
    }

    /// Replace the committed record with the draft and clear the edit
    /// state. The row is marked `Saving` and the previous committed value
    /// is retained so a rejected save can be rolled back via
    /// [`Grid::resolve_save`]. The returned payload is what the caller
    /// should hand to its save callback.
    pub fn commit_edit(&mut self, uid: &str) -> Result<SavePayload<R>, CoreError> {
        match self.editing.take() {
            Some(draft) if draft.uid == uid => {
                let position = self
                    .rows
                    .iter()
                    .position(|r| r.uid() == uid)
                    .ok_or_else(|| CoreError::not_found(uid))?;

                let previous = self.rows[position].clone();
                let was_new = previous.status() == RowStatus::New;

                let mut record = draft.record;
                record.set_status(RowStatus::Saving);
                self.rows[position] = record.clone();
                self.pending.insert(uid.to_string(), previous);

                Ok(if was_new {
                    SavePayload {
                        added: vec![record],
                        updated: vec![],
                    }
                } else {
                    SavePayload {
                        added: vec![],
                        updated: vec![record],
                    }
                })
            }
            other => {
                self.editing = other;
                Err(CoreError::NotEditing {
                    uid: uid.to_string(),
                })
            }
        }
    }

    /// Report the outcome of the save callback for a committed row.
    ///
    /// Success marks the row clean. Failure restores the pre-commit value
    /// and flags the row `SaveFailed` so the rejection is visible and the
    /// edit can be retried.
    pub fn resolve_save(&mut self, uid: &str, success: bool) -> Result<(), CoreError> {
        let previous = self
            .pending
            .remove(uid)
            .ok_or_else(|| CoreError::not_found(uid))?;
        let position = self
            .rows
            .iter()
            .position(|r| r.uid() == uid)
            .ok_or_else(|| CoreError::not_found(uid))?;

        if success {
            self.rows[position].set_status(RowStatus::Clean);
        } else {
            let mut restored = previous;
            restored.set_status(RowStatus::SaveFailed);
            self.rows[position] = restored;
        }
        Ok(())
    }

    /// Drop the draft; the committed record is unchanged. Cancelling a row
    /// that is not being edited is a no-op.
    pub fn cancel_edit(&mut self, uid: &str) {
        if self.is_editing(uid) {
            self.editing = None;
        }
    }

    // ==================== Row lifecycle ====================

    /// Insert a blank record with a fresh identifier at the head of the
    /// collection. The new row is editable through its `New` status, not
    /// through the draft mechanism. Returns the generated uid.
    pub fn add_row(&mut self) -> String {
        let uid = Uuid::new_v4().to_string();
        self.rows.insert(0, R::fresh(uid.clone()));
        self.total_count += 1;
        uid
    }

    /// Remove a record from the in-memory collection. No backend
    /// round-trip happens here; callers persist deletions separately.
    pub fn remove_row(&mut self, uid: &str) -> Option<R> {
        let position = self.rows.iter().position(|r| r.uid() == uid)?;
        if self.is_editing(uid) {
            self.editing = None;
        }
        self.pending.remove(uid);
        self.selected.remove(uid);
        self.total_count = self.total_count.saturating_sub(1);
        let removed = self.rows.remove(position);
        self.clamp_page();
        Some(removed)
    }

    /// Discard a freshly added row that was never saved
    pub fn cancel_add_row(&mut self, uid: &str) -> Option<R> {
        self.remove_row(uid)
    }

    // ==================== Sort / filter / paging ====================

    /// Sort by a column, toggling direction when the same column is
    /// re-selected. Returns the abandoned draft if the edited row left the
    /// current page as a result.
    pub fn sort_by(&mut self, field: R::Field) -> Option<R> {
        let sortable = self
            .columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.is_sortable(self.options.sortable))
            .unwrap_or(self.options.sortable);
        if !sortable {
            return None;
        }

        self.sort = Some(match self.sort {
            Some(current) if current.field == field => SortState {
                field,
                direction: current.direction.toggle(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Asc,
            },
        });

        self.abandon_offpage_draft()
    }

    /// Install a row filter and return to the first page
    pub fn set_filter(&mut self, filter: impl Fn(&R) -> bool + Send + Sync + 'static) -> Option<R> {
        self.filter = Some(Box::new(filter));
        self.page = 1;
        self.abandon_offpage_draft()
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.page = 1;
    }

    /// Change the current page. In server mode this issues a fetch request
    /// the caller must satisfy through [`Grid::apply_fetch`].
    pub fn set_page(&mut self, page: usize) -> PageChange<R> {
        self.page = page.clamp(1, self.total_pages().max(1));
        self.page_change()
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> PageChange<R> {
        if page_size > 0 {
            self.options.page_size = page_size;
        }
        self.page = 1;
        self.page_change()
    }

    fn page_change(&mut self) -> PageChange<R> {
        match self.options.paging {
            PagingMode::Server => {
                // The loaded rows are about to be replaced; any draft is lost
                let abandoned = self.editing.take().map(|d| d.record);
                PageChange {
                    fetch: Some(self.next_fetch()),
                    abandoned,
                }
            }
            PagingMode::Client => PageChange {
                fetch: None,
                abandoned: self.abandon_offpage_draft(),
            },
        }
    }

    /// Fetch request for the current page (server mode startup)
    pub fn initial_fetch(&mut self) -> FetchRequest {
        self.next_fetch()
    }

    fn next_fetch(&mut self) -> FetchRequest {
        self.fetch_token += 1;
        FetchRequest {
            token: self.fetch_token,
            page: self.page,
            page_size: self.options.page_size,
        }
    }

    /// Install a fetched page. A response whose token is not the most
    /// recently issued one is stale and ignored, so rapid page changes
    /// cannot resolve out of order and clobber newer state.
    pub fn apply_fetch(&mut self, token: u64, rows: Vec<R>, total_count: usize) -> bool {
        if token != self.fetch_token {
            log::debug!(
                "Ignoring stale fetch response (token {} < {})",
                token,
                self.fetch_token
            );
            return false;
        }
        self.rows = rows;
        self.total_count = total_count;
        true
    }

    /// Replace the whole loaded collection (client paging)
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.total_count = rows.len();
        self.rows = rows;
        self.editing = None;
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }

    fn abandon_offpage_draft(&mut self) -> Option<R> {
        let uid = self.editing.as_ref()?.uid.clone();
        if self.page_contains(&uid) {
            None
        } else {
            self.editing.take().map(|d| d.record)
        }
    }

    /// Page numbers to render around the current page, in the style of a
    /// windowed pagination bar
    pub fn page_range(&self, visible_count: usize) -> Vec<usize> {
        let total = self.total_pages() as isize;
        let visible = visible_count.max(1) as isize;
        let half = visible / 2;

        let mut start = self.page as isize - half;
        let mut end = self.page as isize + half;

        if start < 1 {
            start = 1;
            end = visible;
        }
        if end > total {
            end = total;
            start = total - visible + 1;
        }
        start = start.max(1);

        (start..=end).map(|p| p as usize).collect()
    }

    // ==================== Selection ====================

    pub fn toggle_select(&mut self, uid: &str) -> bool {
        if self.selected.remove(uid) {
            false
        } else {
            self.selected.insert(uid.to_string());
            true
        }
    }

    /// Select every row on the current page, or clear the selection when
    /// the whole page is already selected
    pub fn select_all_page(&mut self) {
        let page_uids: Vec<String> = self
            .page_indices()
            .into_iter()
            .map(|i| self.rows[i].uid().to_string())
            .collect();
        let all_selected =
            !page_uids.is_empty() && page_uids.iter().all(|uid| self.selected.contains(uid));

        if all_selected {
            for uid in &page_uids {
                self.selected.remove(uid);
            }
        } else {
            self.selected.extend(page_uids);
        }
    }

    pub fn selected_uids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Remove every selected row from the collection and return them for
    /// the caller's delete callback
    pub fn delete_selected(&mut self) -> DeletePayload<R> {
        let uids = self.selected_uids();
        let mut deleted = Vec::with_capacity(uids.len());
        for uid in uids {
            if let Some(record) = self.remove_row(&uid) {
                deleted.push(record);
            }
        }
        self.selected.clear();
        DeletePayload { deleted }
    }

    // ==================== Aggregates ====================

    /// Count, total and average of a numeric column over the filtered
    /// collection (all loaded rows, not just the current page)
    pub fn summarize(&self, field: R::Field) -> Summary {
        let values: Vec<Decimal> = self
            .rows
            .iter()
            .filter(|r| match &self.filter {
                Some(f) => f(r),
                None => true,
            })
            .filter_map(|r| r.get(field).as_decimal())
            .collect();

        let count = values.len();
        let total: Decimal = values.iter().sum();
        let average = if count > 0 {
            total / Decimal::from(count as i64)
        } else {
            Decimal::ZERO
        };
        Summary {
            count,
            total,
            average,
        }
    }
}

// ==================== Tests ====================
