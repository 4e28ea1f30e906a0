//! Derived table views.
//!
//! `TableView` owns a record collection together with all query state (raw
//! and settled search text, filter map, sort spec, pagination) and keeps a
//! derived index mapping into the collection, rebuilt by running the
//! Search -> Filter -> Sort stages whenever a relevant input changes. The
//! visible page is a window cut from that mapping on read. A fingerprint of
//! the inputs guards the rebuild, so repeated recomputes with unchanged
//! state are cheap.

use crate::error::ViewError;
use crate::pager::Pager;
use crate::settle::SettleEmitter;
use crate::value::FieldValue;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Maps `(record, field name)` to a field value. `None` means the record
/// has no such field; the engine treats that as a non-match, never an
/// error.
pub type FieldAccessor<T> = Box<dyn Fn(&T, &str) -> Option<FieldValue>>;

/// Caller-supplied filter semantics. The engine defines no per-key
/// interpretation of the filter map; without a predicate, filters are inert
/// metadata.
pub type FilterPredicate<T> = Box<dyn Fn(&T, &HashMap<String, FieldValue>) -> bool>;

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Field and direction for the sort stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Configuration for a [`TableView`], built around the mandatory field
/// accessor.
///
/// # Examples
///
/// ```
/// use tableview::{FieldValue, ViewOptions};
///
/// struct User { name: String }
///
/// let options = ViewOptions::new(|user: &User, field| match field {
///         "name" => Some(FieldValue::from(user.name.as_str())),
///         _ => None,
///     })
///     .search_fields(&["name"])
///     .page_size(25);
/// # let _ = options;
/// ```
pub struct ViewOptions<T> {
    accessor: FieldAccessor<T>,
    search_fields: Vec<String>,
    sort: Option<SortSpec>,
    filter: Option<FilterPredicate<T>>,
    page_size: usize,
    settle_delay: Duration,
}

impl<T> ViewOptions<T> {
    pub fn new<F>(accessor: F) -> Self
    where
        F: Fn(&T, &str) -> Option<FieldValue> + 'static,
    {
        ViewOptions {
            accessor: Box::new(accessor),
            search_fields: Vec::new(),
            sort: None,
            filter: None,
            page_size: DEFAULT_PAGE_SIZE,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Fields the search stage matches against. With none configured the
    /// stage passes every record through.
    pub fn search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Initial sort spec.
    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Install the filter predicate interpreting the filter map.
    pub fn filter_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, &HashMap<String, FieldValue>) -> bool + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Rows per page. Defaults to 10; zero is rejected by
    /// [`TableView::new`].
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Quiet period before raw search input settles. Defaults to 300ms.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// Page-level metadata of the derived view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_count: usize,
    pub filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Owned copy of the visible page plus its metadata, for handing across an
/// API boundary (serializes to JSON when `T` does).
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<T> {
    pub rows: Vec<T>,
    pub page: PageInfo,
}

/// Everything the derived index mapping depends on. Pagination is excluded:
/// the mapping is page-independent and the window is cut on read.
#[derive(Debug, Clone, PartialEq)]
struct Fingerprint {
    records_generation: u64,
    filters_generation: u64,
    settled_query: String,
    sort: Option<SortSpec>,
}

/// A searched, filtered, sorted, and paginated view over an in-memory
/// record collection.
///
/// The record type stays opaque: every stage reaches into records only
/// through the caller-supplied accessor. All operations are synchronous and
/// single-owner; the only deferred work is the search settle, which the
/// owner drives by calling [`TableView::poll`] with the current time.
///
/// # Examples
///
/// ```
/// use tableview::{json_accessor, TableView, ViewOptions};
/// use serde_json::json;
/// use std::time::Instant;
///
/// let records = vec![
///     json!({"name": "Widget", "price": 9.99}),
///     json!({"name": "Gadget", "price": 19.99}),
///     json!({"name": "Doohickey", "price": 4.99}),
/// ];
///
/// let mut view = TableView::new(
///     records,
///     ViewOptions::new(json_accessor()).search_fields(&["name"]).page_size(2),
/// ).unwrap();
///
/// assert_eq!(view.total_count(), 3);
/// assert_eq!(view.visible().len(), 2);
/// assert!(view.has_next_page());
///
/// view.search("gad", Instant::now());
/// view.flush_search();
/// assert_eq!(view.filtered_count(), 1);
/// ```
pub struct TableView<T> {
    records: Vec<T>,
    accessor: FieldAccessor<T>,
    search_fields: Vec<String>,
    filter: Option<FilterPredicate<T>>,

    raw_query: String,
    settled_query: String,
    emitter: SettleEmitter<String>,
    filters: HashMap<String, FieldValue>,
    sort: Option<SortSpec>,
    pager: Pager,

    /// Bumped on every record-store change; invalidation token for the
    /// fingerprint.
    records_generation: u64,
    /// Bumped on every filter-map change.
    filters_generation: u64,

    /// Filtered, sorted indices into `records`.
    derived: Vec<usize>,
    fingerprint: Option<Fingerprint>,
}

impl<T> TableView<T> {
    /// Create a view over `records` and compute the initial derived state.
    ///
    /// Fails with [`ViewError::InvalidPageSize`] when the configured page
    /// size is zero.
    pub fn new(records: Vec<T>, options: ViewOptions<T>) -> Result<Self, ViewError> {
        let pager = Pager::new(options.page_size)?;

        let mut view = TableView {
            records,
            accessor: options.accessor,
            search_fields: options.search_fields,
            filter: options.filter,
            raw_query: String::new(),
            settled_query: String::new(),
            emitter: SettleEmitter::new(options.settle_delay),
            filters: HashMap::new(),
            sort: options.sort,
            pager,
            records_generation: 0,
            filters_generation: 0,
            derived: Vec::new(),
            fingerprint: None,
        };
        view.recompute();
        Ok(view)
    }

    // ==================== Search ====================

    /// Update the raw search text. The expensive stages only run once the
    /// text settles: submitting restarts the quiet period, and the owner
    /// observes the settled value through [`TableView::poll`] or
    /// [`TableView::flush_search`].
    pub fn search(&mut self, raw: &str, now: Instant) {
        self.raw_query = raw.to_string();
        self.emitter.submit(raw.to_string(), now);
    }

    /// Drive the settle emitter. When a value settles it becomes the
    /// settled query, the page resets to 1, and the view recomputes.
    ///
    /// Returns true if a settled value was applied.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.emitter.poll(now) {
            Some(settled) => {
                self.apply_settled(settled);
                true
            }
            None => false,
        }
    }

    /// Apply any pending search text immediately instead of waiting out the
    /// quiet period. Returns true if a pending value was applied.
    pub fn flush_search(&mut self) -> bool {
        match self.emitter.flush() {
            Some(settled) => {
                self.apply_settled(settled);
                true
            }
            None => false,
        }
    }

    /// Clear both raw and settled search text at once, cancelling any
    /// pending settle. Resets the page.
    pub fn clear_search(&mut self) {
        self.emitter.cancel();
        self.raw_query.clear();
        self.settled_query.clear();
        self.pager.reset();
        self.recompute();
    }

    /// When the next pending search text would settle, if any. Lets an
    /// owner with an event loop schedule its next [`TableView::poll`].
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.emitter.deadline()
    }

    fn apply_settled(&mut self, settled: String) {
        trace!("search settled: {:?}", settled);
        self.settled_query = settled;
        self.pager.reset();
        self.recompute();
    }

    // ==================== Filters ====================

    /// Set one filter entry and reset the page. What the value means is up
    /// to the installed filter predicate.
    pub fn set_filter(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.filters.insert(key.to_string(), value.into());
        self.filters_generation += 1;
        self.pager.reset();
        self.recompute();
    }

    /// Remove one filter entry (absence means "no constraint on that
    /// key"). Resets the page when the key was present.
    pub fn remove_filter(&mut self, key: &str) {
        if self.filters.remove(key).is_some() {
            self.filters_generation += 1;
            self.pager.reset();
            self.recompute();
        }
    }

    /// Empty the filter map. Unlike [`TableView::set_filter`] this keeps
    /// the current page, clamped against the wider result set.
    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.filters_generation += 1;
        }
        self.recompute();
    }

    pub fn filters(&self) -> &HashMap<String, FieldValue> {
        &self.filters
    }

    // ==================== Sort ====================

    /// Sort by `field`, ascending. Repeating the call for the field that is
    /// already sorted toggles the direction; a different field resets to
    /// ascending. The current page is kept.
    pub fn sort_by(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some(spec) if spec.field == field => Some(SortSpec {
                order: spec.order.toggled(),
                ..spec
            }),
            _ => Some(SortSpec::ascending(field)),
        };
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    // ==================== Pagination ====================

    /// Jump to a page, clamped into the valid range.
    pub fn set_page(&mut self, page: usize) {
        let total = self.total_pages();
        self.pager.set_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.pager.next(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.total_pages();
        self.pager.previous(total);
    }

    pub fn first_page(&mut self) {
        self.pager.first();
    }

    pub fn last_page(&mut self) {
        let total = self.total_pages();
        self.pager.last(total);
    }

    // ==================== Record store ====================

    /// Replace the whole collection. The page is not reset, only clamped
    /// against the new page count.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.records_generation += 1;
        self.recompute();
    }

    pub fn push_record(&mut self, record: T) {
        self.records.push(record);
        self.records_generation += 1;
        self.recompute();
    }

    pub fn update_record(&mut self, index: usize, record: T) -> Result<(), ViewError> {
        if index >= self.records.len() {
            return Err(ViewError::RowOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.records[index] = record;
        self.records_generation += 1;
        self.recompute();
        Ok(())
    }

    pub fn remove_record(&mut self, index: usize) -> Result<T, ViewError> {
        if index >= self.records.len() {
            return Err(ViewError::RowOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let record = self.records.remove(index);
        self.records_generation += 1;
        self.recompute();
        Ok(record)
    }

    /// The full collection in insertion order, untouched by any stage.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    // ==================== Derived outputs ====================

    /// The visible page slice, in derived order.
    pub fn visible(&self) -> Vec<&T> {
        let window = self.pager.window(self.derived.len());
        self.derived[window]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Every record surviving search and filters, in sorted order - the
    /// derived view before pagination.
    pub fn matched(&self) -> Vec<&T> {
        self.derived.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.derived.len()
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.derived.len())
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn has_next_page(&self) -> bool {
        self.pager.has_next(self.total_pages())
    }

    pub fn has_previous_page(&self) -> bool {
        self.pager.has_previous()
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn settled_query(&self) -> &str {
        &self.settled_query
    }

    /// True while the raw search box has text.
    pub fn is_searching(&self) -> bool {
        !self.raw_query.is_empty()
    }

    /// True while raw text is waiting out its quiet period.
    pub fn is_settling(&self) -> bool {
        self.emitter.is_pending()
    }

    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_some()
    }

    pub fn has_results(&self) -> bool {
        !self.derived.is_empty()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            total_count: self.total_count(),
            filtered_count: self.filtered_count(),
            current_page: self.current_page(),
            total_pages: self.total_pages(),
            page_size: self.page_size(),
            has_next_page: self.has_next_page(),
            has_previous_page: self.has_previous_page(),
        }
    }

    // ==================== Pipeline ====================

    /// Rebuild the derived index mapping if any relevant input changed,
    /// then re-clamp the page. Invoked by every mutator; calling it twice
    /// with unchanged inputs produces identical output.
    fn recompute(&mut self) {
        let fingerprint = Fingerprint {
            records_generation: self.records_generation,
            filters_generation: self.filters_generation,
            settled_query: self.settled_query.clone(),
            sort: self.sort.clone(),
        };

        if self.fingerprint.as_ref() != Some(&fingerprint) {
            self.derived = self.build_derived();
            debug!(
                "derived view rebuilt: {} of {} records match",
                self.derived.len(),
                self.records.len()
            );
            self.fingerprint = Some(fingerprint);
        }

        let total = self.pager.total_pages(self.derived.len());
        self.pager.clamp(total);
    }

    fn build_derived(&self) -> Vec<usize> {
        let mut indices = self.search_stage();
        indices = self.filter_stage(indices);
        self.sort_stage(&mut indices);
        indices
    }

    /// Case-insensitive substring match, OR across the configured fields.
    /// An empty settled query or an empty field list passes everything
    /// through.
    fn search_stage(&self) -> Vec<usize> {
        if self.settled_query.is_empty() || self.search_fields.is_empty() {
            return (0..self.records.len()).collect();
        }

        let query = self.settled_query.to_lowercase();
        (0..self.records.len())
            .filter(|&i| {
                self.search_fields.iter().any(|field| {
                    (self.accessor)(&self.records[i], field)
                        .map(|value| value.to_text().to_lowercase().contains(&query))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    /// Without a predicate the filter map is inert and the stage passes
    /// everything through.
    fn filter_stage(&self, indices: Vec<usize>) -> Vec<usize> {
        match &self.filter {
            Some(predicate) => indices
                .into_iter()
                .filter(|&i| predicate(&self.records[i], &self.filters))
                .collect(),
            None => indices,
        }
    }

    /// Stable sort of the index mapping; equal keys keep their upstream
    /// order. Records whose sort field is missing or null go last in both
    /// directions.
    fn sort_stage(&self, indices: &mut [usize]) {
        let Some(sort) = &self.sort else {
            return;
        };

        indices.sort_by(|&a, &b| {
            let va = (self.accessor)(&self.records[a], &sort.field).unwrap_or(FieldValue::Null);
            let vb = (self.accessor)(&self.records[b], &sort.field).unwrap_or(FieldValue::Null);

            match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match sort.order {
                    SortOrder::Ascending => va.compare(&vb),
                    SortOrder::Descending => va.compare(&vb).reverse(),
                },
            }
        });
    }
}

impl<T: Clone> TableView<T> {
    /// Owned copy of the visible page and its metadata.
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        ViewSnapshot {
            rows: self.visible().into_iter().cloned().collect(),
            page: self.page_info(),
        }
    }
}
