//! TableView - Derived Views over Record Collections
//!
//! A reusable engine that takes an arbitrary in-memory collection of
//! records and derives a searched, filtered, sorted, and paginated view of
//! it, with stable page semantics as the underlying result set shrinks and
//! grows. Records stay opaque: the engine reaches into them only through a
//! caller-supplied field accessor.

pub mod engine;
pub mod error;
pub mod pager;
pub mod settle;
pub mod value;

pub use engine::{
    FieldAccessor, FilterPredicate, PageInfo, SortOrder, SortSpec, TableView, ViewOptions,
    ViewSnapshot,
};
pub use error::ViewError;
pub use pager::Pager;
pub use settle::SettleEmitter;
pub use value::{json_accessor, FieldValue};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(50);

    /// 25 rows; exactly 12 names contain an "a".
    fn catalog() -> Vec<serde_json::Value> {
        let mut rows = Vec::new();
        for i in 0..12 {
            rows.push(json!({ "name": format!("atlas-{:02}", i) }));
        }
        for i in 0..13 {
            rows.push(json!({ "name": format!("unit-{:02}", i) }));
        }
        // Interleave so insertion order differs from sorted order.
        rows.reverse();
        rows
    }

    fn names(rows: Vec<&serde_json::Value>) -> Vec<&str> {
        rows.into_iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_search_sort_paginate_walkthrough() {
        let mut view = TableView::new(
            catalog(),
            ViewOptions::new(json_accessor())
                .search_fields(&["name"])
                .page_size(10)
                .settle_delay(DELAY),
        )
        .unwrap();

        assert_eq!(view.total_count(), 25);
        assert_eq!(view.total_pages(), 3);

        let typed = Instant::now();
        view.search("a", typed);
        assert!(view.poll(typed + DELAY));
        assert_eq!(view.filtered_count(), 12);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.visible().len(), 10);

        view.set_page(2);
        assert_eq!(view.visible().len(), 2);

        // Reordering the same result set keeps the viewer on their page.
        view.sort_by("name");
        assert_eq!(view.current_page(), 2);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(names(view.visible()), ["atlas-10", "atlas-11"]);

        view.clear_filters();
        let cleared = Instant::now();
        view.search("", cleared);
        assert!(view.poll(cleared + DELAY));
        assert_eq!(view.filtered_count(), 25);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.current_page(), 1);
        assert_eq!(names(view.visible())[0], "atlas-00");
    }

    #[test]
    fn test_complete_workflow_with_struct_records() {
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        struct Employee {
            name: String,
            department: String,
            tenure: i64,
        }

        let employee = |name: &str, department: &str, tenure: i64| Employee {
            name: name.to_string(),
            department: department.to_string(),
            tenure,
        };

        let staff = vec![
            employee("Alice", "Engineering", 4),
            employee("Bob", "Design", 2),
            employee("Charlie", "Engineering", 2),
            employee("Dana", "Support", 7),
            employee("Eve", "Engineering", 1),
        ];

        let mut view = TableView::new(
            staff,
            ViewOptions::new(|e: &Employee, field| match field {
                "name" => Some(FieldValue::from(e.name.as_str())),
                "department" => Some(FieldValue::from(e.department.as_str())),
                "tenure" => Some(FieldValue::from(e.tenure)),
                _ => None,
            })
            .search_fields(&["name", "department"])
            .filter_with(|e: &Employee, filters| match filters.get("department") {
                Some(wanted) => wanted.as_str() == Some(e.department.as_str()),
                None => true,
            })
            .page_size(2)
            .settle_delay(DELAY),
        )
        .unwrap();

        view.set_filter("department", "Engineering");
        assert_eq!(view.filtered_count(), 3);
        assert_eq!(view.total_pages(), 2);

        view.sort_by("tenure");
        let first_page: Vec<&str> = view.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(first_page, ["Eve", "Charlie"]);

        view.next_page();
        let second_page: Vec<&str> = view.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(second_page, ["Alice"]);

        // Snapshot of the current page serializes for transport.
        let snapshot = view.snapshot();
        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded["page"]["filtered_count"], 3);
        assert_eq!(encoded["rows"][0]["name"], "Alice");

        // Narrowing the search lands back on page 1.
        let typed = Instant::now();
        view.search("eve", typed);
        assert!(view.poll(typed + DELAY));
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.filtered_count(), 1);
        assert!(view.is_searching());
        assert!(view.is_filtered());
        assert!(view.is_sorted());
    }
}
