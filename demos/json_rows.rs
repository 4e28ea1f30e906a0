/// JSON Rows Example
///
/// This example demonstrates:
/// - Driving a TableView over serde_json::Value records
/// - The ready-made json_accessor for top-level object fields
/// - Serializing a page snapshot for transport

use serde_json::json;
use tableview::{json_accessor, TableView, ViewOptions};
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    println!("=== TableView JSON Rows Example ===\n");

    let rows = vec![
        json!({"host": "web-01", "region": "eu-west", "cpu": 42.5}),
        json!({"host": "web-02", "region": "eu-west", "cpu": 17.0}),
        json!({"host": "db-01", "region": "us-east", "cpu": 88.1}),
        json!({"host": "db-02", "region": "us-east", "cpu": 71.3}),
        json!({"host": "cache-01", "region": "eu-west", "cpu": 5.9}),
        json!({"host": "batch-01", "region": "ap-south", "cpu": 63.0}),
    ];

    let mut view = TableView::new(
        rows,
        ViewOptions::new(json_accessor())
            .search_fields(&["host", "region"])
            .page_size(4)
            .settle_delay(Duration::from_millis(200)),
    )
    .expect("page size is valid");

    println!("1. Hosts sorted by cpu, hottest first:");
    view.sort_by("cpu");
    view.sort_by("cpu");
    for row in view.visible() {
        println!("      {} {}", row["host"], row["cpu"]);
    }
    println!();

    println!("2. Searching for 'eu'...");
    let typed = Instant::now();
    view.search("eu", typed);
    view.poll(typed + Duration::from_millis(200));
    for row in view.visible() {
        println!("      {} in {}", row["host"], row["region"]);
    }
    println!();

    println!("3. Snapshot of the current page as JSON:");
    let snapshot = view.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
    );

    println!("\n=== Example Complete ===");
}
