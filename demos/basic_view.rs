/// Basic View Example
///
/// This example demonstrates:
/// - Building a TableView over plain struct records
/// - Debounced search with the settle emitter
/// - Filtering through a caller-supplied predicate
/// - Sorting with direction toggling and page-stable navigation

use tableview::{FieldValue, TableView, ViewOptions};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Book {
    title: String,
    author: String,
    year: i64,
    available: bool,
}

fn book(title: &str, author: &str, year: i64, available: bool) -> Book {
    Book {
        title: title.to_string(),
        author: author.to_string(),
        year,
        available,
    }
}

fn field(b: &Book, name: &str) -> Option<FieldValue> {
    match name {
        "title" => Some(FieldValue::from(b.title.as_str())),
        "author" => Some(FieldValue::from(b.author.as_str())),
        "year" => Some(FieldValue::from(b.year)),
        "available" => Some(FieldValue::from(b.available)),
        _ => None,
    }
}

fn print_page(view: &TableView<Book>) {
    for b in view.visible() {
        println!("      {} ({}) - {}", b.title, b.year, b.author);
    }
    println!(
        "      [page {}/{}, {} of {} records]",
        view.current_page(),
        view.total_pages(),
        view.filtered_count(),
        view.total_count()
    );
}

fn main() {
    env_logger::init();

    println!("=== TableView Basic Example ===\n");

    // 1. Build a view over a small library
    println!("1. Creating view over 8 books...");
    let books = vec![
        book("The Left Hand of Darkness", "Le Guin", 1969, true),
        book("A Wizard of Earthsea", "Le Guin", 1968, false),
        book("Solaris", "Lem", 1961, true),
        book("The Dispossessed", "Le Guin", 1974, true),
        book("Roadside Picnic", "Strugatsky", 1972, false),
        book("The Cyberiad", "Lem", 1965, true),
        book("Hard to Be a God", "Strugatsky", 1964, true),
        book("His Master's Voice", "Lem", 1968, false),
    ];

    let mut view = TableView::new(
        books,
        ViewOptions::new(field)
            .search_fields(&["title", "author"])
            .filter_with(|b: &Book, filters| match filters.get("available") {
                Some(wanted) => wanted.as_bool() == Some(b.available),
                None => true,
            })
            .page_size(3)
            .settle_delay(Duration::from_millis(250)),
    )
    .expect("page size is valid");

    print_page(&view);
    println!();

    // 2. Debounced search
    println!("2. Typing 'le g' into the search box...");
    let now = Instant::now();
    view.search("l", now);
    view.search("le", now + Duration::from_millis(80));
    view.search("le g", now + Duration::from_millis(160));

    // Nothing settled yet - the quiet period restarts on each keystroke.
    println!("   settled yet? {}", view.poll(now + Duration::from_millis(300)));
    println!("   settled now? {}", view.poll(now + Duration::from_millis(410)));
    print_page(&view);
    println!();

    // 3. Filter to available copies only
    println!("3. Filtering to available copies...");
    view.set_filter("available", true);
    print_page(&view);
    println!();

    // 4. Sort by year, then toggle
    println!("4. Sorting by year (ascending, then toggled)...");
    view.clear_search();
    view.clear_filters();
    view.sort_by("year");
    print_page(&view);

    view.sort_by("year");
    println!("   toggled:");
    print_page(&view);
    println!();

    // 5. Page navigation clamps at the edges
    println!("5. Jumping past the last page...");
    view.set_page(99);
    print_page(&view);

    println!("\n=== Example Complete ===");
}
