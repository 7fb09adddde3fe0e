// Colored terminal output for recommendation and popularity lists.

use colored::Colorize;

use crate::db::models::Item;

/// Display personalized recommendations for a reader.
pub fn display_recommendations(user_id: &str, items: &[Item]) {
    if items.is_empty() {
        println!(
            "No recommendations for {} yet. Readers with similar ratings are needed first.",
            user_id.bold()
        );
        return;
    }

    println!(
        "\n{}",
        format!("=== Recommended for {user_id} ({} books) ===", items.len()).bold()
    );
    println!();
    display_item_table(items);
}

/// Display the most popular items.
pub fn display_popular(items: &[Item]) {
    if items.is_empty() {
        println!("The catalog is empty. Run `lectern import <file>` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Most Popular ({} books) ===", items.len()).bold()
    );
    println!();
    display_item_table(items);
}

fn display_item_table(items: &[Item]) {
    println!(
        "  {:>4}  {:<40} {:<24} {:>10}",
        "Rank".dimmed(),
        "Title".dimmed(),
        "Author".dimmed(),
        "Popularity".dimmed(),
    );
    println!("  {}", "-".repeat(82).dimmed());

    for (i, item) in items.iter().enumerate() {
        let title = super::truncate_chars(&item.title, 37);
        let author = super::truncate_chars(item.author.as_deref().unwrap_or("-"), 21);
        println!(
            "  {:>4}. {:<40} {:<24} {:>10}",
            i + 1,
            title,
            author.dimmed(),
            colorize_popularity(item.popularity_count),
        );
    }
    println!();
}

/// Colorize a popularity count by rough band.
fn colorize_popularity(count: u64) -> colored::ColoredString {
    let text = count.to_string();
    match count {
        c if c >= 100 => text.green().bold(),
        c if c >= 10 => text.green(),
        0 => text.dimmed(),
        _ => text.normal(),
    }
}
