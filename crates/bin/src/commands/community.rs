//! Community command - prints aggregated community lists from a data directory.

use topfive::{
    Clock, SystemClock,
    backend::ListBackend,
    community::{CommunityEntry, aggregate},
    query::{search_entries, sort},
};

use crate::backend::load_lists;
use crate::cli::CommunityArgs;
use crate::output::{OutputFormat, print_json, print_table};

fn row(entry: &CommunityEntry) -> Vec<String> {
    let items: Vec<String> = entry.items.iter().map(ToString::to_string).collect();
    vec![
        entry.name.clone(),
        entry.sources.len().to_string(),
        items.join(", "),
    ]
}

/// Run the community command
pub async fn run(args: &CommunityArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let backend = load_lists(&args.data).await?;
    let lists = backend.all_lists().await?;

    let entries = aggregate(&lists, SystemClock.now());
    let mut entries = search_entries(&entries, args.search.as_deref().unwrap_or(""));
    if let Some(key) = args.sort {
        sort(&mut entries, key);
    }

    match format {
        OutputFormat::Human => {
            if entries.is_empty() {
                println!("No community lists found.");
                return Ok(());
            }
            let rows: Vec<_> = entries.iter().map(row).collect();
            print_table(&["NAME", "LISTS", "ITEMS"], &rows);
        }
        OutputFormat::Json => print_json(&entries)?,
    }

    Ok(())
}
