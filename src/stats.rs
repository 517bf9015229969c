//! Store statistics: collection, entry, and saved-candidate counts.

use anyhow::Result;

use crate::app::open_engine;
use crate::config::Config;

/// Run the stats command and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let engine = open_engine(config)?;
    let stats = engine.get_stats().await?;
    let collections = engine.list_collections().await?;

    println!("Wordhoard — Store Stats");
    println!("=======================");
    println!();
    println!("  Store:        {}", engine.store().path().display());
    println!("  Provider:     {}", engine.provider().name());
    println!();
    println!("  Collections:  {}", stats.collections);
    println!("  Entries:      {}", stats.entries);
    println!("  Candidates:   {}", stats.candidates);

    if !collections.is_empty() {
        println!();
        println!("  By collection:");
        println!("  {:<32} {:>8}", "NAME", "ENTRIES");
        println!("  {}", "-".repeat(41));
        for c in &collections {
            let count = engine.list_entries(&c.id).await?.len();
            println!("  {:<32} {:>8}", c.name, count);
        }
    }

    println!();
    Ok(())
}
