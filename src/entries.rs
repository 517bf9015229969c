//! Entry commands: `entry save`, `entry list`, `entry search`,
//! `entry tag`, `entry untag`, `entry retag`, `entry delete`.

use anyhow::Result;
use wordhoard_core::models::{format_ts_iso, Entry};
use wordhoard_core::search::SearchOptions;

use crate::app::open_engine;
use crate::config::Config;

/// Filters accepted by `entry search`.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub collection: Option<String>,
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn run_save(
    config: &Config,
    input_id: &str,
    suggestion_id: &str,
    collection_id: &str,
    tags: &[String],
) -> Result<()> {
    let engine = open_engine(config)?;
    let entry = engine
        .save_entry(input_id, suggestion_id, collection_id, tags)
        .await?;
    print_entry(&entry);
    Ok(())
}

pub async fn run_list(config: &Config, collection_id: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let entries = engine.list_entries(collection_id).await?;
    print_entry_lines(&entries);
    Ok(())
}

/// Search entries.
///
/// With a collection and no tags or paging this is the collection-scoped
/// search; otherwise it runs the full composite query. Either way at most
/// `[search] default_limit` entries are printed unless `--limit` is given.
pub async fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let engine = open_engine(config)?;
    let simple = args.tags.is_empty() && args.limit.is_none() && args.offset.is_none();

    let entries = match args.collection.clone() {
        Some(cid) if simple => {
            let mut found = engine.search_entries(&cid, args.query.as_deref()).await?;
            found.truncate(config.search.default_limit);
            found
        }
        _ => {
            let opts = SearchOptions {
                query: args.query,
                collection_id: args.collection,
                tags: args.tags,
                limit: Some(args.limit.unwrap_or(config.search.default_limit)),
                offset: args.offset,
            };
            engine.query_entries(&opts).await?
        }
    };
    print_entry_lines(&entries);
    Ok(())
}

pub async fn run_tag(config: &Config, entry_id: &str, tags: &[String]) -> Result<()> {
    let engine = open_engine(config)?;
    let entry = engine.tag_entry(entry_id, tags).await?;
    println!("tags: {}", entry.tags.join(", "));
    Ok(())
}

pub async fn run_untag(config: &Config, entry_id: &str, tags: &[String]) -> Result<()> {
    let engine = open_engine(config)?;
    let entry = engine.untag_entry(entry_id, tags).await?;
    println!("tags: {}", entry.tags.join(", "));
    Ok(())
}

/// Replace an entry's whole tag set; no tags clears it.
pub async fn run_retag(config: &Config, entry_id: &str, tags: &[String]) -> Result<()> {
    let engine = open_engine(config)?;
    let entry = engine.retag_entry(entry_id, tags).await?;
    println!("tags: {}", entry.tags.join(", "));
    Ok(())
}

pub async fn run_delete(config: &Config, entry_id: &str) -> Result<()> {
    let engine = open_engine(config)?;
    engine.delete_entry(entry_id).await?;
    println!("Deleted entry {}", entry_id);
    Ok(())
}

fn print_entry(entry: &Entry) {
    println!("id:            {}", entry.id);
    println!("collection_id: {}", entry.collection_id);
    println!("input:         {} ({})", entry.input.content, entry.input.kind);
    println!("candidates:    {}", entry.suggestion.candidates.join(", "));
    println!("tags:          {}", entry.tags.join(", "));
    println!("saved_at:      {}", format_ts_iso(&entry.saved_at));
}

fn print_entry_lines(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    for e in entries {
        let tags = if e.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", e.tags.join(", "))
        };
        println!(
            "{}  {}  {} → {}{}",
            e.id,
            format_ts_iso(&e.saved_at),
            e.input.content,
            e.suggestion.candidates.join(", "),
            tags
        );
    }
}
