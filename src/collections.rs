//! Collection commands: `collection create`, `collection rename`,
//! `collection list`.

use anyhow::Result;
use wordhoard_core::models::{format_ts_iso, Collection};

use crate::app::open_engine;
use crate::config::Config;

pub async fn run_create(config: &Config, name: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let collection = engine.create_collection(name).await?;
    print_collection(&collection);
    Ok(())
}

pub async fn run_rename(config: &Config, id: &str, name: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let collection = engine.rename_collection(id, name).await?;
    print_collection(&collection);
    Ok(())
}

pub async fn run_list(config: &Config) -> Result<()> {
    let engine = open_engine(config)?;
    let collections = engine.list_collections().await?;
    if collections.is_empty() {
        println!("No collections.");
        return Ok(());
    }
    for c in &collections {
        println!("{}  {}  {}", c.id, format_ts_iso(&c.created_at), c.name);
    }
    Ok(())
}

fn print_collection(collection: &Collection) {
    println!("id:         {}", collection.id);
    println!("name:       {}", collection.name);
    println!("created_at: {}", format_ts_iso(&collection.created_at));
}
