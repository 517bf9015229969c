//! Input and suggestion commands: `input add`, `input list`, `suggest`,
//! `refine`.

use anyhow::Result;
use wordhoard_core::models::{format_ts_iso, Input, InputKind, Suggestion};

use crate::app::open_engine;
use crate::config::Config;

pub async fn run_add_input(config: &Config, kind: InputKind, content: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let input = engine.add_input(kind, content).await?;
    print_input(&input);
    Ok(())
}

pub async fn run_list_inputs(config: &Config) -> Result<()> {
    let engine = open_engine(config)?;
    let inputs = engine.list_inputs().await?;
    if inputs.is_empty() {
        println!("No inputs.");
        return Ok(());
    }
    for input in &inputs {
        println!("{}  {:<11}  {}", input.id, input.kind, input.content);
    }
    Ok(())
}

pub async fn run_suggest(config: &Config, input_id: &str) -> Result<()> {
    let engine = open_engine(config)?;
    let suggestion = engine.generate_suggestions(input_id).await?;
    print_suggestion(&suggestion);
    Ok(())
}

pub async fn run_refine(config: &Config, suggestion_id: &str, keep: &[String]) -> Result<()> {
    let engine = open_engine(config)?;
    let suggestion = engine.refine_suggestion(suggestion_id, keep).await?;
    print_suggestion(&suggestion);
    Ok(())
}

fn print_input(input: &Input) {
    println!("id:         {}", input.id);
    println!("kind:       {}", input.kind);
    println!("content:    {}", input.content);
    println!("created_at: {}", format_ts_iso(&input.created_at));
}

fn print_suggestion(suggestion: &Suggestion) {
    println!("id:           {}", suggestion.id);
    println!("input_id:     {}", suggestion.input_id);
    println!("generated_at: {}", format_ts_iso(&suggestion.generated_at));
    println!("candidates:");
    for (i, c) in suggestion.candidates.iter().enumerate() {
        println!("  {}. {}", i + 1, c);
    }
}
