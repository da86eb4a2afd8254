//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - run: process a directive against a caller-owned memory file
//! - serve: start the HTTP API server
//! - config show / path: inspect configuration
//!
//! The engine never persists anything itself; `run` keeps memory in a JSON
//! file owned by the user and round-trips it through one engine call.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use sdk::types::{seed_memory, AgentMessage, MemoryEntry};

use crate::config::Config;
use crate::pipeline::Engine;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Process a directive immediately
///
/// Loads memory from the given file (seeding it on first use), runs one
/// engine call, writes the updated memory back, and prints the reply.
pub fn handle_run(
    directive: &str,
    memory_path: Option<&Path>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    if directive.trim().is_empty() {
        bail!("Message is required.");
    }

    let now = Utc::now();
    let memory = match memory_path {
        Some(path) if path.exists() => load_memory(path)?,
        _ => seed_memory(now),
    };

    let engine = Engine::with_tuning(config.tuning());
    let (reply, updated_memory) = engine.process(directive, memory, now);

    if let Some(path) = memory_path {
        save_memory(path, &updated_memory)?;
        tracing::info!("Updated memory file {:?} ({} entries)", path, updated_memory.len());
    }

    match format {
        OutputFormat::Json => {
            let output = json!({
                "reply": reply,
                "updatedMemory": updated_memory,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_reply(&reply, &updated_memory),
    }

    Ok(())
}

/// Start the HTTP API server and block until Ctrl-C
pub async fn handle_serve(config: &Config, port_override: Option<u16>) -> Result<()> {
    let port = port_override.unwrap_or(config.api_server.port);
    let bind: SocketAddr = format!("127.0.0.1:{port}")
        .parse()
        .context("Invalid bind address")?;

    let engine = Arc::new(Engine::with_tuning(config.tuning()));
    let (addr, shutdown_tx) = api_server::serve(bind, engine).await?;
    println!("Tiller API server listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    shutdown_tx.send(()).ok();
    tracing::info!("API server stopped");

    Ok(())
}

/// Show the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => println!("{}", toml::to_string_pretty(config)?),
    }
    Ok(())
}

/// Print the configuration file path
pub fn handle_config_path() -> Result<()> {
    let path = Config::default_path()?;
    println!("{}", path.display());
    Ok(())
}

fn load_memory(path: &Path) -> Result<Vec<MemoryEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read memory file {path:?}"))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Memory file {path:?} is not a valid memory array"))
}

fn save_memory(path: &Path, memory: &[MemoryEntry]) -> Result<()> {
    let contents = serde_json::to_string_pretty(memory)?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write memory file {path:?}"))
}

fn print_reply(reply: &AgentMessage, memory: &[MemoryEntry]) {
    println!("{}", reply.content);

    if let Some(plan) = &reply.plan {
        println!("\nPlan:");
        for (index, step) in plan.iter().enumerate() {
            println!("  {}. {step}", index + 1);
        }
    }

    if let Some(analysis) = &reply.analysis {
        println!("\nAnalysis:\n  {analysis}");
    }

    if let Some(actions) = &reply.actions {
        println!("\nActions:");
        for action in actions {
            println!(
                "  [{:>3.0}%] {} - {}",
                action.confidence * 100.0,
                action.title,
                action.description
            );
        }
    }

    if let Some(reflections) = &reply.reflections {
        println!("\nReflections:");
        for reflection in reflections {
            println!("  - {reflection}");
        }
    }

    println!("\nMemory: {} entries", memory.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_empty_directive() {
        let config = Config::default();
        let result = handle_run("   ", None, &config, OutputFormat::Text);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_seeds_and_round_trips_memory_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let config = Config::default();

        // First call seeds memory and writes the file
        handle_run(
            "Strengthen the foundation",
            Some(&path),
            &config,
            OutputFormat::Text,
        )
        .unwrap();

        let memory = load_memory(&path).unwrap();
        assert_eq!(memory.len(), 1);
        assert_eq!(memory[0].id, "seed-vision");
        // Seed 0.8 reinforced by 0.15, clamped
        assert!((memory[0].strength - 0.95).abs() < 1e-9);

        // Second call reads the same file back
        handle_run(
            "Strengthen the foundation",
            Some(&path),
            &config,
            OutputFormat::Json,
        )
        .unwrap();

        let memory = load_memory(&path).unwrap();
        assert_eq!(memory[0].strength, 1.0);
    }
}
