use super::Context;
use crate::outline_file::load_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Print per-depth node counts
    #[arg(long)]
    pub stats: bool,
}

/// Validate the outline file without changing it
pub fn check(args: CheckArgs, ctx: &Context) -> Result<()> {
    let doc = load_document(&ctx.outline_path, ctx.config.id_seed.as_deref())?;
    doc.check_invariants()?;

    let entries = doc.flatten_entries(None);
    let max_depth = entries.iter().map(|entry| entry.depth).max().unwrap_or(0);

    println!(
        "{} {} is a valid outline ({} nodes, depth {})",
        "✓".green(),
        ctx.outline_path.display().to_string().bright_white(),
        entries.len(),
        max_depth
    );

    if args.stats {
        let mut per_depth = vec![0usize; max_depth + 1];
        for entry in &entries {
            per_depth[entry.depth] += 1;
        }
        for (depth, count) in per_depth.iter().enumerate() {
            println!("  depth {}: {}", depth, count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;

    #[test]
    fn test_check_reports_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let outline_path = dir.path().join("loop.json");
        fs::write(
            &outline_path,
            r#"{
                "root_id": "root",
                "nodes": {
                    "root": { "id": "root", "children": ["a"] },
                    "a": { "id": "a", "children": ["b"] },
                    "b": { "id": "b", "children": ["a"] }
                }
            }"#,
        )
        .unwrap();
        let ctx = Context {
            config: Config::default(),
            outline_path,
        };

        assert!(check(CheckArgs { stats: false }, &ctx).is_err());
    }

    #[test]
    fn test_check_accepts_valid_outline() {
        let dir = tempfile::tempdir().unwrap();
        let outline_path = dir.path().join("ok.json");
        fs::write(
            &outline_path,
            r#"{
                "root_id": "root",
                "nodes": {
                    "root": { "id": "root", "children": ["a"] },
                    "a": { "id": "a", "content": "hi", "metadata": { "status": "done", "color": "red" } }
                }
            }"#,
        )
        .unwrap();
        let ctx = Context {
            config: Config::default(),
            outline_path,
        };

        check(CheckArgs { stats: true }, &ctx).unwrap();
    }
}
