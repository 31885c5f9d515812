use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::outline_file::save_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use outliner_editor::{Document, IdGenerator, Node};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Content of the root node
    #[arg(short, long, default_value = "Outline")]
    pub root: String,

    /// Seed for generated node ids
    #[arg(long)]
    pub id_seed: Option<String>,

    /// Force overwrite existing files
    #[arg(long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str, outline_path: &Path) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if either file already exists
    for path in [config_path.as_path(), outline_path] {
        if path.exists() && !args.force {
            println!(
                "{} {} already exists",
                "⚠️".yellow(),
                path.display().to_string().bright_white()
            );
            println!("Use --force to overwrite");
            return Ok(());
        }
    }

    println!("{}", "📝 Initializing outline...".bright_blue().bold());

    let config = Config {
        id_seed: args.id_seed.clone(),
        ..Config::default()
    };
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let mut doc = starter_outline(&args.root, args.id_seed.as_deref().unwrap_or("outline"))?;
    save_document(&mut doc, outline_path)?;
    info!(root = %doc.root_id(), "created outline");
    println!("  {} Created {}", "✓".green(), outline_path.display());

    println!();
    println!("{}", "✅ Outline initialized!".green().bold());
    println!();
    println!("Next steps:");
    if let Some(first) = doc.children(doc.root_id()).first() {
        println!("  1. Run: outliner edit set-content {} \"First task\"", first);
    }
    println!("  2. Run: outliner show --ids");

    Ok(())
}

/// A root with one empty task, so there is always a row to add siblings after
fn starter_outline(root_content: &str, seed: &str) -> Result<Document> {
    let mut ids = IdGenerator::new(seed);
    let root_id = ids.next_id();
    let first = Node::task(ids.next_id());
    let root = Node::task(root_id.clone())
        .with_content(root_content)
        .with_children([first.id.clone()]);

    let nodes = [root, first]
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect();
    Ok(Document::load(nodes, root_id)?)
}
