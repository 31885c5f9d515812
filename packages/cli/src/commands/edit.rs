use super::Context;
use crate::outline_file::{load_document, save_document};
use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use colored::Colorize;
use outliner_editor::{DropIntent, Mutation, MutationOutcome, NodeId, Status};
use tracing::debug;

#[derive(Debug, Args)]
pub struct EditArgs {
    #[command(subcommand)]
    pub op: EditOp,

    /// Apply the edit without writing the outline back
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum EditOp {
    /// Insert an empty task after a node
    AddAfter { id: String },

    /// Delete a node and everything under it
    Delete { id: String },

    /// Nest a node under its previous sibling
    Indent { id: String },

    /// Move a node out to follow its parent
    Outdent { id: String },

    /// Move a node one row up
    Up { id: String },

    /// Move a node one row down
    Down { id: String },

    /// Re-parent a node
    MoveTo {
        id: String,
        parent: String,

        /// Position among the new siblings (appends when omitted)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Place a node relative to another, as a drag and drop would
    #[command(group(ArgGroup::new("target").required(true)))]
    Drop {
        id: String,

        #[arg(long, group = "target")]
        before: Option<String>,

        #[arg(long, group = "target")]
        after: Option<String>,

        #[arg(long, group = "target")]
        into: Option<String>,
    },

    /// Replace a node's text
    SetContent { id: String, content: String },

    /// Replace a node's status (unchecked, done, failed)
    SetStatus { id: String, status: Status },
}

impl EditOp {
    pub fn into_mutation(self) -> Mutation {
        match self {
            EditOp::AddAfter { id } => Mutation::CreateSiblingAfter { node_id: id.into() },
            EditOp::Delete { id } => Mutation::DeleteNode { node_id: id.into() },
            EditOp::Indent { id } => Mutation::Indent { node_id: id.into() },
            EditOp::Outdent { id } => Mutation::Outdent { node_id: id.into() },
            EditOp::Up { id } => Mutation::MoveUp { node_id: id.into() },
            EditOp::Down { id } => Mutation::MoveDown { node_id: id.into() },
            EditOp::MoveTo { id, parent, index } => Mutation::MoveTo {
                node_id: id.into(),
                new_parent_id: parent.into(),
                index: index.unwrap_or(usize::MAX),
            },
            EditOp::Drop {
                id,
                before,
                after,
                into,
            } => {
                let intent = match (before, after, into) {
                    (Some(target), _, _) => DropIntent::Before(NodeId::new(target)),
                    (_, Some(target), _) => DropIntent::After(NodeId::new(target)),
                    (_, _, Some(target)) => DropIntent::Into(NodeId::new(target)),
                    // clap enforces one target
                    (None, None, None) => DropIntent::Into(NodeId::new(id.clone())),
                };
                Mutation::Drop {
                    node_id: id.into(),
                    intent,
                }
            }
            EditOp::SetContent { id, content } => Mutation::UpdateContent {
                node_id: id.into(),
                content,
            },
            EditOp::SetStatus { id, status } => Mutation::UpdateStatus {
                node_id: id.into(),
                status,
            },
        }
    }
}

pub fn edit(args: EditArgs, ctx: &Context) -> Result<()> {
    let mut doc = load_document(&ctx.outline_path, ctx.config.id_seed.as_deref())?;

    let mutation = args.op.into_mutation();
    let name = mutation.name();
    let target = mutation.node_id().clone();
    debug!(op = name, node = %target, "applying edit");

    let result = doc.apply(mutation);

    if result.outcome == MutationOutcome::NoOp {
        println!(
            "{} {} on {} changed nothing",
            "⚠️".yellow(),
            name,
            target.to_string().bright_white()
        );
        return Ok(());
    }

    if !args.dry_run {
        save_document(&mut doc, &ctx.outline_path)?;
    }

    println!(
        "  {} {} {} (version {})",
        "✓".green(),
        name,
        target.to_string().bright_white(),
        result.version
    );
    if let Some(created) = result.created {
        println!("  {} Created {}", "✓".green(), created.to_string().bright_white());
    }

    Ok(())
}
