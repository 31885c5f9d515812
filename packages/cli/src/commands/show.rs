use super::Context;
use crate::outline_file::load_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use outliner_editor::{walk, Node, NodeId, NodeKind, Status, Visitor};
use std::collections::HashSet;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Hide the children of these nodes
    #[arg(short, long = "collapse", value_name = "ID")]
    pub collapsed: Vec<String>,

    /// Print node ids next to their content
    #[arg(long)]
    pub ids: bool,

    /// Print the raw snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let doc = load_document(&ctx.outline_path, ctx.config.id_seed.as_deref())?;

    if args.json {
        println!("{}", doc.to_json()?);
        return Ok(());
    }

    let mut printer = OutlinePrinter {
        indent_width: ctx.config.indent_width,
        show_ids: args.ids || ctx.config.show_ids,
        collapsed: args.collapsed.into_iter().map(NodeId::new).collect(),
        lines: Vec::new(),
    };
    walk(&mut printer, doc.root_id(), doc.nodes());

    for line in printer.lines {
        println!("{}", line);
    }

    Ok(())
}

/// Renders one line per visible node, indented by depth
struct OutlinePrinter {
    indent_width: usize,
    show_ids: bool,
    collapsed: HashSet<NodeId>,
    lines: Vec<String>,
}

impl Visitor for OutlinePrinter {
    fn visit_node(&mut self, node: &Node, depth: usize) -> bool {
        let is_collapsed = self.collapsed.contains(&node.id) && !node.is_leaf();

        let mut line = " ".repeat(depth * self.indent_width);
        line.push_str(&marker(node));
        line.push(' ');
        line.push_str(&content(node));
        if is_collapsed {
            line.push_str(&format!(" {}", format!("(+{})", node.children.len()).dimmed()));
        }
        if self.show_ids {
            line.push_str(&format!(" {}", format!("[{}]", node.id).dimmed()));
        }
        self.lines.push(line);

        !is_collapsed
    }
}

fn marker(node: &Node) -> String {
    match node.kind {
        NodeKind::Task => match node.status().unwrap_or_default() {
            Status::Unchecked => "[ ]".to_string(),
            Status::Done => "[x]".green().to_string(),
            Status::Failed => "[!]".red().to_string(),
        },
        NodeKind::Note => "-".to_string(),
        NodeKind::Heading => "#".bold().to_string(),
    }
}

fn content(node: &Node) -> String {
    match (node.kind, node.status()) {
        (NodeKind::Heading, _) => node.content.bold().to_string(),
        (_, Some(Status::Done)) => node.content.dimmed().to_string(),
        _ => node.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outliner_editor::NodeStore;

    fn printer(collapsed: &[&str], show_ids: bool) -> OutlinePrinter {
        colored::control::set_override(false);
        OutlinePrinter {
            indent_width: 2,
            show_ids,
            collapsed: collapsed.iter().map(|id| NodeId::from(*id)).collect(),
            lines: Vec::new(),
        }
    }

    fn sample() -> NodeStore {
        let mut done = Node::task("a1").with_content("Draft");
        done.metadata.status = Some(Status::Done);
        [
            Node::new("root", NodeKind::Heading)
                .with_content("Plan")
                .with_children(["a", "b"]),
            Node::task("a").with_content("Write").with_children(["a1"]),
            done,
            Node::new("b", NodeKind::Note).with_content("Later"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_prints_indented_outline() {
        let mut p = printer(&[], false);
        walk(&mut p, &NodeId::from("root"), &sample());

        assert_eq!(
            p.lines,
            vec!["# Plan", "  [ ] Write", "    [x] Draft", "  - Later"]
        );
    }

    #[test]
    fn test_collapsed_nodes_hide_children() {
        let mut p = printer(&["a", "b"], true);
        walk(&mut p, &NodeId::from("root"), &sample());

        assert_eq!(
            p.lines,
            vec!["# Plan [root]", "  [ ] Write (+1) [a]", "  - Later [b]"]
        );
    }
}
