//! Terminal rendering of the structure tree

use owo_colors::OwoColorize;
use std::fmt::Write;
use std::sync::Arc;
use stree_core::{Collapsible, Node, TreeItem};
use stree_store::GroupStore;
use stree_sync::TreeView;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Append each node's identity
    pub ids: bool,
    /// Use ANSI colors
    pub color: bool,
}

/// Render every visible node: roots plus the children of expanded nodes
pub fn render_tree<S: GroupStore>(view: &TreeView<S>, options: RenderOptions) -> String {
    let mut out = String::new();
    for root in view.children(None) {
        render_node(view, &root, 0, options, &mut out);
    }
    out
}

fn render_node<S: GroupStore>(
    view: &TreeView<S>,
    node: &Arc<Node>,
    depth: usize,
    options: RenderOptions,
    out: &mut String,
) {
    let item = view.tree_item(node);
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), format_item(&item, options));

    if item.collapsible == Collapsible::Expanded {
        for child in view.children(Some(node)) {
            render_node(view, &child, depth + 1, options, out);
        }
    }
}

fn format_item(item: &TreeItem, options: RenderOptions) -> String {
    let marker = match item.collapsible {
        Collapsible::None => "-",
        Collapsible::Collapsed => "+",
        Collapsible::Expanded => "v",
    };
    let icon = item.icon.as_deref().map(|i| format!("[{}] ", i)).unwrap_or_default();

    let mut line = if options.color {
        format!("{} {}{}", marker.dimmed(), icon.cyan(), item.label.bold())
    } else {
        format!("{} {}{}", marker, icon, item.label)
    };

    if let Some(command) = &item.command {
        let target = format!(
            "  {}:{}",
            command.uri,
            command.selection.start.line + 1
        );
        if options.color {
            line.push_str(&target.dimmed().to_string());
        } else {
            line.push_str(&target);
        }
    }

    if options.ids {
        let id = format!("  #{}", item.id);
        if options.color {
            line.push_str(&id.yellow().to_string());
        } else {
            line.push_str(&id);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use stree_core::{OpenLocation, Range};

    fn item(collapsible: Collapsible) -> TreeItem {
        TreeItem {
            id: "petclinic/Controllers".to_string(),
            label: "Controllers".to_string(),
            icon: Some("fa-stereotype".to_string()),
            tooltip: None,
            context_value: None,
            command: Some(OpenLocation {
                uri: "file:///Owner.java".to_string(),
                selection: Range::at(9, 0),
            }),
            collapsible,
        }
    }

    #[test]
    fn test_plain_format() {
        let plain = RenderOptions::default();
        assert_eq!(
            format_item(&item(Collapsible::Collapsed), plain),
            "+ [fa-stereotype] Controllers  file:///Owner.java:10"
        );

        let with_ids = RenderOptions { ids: true, color: false };
        assert!(format_item(&item(Collapsible::None), with_ids).ends_with("#petclinic/Controllers"));
    }
}
