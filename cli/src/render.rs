//! Plain-text output for the terminal.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write;

use common::{ContainerTree, ContentHash, FsNode};
use itertools::Itertools;
use proto::ui::Progress;

const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

pub fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub fn progress(progress: &Progress) -> String {
    if progress.total <= 0 {
        return format!("{}/{}", progress.current, progress.total);
    }
    let percent = progress.current.saturating_mul(100) / progress.total;
    format!("{}/{} ({percent}%)", progress.current, progress.total)
}

/// Folders first, then by name.
fn order(a: &&FsNode, b: &&FsNode) -> Ordering {
    let rank = |node: &FsNode| matches!(node, FsNode::File(_));
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.info().name.cmp(&b.info().name))
}

fn label(node: &FsNode) -> String {
    match node {
        FsNode::Folder(folder) => format!("{}/", folder.info.name),
        FsNode::File(file) if file.chunk_count == 0 => {
            format!("{} ({})", file.info.name, human_size(file.size))
        }
        FsNode::File(file) => format!(
            "{} ({}, {} chunk{} of {})",
            file.info.name,
            human_size(file.size),
            file.chunk_count,
            if file.chunk_count == 1 { "" } else { "s" },
            human_size(u64::from(file.chunk_size)),
        ),
    }
}

/// Draws a container as a tree. A node with several parents is drawn under each.
pub fn tree(tree: &ContainerTree) -> String {
    let nodes = tree.nodes().collect_vec();
    let mut children: HashMap<ContentHash, Vec<&FsNode>> = HashMap::new();
    for node in &nodes {
        for parent in &node.info().parent_ids {
            children.entry(*parent).or_default().push(node);
        }
    }
    let roots = nodes
        .iter()
        .filter(|node| node.info().is_root())
        .sorted_by(order)
        .collect_vec();

    let mut out = tree.container.to_string();
    let mut ancestors = Vec::new();
    level(&mut out, &roots, &children, "", &mut ancestors);
    out
}

fn level(
    out: &mut String,
    nodes: &[&FsNode],
    children: &HashMap<ContentHash, Vec<&FsNode>>,
    prefix: &str,
    ancestors: &mut Vec<ContentHash>,
) {
    for (i, node) in nodes.iter().enumerate() {
        let (branch, indent) = if i + 1 == nodes.len() {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = write!(out, "\n{prefix}{branch}{}", label(node));

        let id = node.info().id;
        // A hash that is its own ancestor would recurse forever.
        if ancestors.contains(&id) {
            continue;
        }
        let Some(below) = children.get(&id) else {
            continue;
        };
        let below = below.iter().copied().sorted_by(order).collect_vec();
        ancestors.push(id);
        level(out, &below, children, &format!("{prefix}{indent}"), ancestors);
        ancestors.pop();
    }
}
