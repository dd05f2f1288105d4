use std::collections::HashSet;

use crate::graph::Graph;

/// Box-drawn dependency tree of `root`. A package whose dependencies were
/// already listed earlier in the tree is marked `(seen)` and not expanded
/// again; a package that closes a cycle is marked `(cycle)`.
pub fn render_tree(graph: &Graph, root: &str) -> String {
    let mut out = String::new();
    out.push_str(root);
    out.push('\n');
    let mut walk = RenderWalk::new(root);
    render_tree_children(graph, root, "", &mut walk, &mut out);
    out
}

/// Same as [`render_tree`], indented two spaces per level.
pub fn render_flat(graph: &Graph, root: &str) -> String {
    let mut out = String::new();
    out.push_str(root);
    out.push('\n');
    let mut walk = RenderWalk::new(root);
    render_flat_children(graph, root, 1, &mut walk, &mut out);
    out
}

struct RenderWalk {
    path: Vec<String>,
    expanded: HashSet<String>,
}

enum Marker {
    Cycle,
    Seen,
    Expand,
}

impl RenderWalk {
    fn new(root: &str) -> Self {
        Self {
            path: vec![root.to_string()],
            expanded: HashSet::from([root.to_string()]),
        }
    }

    fn classify(&mut self, graph: &Graph, child: &str) -> Marker {
        if self.path.iter().any(|id| id == child) {
            Marker::Cycle
        } else if graph.adjacent_vertices_of(child).is_empty() {
            Marker::Expand
        } else if !self.expanded.insert(child.to_string()) {
            Marker::Seen
        } else {
            Marker::Expand
        }
    }
}

/// Graphviz digraph of everything reachable from `root`.
pub fn render_dot(graph: &Graph, root: &str) -> String {
    let mut out = String::from("digraph depsort {\n");
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    let mut nodes = Vec::new();
    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        nodes.push(node);
        for dep in graph.adjacent_vertices_of(node).iter().rev() {
            stack.push(dep.as_str());
        }
    }

    for node in &nodes {
        out.push_str(&format!("  \"{}\";\n", escape_dot_label(node)));
    }
    for node in &nodes {
        for dep in graph.adjacent_vertices_of(node) {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot_label(node),
                escape_dot_label(dep)
            ));
        }
    }
    out.push_str("}\n");
    out
}

fn render_tree_children(
    graph: &Graph,
    node: &str,
    prefix: &str,
    walk: &mut RenderWalk,
    out: &mut String,
) {
    let children = graph.adjacent_vertices_of(node);
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(child);
        match walk.classify(graph, child) {
            Marker::Cycle => {
                out.push_str(" (cycle)\n");
                continue;
            }
            Marker::Seen => {
                out.push_str(" (seen)\n");
                continue;
            }
            Marker::Expand => out.push('\n'),
        }
        walk.path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(graph, child, &next_prefix, walk, out);
        walk.path.pop();
    }
}

fn render_flat_children(
    graph: &Graph,
    node: &str,
    depth: usize,
    walk: &mut RenderWalk,
    out: &mut String,
) {
    for child in graph.adjacent_vertices_of(node) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(child);
        match walk.classify(graph, child) {
            Marker::Cycle => {
                out.push_str(" (cycle)\n");
                continue;
            }
            Marker::Seen => {
                out.push_str(" (seen)\n");
                continue;
            }
            Marker::Expand => out.push('\n'),
        }
        walk.path.push(child.clone());
        render_flat_children(graph, child, depth + 1, walk, out);
        walk.path.pop();
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
