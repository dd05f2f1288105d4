use std::collections::{HashMap, HashSet};

use crate::graph::Graph;

/// A cycle reached while walking dependencies. `path` starts and ends at the
/// same vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetected {
    pub path: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Dependencies-first post-order of everything reachable from `root`,
/// ending with `root` itself.
///
/// Only vertices reachable from `root` are inspected, so cycles elsewhere in
/// the graph are ignored. An unknown `root` yields just `[root]`; callers
/// check membership first.
pub fn installation_order(graph: &Graph, root: &str) -> Result<Vec<String>, CycleDetected> {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    walk_post_order(graph, root, &mut state, Err, |node| order.push(node.to_string()))?;
    Ok(order)
}

/// Every cycle in the graph, each reported once in discovery order.
pub fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut cycles = Vec::new();

    for node in graph.vertices() {
        if state.contains_key(node) {
            continue;
        }
        let found = walk_post_order(
            graph,
            node,
            &mut state,
            |cycle| {
                cycles.push(cycle.path);
                Ok(())
            },
            |_| {},
        );
        debug_assert!(found.is_ok());
    }

    cycles
}

/// Depth-first walk from an unvisited `start`, handing each vertex to
/// `on_done` once all of its dependencies are done. A dependency that is
/// still on the current path is passed to `on_cycle` as a closed path; an
/// `Err` from `on_cycle` stops the walk.
///
/// The path lives on an explicit stack, so chain length is bounded by memory
/// rather than by the thread's stack.
fn walk_post_order<'g>(
    graph: &'g Graph,
    start: &'g str,
    state: &mut HashMap<&'g str, VisitState>,
    mut on_cycle: impl FnMut(CycleDetected) -> Result<(), CycleDetected>,
    mut on_done: impl FnMut(&'g str),
) -> Result<(), CycleDetected> {
    // (vertex on the current path, index of its next dependency)
    let mut path: Vec<(&'g str, usize)> = vec![(start, 0)];
    state.insert(start, VisitState::Visiting);

    while let Some(frame) = path.last_mut() {
        let (node, next) = *frame;
        let Some(dep) = graph.adjacent_vertices_of(node).get(next) else {
            path.pop();
            state.insert(node, VisitState::Visited);
            on_done(node);
            continue;
        };
        frame.1 += 1;

        let dep = dep.as_str();
        match state.get(dep) {
            Some(VisitState::Visited) => {}
            Some(VisitState::Visiting) => on_cycle(cycle_from_path(&path, dep))?,
            None => {
                state.insert(dep, VisitState::Visiting);
                path.push((dep, 0));
            }
        }
    }
    Ok(())
}

fn cycle_from_path(path: &[(&str, usize)], node: &str) -> CycleDetected {
    let start = path.iter().position(|(id, _)| *id == node).unwrap_or(0);
    let mut cycle: Vec<String> = path[start..].iter().map(|(id, _)| id.to_string()).collect();
    cycle.push(node.to_string());
    CycleDetected { path: cycle }
}

/// Vertices with an edge into `vertex`, in graph order.
pub fn direct_dependents(graph: &Graph, vertex: &str) -> Vec<String> {
    graph
        .vertices()
        .filter(|candidate| graph.has_edge(candidate, vertex))
        .map(str::to_string)
        .collect()
}

/// Every vertex that reaches `vertex`, sorted by name.
pub fn transitive_dependents(graph: &Graph, vertex: &str) -> Vec<String> {
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for from in graph.vertices() {
        for dep in graph.adjacent_vertices_of(from) {
            reverse.entry(dep.as_str()).or_default().push(from);
        }
    }

    let mut seen = HashSet::new();
    let mut stack: Vec<&str> = reverse.get(vertex).cloned().unwrap_or_default();
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        if let Some(next) = reverse.get(current) {
            stack.extend(next.iter().copied());
        }
    }
    let mut out: Vec<String> = seen.into_iter().map(str::to_string).collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::{
        direct_dependents, find_cycles, installation_order, transitive_dependents, CycleDetected,
    };
    use crate::graph::Graph;

    fn graph_from(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    fn assert_dependencies_first(graph: &Graph, order: &[String]) {
        for (idx, pkg) in order.iter().enumerate() {
            for dep in graph.adjacent_vertices_of(pkg) {
                let dep_idx = order
                    .iter()
                    .position(|p| p == dep)
                    .unwrap_or_else(|| panic!("{dep} missing from order"));
                assert!(dep_idx < idx, "{dep} should precede {pkg} in {order:?}");
            }
        }
    }

    #[test]
    fn installation_order_is_dependencies_first_post_order() {
        let graph = graph_from(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let order = installation_order(&graph, "a").expect("acyclic");
        assert_eq!(order, vec!["d", "b", "c", "a"]);
        assert_dependencies_first(&graph, &order);
    }

    #[test]
    fn installation_order_of_leaf_is_itself() {
        let mut graph = Graph::new();
        graph.add_vertex("solo");
        assert_eq!(
            installation_order(&graph, "solo").expect("leaf"),
            vec!["solo"]
        );
    }

    #[test]
    fn installation_order_follows_adjacency_order() {
        let graph = graph_from(&[("app", "zlib"), ("app", "alpha")]);
        let order = installation_order(&graph, "app").expect("acyclic");
        assert_eq!(order, vec!["zlib", "alpha", "app"]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = graph_from(&[("a", "a")]);
        let err = installation_order(&graph, "a").expect_err("self loop");
        assert_eq!(err.path, vec!["a", "a"]);
    }

    #[test]
    fn two_cycle_is_detected() {
        let graph = graph_from(&[("a", "b"), ("b", "c"), ("c", "b")]);
        let err = installation_order(&graph, "a").expect_err("b <-> c");
        assert_eq!(err.path, vec!["b", "c", "b"]);
    }

    #[test]
    fn long_cycle_is_detected() {
        let graph = graph_from(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")]);
        let err = installation_order(&graph, "a").expect_err("b -> c -> d -> b");
        assert_eq!(
            err,
            CycleDetected {
                path: vec!["b".into(), "c".into(), "d".into(), "b".into()],
            }
        );
    }

    #[test]
    fn unreachable_cycle_is_ignored() {
        let graph = graph_from(&[("a", "b"), ("x", "y"), ("y", "z"), ("z", "x")]);
        let order = installation_order(&graph, "a").expect("cycle is elsewhere");
        assert_eq!(order, vec!["b", "a"]);

        let err = installation_order(&graph, "y").expect_err("y sits on the cycle");
        assert_eq!(err.path.first(), err.path.last());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let graph = graph_from(&[("top", "l"), ("top", "r"), ("l", "base"), ("r", "base")]);
        let order = installation_order(&graph, "top").expect("diamond");
        assert_eq!(order.len(), 4);
        assert_dependencies_first(&graph, &order);
    }

    #[test]
    fn long_chain_does_not_exhaust_the_stack() {
        let mut graph = Graph::new();
        let names: Vec<String> = (0..100_000).map(|idx| format!("pkg{idx}")).collect();
        for pair in names.windows(2) {
            graph.add_vertex(&pair[0]);
            graph.add_vertex(&pair[1]);
            graph.add_edge(&pair[0], &pair[1]);
        }

        let order = installation_order(&graph, "pkg0").expect("chain");
        assert_eq!(order.len(), 100_000);
        assert_eq!(order.first().map(String::as_str), Some("pkg99999"));
        assert_eq!(order.last().map(String::as_str), Some("pkg0"));
        assert!(find_cycles(&graph).is_empty());

        graph.add_edge("pkg99999", "pkg0");
        let err = installation_order(&graph, "pkg0").expect_err("closed chain");
        assert_eq!(err.path.len(), 100_001);
        assert_eq!(find_cycles(&graph).len(), 1);
    }

    #[test]
    fn find_cycles_reports_each_cycle_once() {
        let graph = graph_from(&[
            ("a", "b"),
            ("b", "a"),
            ("c", "d"),
            ("d", "e"),
            ("e", "c"),
            ("f", "a"),
        ]);
        let cycles = find_cycles(&graph);
        assert_eq!(
            cycles,
            vec![
                vec!["a".to_string(), "b".into(), "a".into()],
                vec!["c".to_string(), "d".into(), "e".into(), "c".into()],
            ]
        );
    }

    #[test]
    fn find_cycles_on_acyclic_graph_is_empty() {
        let graph = graph_from(&[("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn dependents_follow_reverse_edges() {
        let graph = graph_from(&[("app", "lib"), ("lib", "core"), ("tool", "core")]);
        assert_eq!(direct_dependents(&graph, "core"), vec!["lib", "tool"]);
        assert_eq!(
            transitive_dependents(&graph, "core"),
            vec!["app", "lib", "tool"]
        );
        assert!(transitive_dependents(&graph, "app").is_empty());
    }
}
