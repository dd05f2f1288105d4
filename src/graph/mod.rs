use indexmap::{IndexMap, IndexSet};

pub mod ops;
pub mod viz;

/// Directed, unweighted graph over string vertices.
///
/// Vertices and each vertex's out-neighbors keep insertion order, so every
/// traversal over the same sequence of edits is repeatable. The empty string
/// stands for "no vertex": mutations given it do nothing and lookups treat it
/// as unknown.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    adjacency: IndexMap<String, Vec<String>>,
    edges: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: &str) {
        if vertex.is_empty() || self.adjacency.contains_key(vertex) {
            return;
        }
        self.adjacency.insert(vertex.to_string(), Vec::new());
    }

    /// Removes `vertex` together with every edge that starts or ends at it.
    pub fn remove_vertex(&mut self, vertex: &str) {
        let Some(outgoing) = self.adjacency.shift_remove(vertex) else {
            return;
        };
        self.edges -= outgoing.len();

        for neighbors in self.adjacency.values_mut() {
            if let Some(pos) = neighbors.iter().position(|n| n == vertex) {
                neighbors.remove(pos);
                self.edges -= 1;
            }
        }
    }

    /// Adds the edge `from -> to`, creating either vertex if it is missing.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from.is_empty() || to.is_empty() {
            return;
        }
        self.add_vertex(from);
        self.add_vertex(to);

        let Some(neighbors) = self.adjacency.get_mut(from) else {
            return;
        };
        if neighbors.iter().any(|n| n == to) {
            return;
        }
        neighbors.push(to.to_string());
        self.edges += 1;
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) {
        if !self.adjacency.contains_key(to) {
            return;
        }
        let Some(neighbors) = self.adjacency.get_mut(from) else {
            return;
        };
        if let Some(pos) = neighbors.iter().position(|n| n == to) {
            neighbors.remove(pos);
            self.edges -= 1;
        }
    }

    pub fn contains(&self, vertex: &str) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.adjacent_vertices_of(from).iter().any(|n| n == to)
    }

    pub fn all_vertices(&self) -> IndexSet<String> {
        self.adjacency.keys().cloned().collect()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    /// Out-neighbors of `vertex` in insertion order; empty when the vertex is
    /// unknown.
    pub fn adjacent_vertices_of(&self, vertex: &str) -> &[String] {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
