//! Dependency tracking between named functions

use crate::ast::AstNode;
use crate::extract::{called_names, FunctionNames};
use ahash::AHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// Directed graph: formula → formulas its body calls
///
/// Node order is the catalog order, which makes cycle reports deterministic.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    order: Vec<String>,
    edges: AHashMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed bodies
    ///
    /// `None` marks a formula whose body did not parse; it becomes a node
    /// without outgoing edges.
    pub fn build<'a, I, N>(formulas: I, known: &N) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a AstNode>)>,
        N: FunctionNames + ?Sized,
    {
        let mut graph = Self::new();
        for (name, ast) in formulas {
            let deps = ast.map(|ast| called_names(ast, known)).unwrap_or_default();
            graph.add_node(name, deps);
        }
        graph
    }

    /// Build from explicit edge lists
    pub fn from_edges<I, S, D>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut graph = Self::new();
        for (name, deps) in edges {
            graph.add_node(name, deps.into_iter().map(Into::into).collect());
        }
        graph
    }

    fn add_node(&mut self, name: impl Into<String>, deps: BTreeSet<String>) {
        let name = name.into();
        if !self.edges.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.edges.entry(name).or_default().extend(deps);
    }

    /// Formulas called by `name`, sorted
    pub fn dependencies(&self, name: &str) -> impl Iterator<Item = &str> + '_ {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Formulas whose bodies call `name`, in node order
    pub fn dependents<'g>(&'g self, name: &'g str) -> impl Iterator<Item = &'g str> + 'g {
        self.order
            .iter()
            .filter(move |n| self.edges.get(*n).map_or(false, |deps| deps.contains(name)))
            .map(String::as_str)
    }

    /// Check if a node exists
    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Find cycles with a three-colour depth-first search
    ///
    /// Meeting a node that is still on the current path records the path from
    /// that node's position to the closing edge. Edges to names that are not
    /// nodes are ignored. The search keeps its own stack of pending
    /// dependency iterators, so long chains do not grow the call stack.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut colors: AHashMap<&str, Color> = self
            .order
            .iter()
            .map(|n| (n.as_str(), Color::White))
            .collect();
        let mut cycles = Vec::new();

        for root in &self.order {
            let root = root.as_str();
            if colors.get(root) != Some(&Color::White) {
                continue;
            }

            colors.insert(root, Color::Gray);
            let mut path: Vec<&str> = vec![root];
            let mut pending = vec![self.dependencies(root)];

            while let Some(deps) = pending.last_mut() {
                let Some(dep) = deps.next() else {
                    // Every dependency explored
                    pending.pop();
                    if let Some(done) = path.pop() {
                        colors.insert(done, Color::Black);
                    }
                    continue;
                };

                match colors.get(dep) {
                    Some(Color::Gray) => {
                        if let Some(start) = path.iter().position(|n| *n == dep) {
                            let mut members: Vec<String> =
                                path[start..].iter().map(|n| n.to_string()).collect();
                            members.push(dep.to_string());
                            cycles.push(Cycle { path: members });
                        }
                    }
                    Some(Color::White) => {
                        colors.insert(dep, Color::Gray);
                        path.push(dep);
                        pending.push(self.dependencies(dep));
                    }
                    Some(Color::Black) | None => {}
                }
            }
        }

        cycles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A closed dependency path; the first name is repeated at the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<String>,
}

impl Cycle {
    /// Distinct formulas taking part in the cycle
    pub fn members(&self) -> &[String] {
        &self.path[..self.path.len().saturating_sub(1)]
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        DependencyGraph::from_edges(edges.iter().map(|(n, deps)| (*n, deps.iter().copied())))
    }

    fn rendered(cycles: &[Cycle]) -> Vec<String> {
        cycles.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_two_node_cycle() {
        let g = graph(&[("A", &["B"]), ("B", &["A"])]);
        assert_eq!(rendered(&g.find_cycles()), vec!["A → B → A"]);
    }

    #[test]
    fn test_self_loop() {
        let g = graph(&[("A", &["A"])]);
        let cycles = g.find_cycles();
        assert_eq!(rendered(&cycles), vec!["A → A"]);
        assert_eq!(cycles[0].members(), &["A".to_string()]);
    }

    #[test]
    fn test_acyclic_chain() {
        let g = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        assert!(g.find_cycles().is_empty());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let g = graph(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"]), ("D", &[])]);
        assert!(g.find_cycles().is_empty());
        assert_eq!(g.dependents("D").collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn test_cycle_path_starts_at_reentry() {
        let g = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["B"])]);
        assert_eq!(rendered(&g.find_cycles()), vec!["B → C → B"]);
    }

    #[test]
    fn test_long_chain_on_small_stack() {
        const LINKS: usize = 50_000;

        let chain = |closed: bool| {
            DependencyGraph::from_edges((0..=LINKS).map(|i| {
                let next = if i < LINKS {
                    Some(format!("N{}", i + 1))
                } else if closed {
                    Some("N0".to_string())
                } else {
                    None
                };
                (format!("N{i}"), next)
            }))
        };

        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || (chain(false).find_cycles(), chain(true).find_cycles()))
            .unwrap();
        let (open, closed) = handle.join().unwrap();

        assert!(open.is_empty());
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].path.len(), LINKS + 2);
        assert_eq!(closed[0].path.first(), closed[0].path.last());
        assert_eq!(closed[0].members().len(), LINKS + 1);
    }

    #[test]
    fn test_unknown_neighbours_ignored() {
        let g = graph(&[("A", &["MISSING"])]);
        assert!(g.find_cycles().is_empty());
    }

    #[test]
    fn test_build_from_asts() {
        let known = ["A", "B"];
        let a = parse_formula("IF(x, B(x), SUM(B(1)))").unwrap();
        let b = parse_formula("x + 1").unwrap();
        let g = DependencyGraph::build([("A", Some(&a)), ("B", Some(&b)), ("C", None)], &known);

        assert_eq!(g.dependencies("A").collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(g.dependencies("C").count(), 0);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }
}
