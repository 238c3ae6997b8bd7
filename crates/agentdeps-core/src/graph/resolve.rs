//! Execution order and transitive closure queries.
//!
//! [`AgentGraph::resolve_dependencies`] is cycle-intolerant: any cycle
//! reachable from the requested agent is an error, even when a dangling
//! dependency is declared ahead of it. [`AgentGraph::transitive_deps`] is
//! deliberately looser and terminates on any graph, cyclic or not.
//!
//! Both walks keep an explicit stack, so chain length is bounded by memory
//! rather than by the thread's stack size.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::build::AgentGraph;
use crate::graph::cycles::find_cycle_from;
use crate::record::AgentNode;

impl AgentGraph {
    /// Agents that must run before `name`, followed by `name` itself.
    ///
    /// Post-order DFS over the subgraph reachable from `name`. Dependencies
    /// are visited in declaration order, and a dependency shared by several
    /// parents is emitted once, where it is first resolved.
    ///
    /// # Errors
    ///
    /// - [`GraphError::CircularDependency`] if a cycle is reachable from
    ///   `name`. Checked before the ordering walk, so it takes precedence
    ///   over a dangling dependency. The reported cycle starts and ends at
    ///   the re-entered agent.
    /// - [`GraphError::NotFound`] if `name`, or a dependency reached from it,
    ///   has no node. For dependencies `required_by` names the declaring agent.
    #[instrument(skip(self))]
    pub fn resolve_dependencies(&self, name: &str) -> Result<Vec<&AgentNode>, GraphError> {
        let Some(root) = self.canonical_name(name) else {
            return Err(GraphError::not_found(name));
        };

        if let Some(mut cycle) = find_cycle_from(self, root) {
            let agent = cycle.first().cloned().unwrap_or_else(|| root.to_string());
            cycle.push(agent.clone());
            return Err(GraphError::CircularDependency { agent, cycle });
        }

        let order = Resolution::new(self).run(root)?;
        debug!(agent = name, resolved = order.len(), "resolved execution order");
        Ok(order)
    }

    /// Every name reachable from `name`, excluding `name`, in DFS discovery
    /// order. Dangling targets are included.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if `name` has no node.
    #[instrument(skip(self))]
    pub fn transitive_deps(&self, name: &str) -> Result<Vec<String>, GraphError> {
        if !self.contains(name) {
            return Err(GraphError::not_found(name));
        }

        let mut seen: HashSet<&str> = HashSet::from([name]);
        let mut found: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = self
            .dependencies_of(name)
            .iter()
            .rev()
            .map(String::as_str)
            .collect();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            found.push(current.to_string());
            stack.extend(self.dependencies_of(current).iter().rev().map(String::as_str));
        }

        Ok(found)
    }
}

/// One agent on the walk, with the index of its next dependency to visit.
struct Frame<'g> {
    name: &'g str,
    node: &'g AgentNode,
    next: usize,
}

struct Resolution<'g> {
    graph: &'g AgentGraph,
    emitted: HashSet<&'g str>,
    on_path: HashSet<&'g str>,
    stack: Vec<Frame<'g>>,
    order: Vec<&'g AgentNode>,
}

impl<'g> Resolution<'g> {
    fn new(graph: &'g AgentGraph) -> Self {
        Self {
            graph,
            emitted: HashSet::new(),
            on_path: HashSet::new(),
            stack: Vec::new(),
            order: Vec::new(),
        }
    }

    fn run(mut self, root: &'g str) -> Result<Vec<&'g AgentNode>, GraphError> {
        self.enter(root, None)?;

        while let Some(frame) = self.stack.last_mut() {
            let (name, next) = (frame.name, frame.next);
            frame.next += 1;

            if let Some(dep) = self.graph.dependencies_of(name).get(next) {
                let dep = dep.as_str();
                if !self.emitted.contains(dep) {
                    self.enter(dep, Some(name))?;
                }
                continue;
            }

            let Some(done) = self.stack.pop() else {
                break;
            };
            self.on_path.remove(done.name);
            self.emitted.insert(done.name);
            self.order.push(done.node);
        }

        Ok(self.order)
    }

    fn enter(&mut self, name: &'g str, required_by: Option<&str>) -> Result<(), GraphError> {
        if self.on_path.contains(name) {
            let pos = self.stack.iter().position(|f| f.name == name).unwrap_or(0);
            let mut cycle: Vec<String> = self.stack[pos..]
                .iter()
                .map(|f| f.name.to_string())
                .collect();
            cycle.push(name.to_string());
            return Err(GraphError::CircularDependency {
                agent: name.to_string(),
                cycle,
            });
        }

        let Some(node) = self.graph.agent(name) else {
            return Err(GraphError::NotFound {
                name: name.to_string(),
                required_by: required_by.map(str::to_string),
            });
        };

        self.on_path.insert(name);
        self.stack.push(Frame {
            name,
            node,
            next: 0,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> AgentGraph {
        AgentGraph::from_records(
            edges
                .iter()
                .map(|(name, deps)| AgentNode::new(*name).with_dependencies(deps.iter().copied()))
                .collect::<Vec<_>>(),
        )
    }

    fn names(nodes: &[&AgentNode]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn linear_chain_resolves_leaves_first() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        let order = g.resolve_dependencies("a").expect("resolve");
        assert_eq!(names(&order), vec!["c", "b", "a"]);
    }

    #[test]
    fn shared_dependency_emitted_once() {
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        let order = g.resolve_dependencies("a").expect("resolve");
        assert_eq!(names(&order), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn declaration_order_not_sorted() {
        let g = graph(&[("app", &["zeta", "alpha"]), ("zeta", &[]), ("alpha", &[])]);
        let order = g.resolve_dependencies("app").expect("resolve");
        assert_eq!(names(&order), vec!["zeta", "alpha", "app"]);
    }

    #[test]
    fn leaf_resolves_to_itself() {
        let g = graph(&[("a", &["b"]), ("b", &[])]);
        let order = g.resolve_dependencies("b").expect("resolve");
        assert_eq!(names(&order), vec!["b"]);
    }

    #[test]
    fn unknown_agent_is_not_found() {
        let g = graph(&[("a", &[])]);
        assert_eq!(
            g.resolve_dependencies("nope").expect_err("query must fail"),
            GraphError::not_found("nope")
        );
        assert_eq!(
            g.transitive_deps("nope").expect_err("query must fail"),
            GraphError::not_found("nope")
        );
    }

    #[test]
    fn dangling_dependency_is_not_found_with_parent() {
        let g = graph(&[("a", &["b"]), ("b", &["ghost"])]);
        assert_eq!(
            g.resolve_dependencies("a").expect_err("query must fail"),
            GraphError::NotFound {
                name: "ghost".to_string(),
                required_by: Some("b".to_string()),
            }
        );
    }

    #[test]
    fn two_node_cycle_is_circular() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let err = g.resolve_dependencies("a").expect_err("query must fail");
        assert_eq!(
            err,
            GraphError::CircularDependency {
                agent: "a".to_string(),
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn self_loop_is_circular() {
        let g = graph(&[("a", &["a"])]);
        assert!(matches!(
            g.resolve_dependencies("a"),
            Err(GraphError::CircularDependency { agent, .. }) if agent == "a"
        ));
    }

    #[test]
    fn cycle_elsewhere_does_not_block_other_queries() {
        let g = graph(&[("a", &["b"]), ("b", &["a"]), ("x", &["y"]), ("y", &[])]);

        assert!(g.resolve_dependencies("a").is_err());
        let order = g.resolve_dependencies("x").expect("x is acyclic");
        assert_eq!(names(&order), vec!["y", "x"]);
    }

    #[test]
    fn transitive_deps_in_discovery_order() {
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d", "e"]),
            ("d", &[]),
            ("e", &[]),
        ]);
        assert_eq!(
            g.transitive_deps("a").expect("closure"),
            vec!["b", "d", "c", "e"]
        );
    }

    #[test]
    fn transitive_deps_terminate_on_cycles_and_exclude_self() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a", "ghost"])]);
        assert_eq!(
            g.transitive_deps("a").expect("closure"),
            vec!["b", "c", "ghost"]
        );

        let looped = graph(&[("a", &["a"])]);
        assert!(looped.transitive_deps("a").expect("closure").is_empty());
    }

    #[test]
    fn cycle_behind_dangling_dependency_is_circular() {
        let g = graph(&[("a", &["ghost", "b"]), ("b", &["a"])]);
        assert_eq!(
            g.resolve_dependencies("a").expect_err("query must fail"),
            GraphError::CircularDependency {
                agent: "a".to_string(),
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn dangling_dependency_beside_acyclic_branch_is_not_found() {
        let g = graph(&[("a", &["ghost", "b"]), ("b", &[])]);
        assert_eq!(
            g.resolve_dependencies("a").expect_err("query must fail"),
            GraphError::NotFound {
                name: "ghost".to_string(),
                required_by: Some("a".to_string()),
            }
        );
    }

    #[test]
    fn long_chain_resolves_without_recursion() {
        let count = 50_000;
        let g = AgentGraph::from_records(
            (0..count)
                .map(|i| {
                    let node = AgentNode::new(format!("agent-{i:05}"));
                    if i + 1 < count {
                        node.with_dependencies([format!("agent-{:05}", i + 1)])
                    } else {
                        node
                    }
                })
                .collect::<Vec<_>>(),
        );

        let order = g.resolve_dependencies("agent-00000").expect("resolve");
        assert_eq!(order.len(), count);
        assert_eq!(order[0].name, format!("agent-{:05}", count - 1));
        assert_eq!(order[count - 1].name, "agent-00000");
    }
}
