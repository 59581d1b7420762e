//! Visibility maps, the visible-subgraph filter and visibility mutations.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::{GraphEdge, GraphNode, HierarchyEntry, NodeCategory, RepoGraph};

/// Shown/hidden flags. Dependency nodes live in their own map because they are
/// toggled one by one, without the tree cascade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
	pub nodes: HashMap<String, bool>,
	pub dependencies: HashMap<String, bool>,
}

impl VisibilityState {
	/// Whether `node` is shown. Ids missing from the relevant map are hidden.
	pub fn is_visible(&self, node: &GraphNode) -> bool {
		let map = match node.category() {
			NodeCategory::Dependency => &self.dependencies,
			_ => &self.nodes,
		};
		map.get(&node.id).copied().unwrap_or(false)
	}

	/// Point update of one dependency's flag.
	pub fn set_dependency_visible(&mut self, dep_id: &str, visible: bool) {
		self.dependencies.insert(dep_id.to_string(), visible);
	}

	/// Sets `node_id` and all its tree descendants to `visible`.
	///
	/// Ids that are not part of the file tree (root, languages, dependencies)
	/// leave the state untouched. Returns the number of entries written.
	pub fn set_node_visible(
		&mut self,
		hierarchy: &[HierarchyEntry],
		node_id: &str,
		visible: bool,
	) -> usize {
		let Some(start) = HierarchyEntry::find(hierarchy, node_id) else {
			return 0;
		};
		let updates: Vec<(String, bool)> = start
			.subtree_ids()
			.into_iter()
			.map(|id| (id.to_string(), visible))
			.collect();
		let written = updates.len();

		let mut next = self.nodes.clone();
		next.extend(updates);
		self.nodes = next;
		written
	}
}

/// The currently shown part of the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl VisibleGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node counts per category.
	pub fn stats(&self) -> BTreeMap<NodeCategory, usize> {
		let mut counts = BTreeMap::new();
		for node in &self.nodes {
			*counts.entry(node.category()).or_insert(0) += 1;
		}
		counts
	}
}

/// Nodes whose flag is set, and the edges whose endpoints both survive.
/// Order follows the full graph.
pub fn filter(graph: &RepoGraph, visibility: &VisibilityState) -> VisibleGraph {
	let nodes: Vec<GraphNode> = graph
		.nodes
		.iter()
		.filter(|n| visibility.is_visible(n))
		.cloned()
		.collect();
	let shown: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let edges = graph
		.edges
		.iter()
		.filter(|e| shown.contains(e.source.as_str()) && shown.contains(e.target.as_str()))
		.cloned()
		.collect();
	VisibleGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{NodePayload, ROOT_ID};

	/// `A -> [B, C -> [D]]`
	fn hierarchy() -> Vec<HierarchyEntry> {
		let leaf = |id: &str| HierarchyEntry {
			id: id.into(),
			children: vec![],
		};
		vec![HierarchyEntry {
			id: "A".into(),
			children: vec![
				leaf("B"),
				HierarchyEntry {
					id: "C".into(),
					children: vec![leaf("D")],
				},
			],
		}]
	}

	fn all_visible() -> VisibilityState {
		let mut v = VisibilityState::default();
		for id in ["A", "B", "C", "D"] {
			v.nodes.insert(id.into(), true);
		}
		v.dependencies.insert("dep-x".into(), true);
		v
	}

	#[test]
	fn cascade_hides_whole_subtree() {
		let mut v = all_visible();
		assert_eq!(v.set_node_visible(&hierarchy(), "A", false), 4);
		for id in ["A", "B", "C", "D"] {
			assert_eq!(v.nodes[id], false, "{id}");
		}
	}

	#[test]
	fn cascade_from_inner_node_leaves_ancestors_and_siblings() {
		let mut v = all_visible();
		v.set_node_visible(&hierarchy(), "A", false);
		v.set_node_visible(&hierarchy(), "C", true);
		assert!(!v.nodes["A"]);
		assert!(!v.nodes["B"]);
		assert!(v.nodes["C"]);
		assert!(v.nodes["D"]);
	}

	#[test]
	fn unknown_id_changes_nothing() {
		let mut v = all_visible();
		let before = v.clone();
		assert_eq!(v.set_node_visible(&hierarchy(), ROOT_ID, false), 0);
		assert_eq!(v, before);
	}

	#[test]
	fn dependency_toggle_is_isolated() {
		let mut v = all_visible();
		let nodes_before = v.nodes.clone();
		v.set_dependency_visible("dep-x", false);
		assert_eq!(v.nodes, nodes_before);
		assert!(!v.dependencies["dep-x"]);

		let deps_before = v.dependencies.clone();
		v.set_node_visible(&hierarchy(), "C", false);
		assert_eq!(v.dependencies, deps_before);
	}

	#[test]
	fn missing_entries_fail_closed() {
		let node = GraphNode {
			id: "ghost".into(),
			name: "ghost".into(),
			radius: 8.0,
			payload: NodePayload::File {
				path: "ghost".into(),
			},
		};
		assert!(!VisibilityState::default().is_visible(&node));
	}
}
