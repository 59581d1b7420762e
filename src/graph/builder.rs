//! Turns a [`RepoDescription`] into a [`RepoGraph`].
//!
//! Construction order is root, languages (input order), dependencies, then a
//! depth-first walk of the file tree. Every node gets exactly one edge from
//! its parent, so the edge list is a tree rooted at [`ROOT_ID`].

use std::collections::HashSet;

use log::{info, warn};

use crate::model::{EntryKind, RepoDescription, TreeEntry};

use super::types::{
	DEPENDENCY_RADIUS, FILE_RADIUS, FOLDER_RADIUS, GraphEdge, GraphNode, HierarchyEntry,
	LANGUAGE_RADIUS, NodePayload, REPO_RADIUS, ROOT_ID, RepoGraph,
};
use super::visibility::VisibilityState;

/// Hands out node ids, keeping the natural id whenever it is still free.
#[derive(Default)]
struct IdAllocator {
	taken: HashSet<String>,
}

impl IdAllocator {
	fn claim(&mut self, natural: String) -> String {
		if self.taken.insert(natural.clone()) {
			return natural;
		}
		let mut n = 2;
		loop {
			let candidate = format!("{natural}#{n}");
			if self.taken.insert(candidate.clone()) {
				warn!("repo-graph: id {natural:?} already in use, assigned {candidate:?}");
				return candidate;
			}
			n += 1;
		}
	}
}

struct GraphBuilder {
	ids: IdAllocator,
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	visibility: VisibilityState,
}

impl GraphBuilder {
	fn add(&mut self, natural_id: String, name: &str, radius: f64, payload: NodePayload) -> String {
		let id = self.ids.claim(natural_id);
		self.nodes.push(GraphNode {
			id: id.clone(),
			name: name.to_string(),
			radius,
			payload,
		});
		id
	}

	fn link(&mut self, parent: &str, child: &str) {
		self.edges.push(GraphEdge::new(parent, child));
	}

	fn walk(&mut self, entries: &[TreeEntry], parent: &str) -> Vec<HierarchyEntry> {
		entries
			.iter()
			.map(|entry| {
				let (radius, payload) = match entry.kind {
					EntryKind::Folder => (
						FOLDER_RADIUS,
						NodePayload::Folder {
							path: entry.path.clone(),
						},
					),
					EntryKind::File => (
						FILE_RADIUS,
						NodePayload::File {
							path: entry.path.clone(),
						},
					),
				};
				let id = self.add(entry.path.clone(), &entry.name, radius, payload);
				self.link(parent, &id);
				self.visibility.nodes.insert(id.clone(), true);

				let children = match (&entry.kind, &entry.children) {
					(EntryKind::Folder, Some(children)) => self.walk(children, &id),
					_ => Vec::new(),
				};
				HierarchyEntry { id, children }
			})
			.collect()
	}
}

/// Builds the full graph with every node visible.
pub fn build(desc: &RepoDescription) -> RepoGraph {
	let mut b = GraphBuilder {
		ids: IdAllocator::default(),
		nodes: Vec::with_capacity(1 + desc.languages.len() + desc.dependencies.len()),
		edges: Vec::new(),
		visibility: VisibilityState::default(),
	};

	let root = b.add(
		ROOT_ID.to_string(),
		&desc.name,
		REPO_RADIUS,
		NodePayload::Repo {
			description: desc.description.clone(),
		},
	);
	b.visibility.nodes.insert(root.clone(), true);

	for lang in &desc.languages {
		let id = b.add(
			format!("lang-{}", lang.language),
			&lang.language,
			LANGUAGE_RADIUS,
			NodePayload::Language {
				percentage: lang.percentage,
			},
		);
		b.link(&root, &id);
		b.visibility.nodes.insert(id, true);
	}

	for dep in &desc.dependencies {
		let id = b.add(
			dependency_id(&dep.name),
			&dep.name,
			DEPENDENCY_RADIUS,
			NodePayload::Dependency { kind: dep.kind },
		);
		b.link(&root, &id);
		b.visibility.dependencies.insert(id, true);
	}

	let hierarchy = b.walk(&desc.tree, &root);

	info!(
		"repo-graph: built {} nodes, {} edges for {}",
		b.nodes.len(),
		b.edges.len(),
		desc.name
	);

	RepoGraph {
		nodes: b.nodes,
		edges: b.edges,
		visibility: b.visibility,
		hierarchy,
	}
}

/// Natural id of a dependency node.
pub fn dependency_id(name: &str) -> String {
	format!("dep-{name}")
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::graph::NodeCategory;
	use crate::model::{Dependency, DependencyKind, LanguageUsage};

	fn entry(path: &str, kind: EntryKind, children: Option<Vec<TreeEntry>>) -> TreeEntry {
		TreeEntry {
			id: path.to_string(),
			name: path.rsplit('/').next().unwrap_or(path).to_string(),
			kind,
			path: path.to_string(),
			children,
		}
	}

	fn desc(tree: Vec<TreeEntry>) -> RepoDescription {
		RepoDescription {
			name: "demo".into(),
			description: "demo repo".into(),
			languages: vec![
				LanguageUsage {
					language: "Rust".into(),
					percentage: 80.0,
				},
				LanguageUsage {
					language: "Nix".into(),
					percentage: 20.0,
				},
			],
			dependencies: vec![Dependency {
				name: "serde".into(),
				kind: DependencyKind::General,
			}],
			tree,
		}
	}

	#[test]
	fn empty_description_builds_root_only() {
		let graph = build(&RepoDescription {
			name: "empty".into(),
			description: String::new(),
			languages: vec![],
			dependencies: vec![],
			tree: vec![],
		});
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].id, ROOT_ID);
		assert_eq!(graph.nodes[0].category(), NodeCategory::Repo);
		assert!(graph.edges.is_empty());
		assert!(graph.hierarchy.is_empty());
	}

	#[test]
	fn languages_keep_input_order_and_payload() {
		let graph = build(&desc(vec![]));
		let langs: Vec<_> = graph
			.nodes
			.iter()
			.filter(|n| n.category() == NodeCategory::Language)
			.map(|n| (n.id.as_str(), n.payload.clone()))
			.collect();
		assert_eq!(
			langs,
			vec![
				("lang-Rust", NodePayload::Language { percentage: 80.0 }),
				("lang-Nix", NodePayload::Language { percentage: 20.0 }),
			]
		);
	}

	#[test]
	fn tree_is_walked_depth_first_with_parent_edges() {
		let tree = vec![
			entry(
				"src",
				EntryKind::Folder,
				Some(vec![
					entry("src/a.rs", EntryKind::File, None),
					entry(
						"src/util",
						EntryKind::Folder,
						Some(vec![entry("src/util/b.rs", EntryKind::File, None)]),
					),
				]),
			),
			entry("README.md", EntryKind::File, None),
		];
		let graph = build(&desc(tree));
		let tree_ids: Vec<_> = graph
			.nodes
			.iter()
			.filter(|n| n.payload.path().is_some())
			.map(|n| n.id.as_str())
			.collect();
		assert_eq!(
			tree_ids,
			vec!["src", "src/a.rs", "src/util", "src/util/b.rs", "README.md"]
		);
		assert!(graph.edges.contains(&GraphEdge::new("src/util", "src/util/b.rs")));
		assert!(graph.edges.contains(&GraphEdge::new(ROOT_ID, "README.md")));
		assert_eq!(graph.node("src").map(|n| n.radius), Some(FOLDER_RADIUS));
		assert_eq!(graph.node("README.md").map(|n| n.radius), Some(FILE_RADIUS));
		assert_eq!(graph.hierarchy[0].subtree_ids(), vec![
			"src",
			"src/a.rs",
			"src/util",
			"src/util/b.rs"
		]);
	}

	#[test]
	fn children_of_files_are_not_walked() {
		let tree = vec![entry(
			"weird",
			EntryKind::File,
			Some(vec![entry("weird/inner", EntryKind::File, None)]),
		)];
		let graph = build(&desc(tree));
		assert!(graph.node("weird/inner").is_none());
	}

	#[test]
	fn colliding_paths_get_distinct_ids() {
		let tree = vec![
			entry(ROOT_ID, EntryKind::File, None),
			entry("dep-serde", EntryKind::File, None),
			entry("dup", EntryKind::File, None),
			entry("dup", EntryKind::File, None),
		];
		let graph = build(&desc(tree));
		let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), graph.nodes.len());
		assert!(ids.contains("repo-root#2"));
		assert!(ids.contains("dep-serde#2"));
		assert!(ids.contains("dup#2"));
		assert_eq!(graph.nodes[0].category(), NodeCategory::Repo);
		assert_eq!(graph.visibility.nodes.get("dep-serde#2"), Some(&true));
		assert_eq!(graph.visibility.dependencies.get("dep-serde"), Some(&true));
	}
}
