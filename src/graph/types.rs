//! Typed graph model built from a repository description.

use crate::model::DependencyKind;

use super::visibility::VisibilityState;

/// Id of the single repository root node.
pub const ROOT_ID: &str = "repo-root";

/// Node radii per category.
pub const REPO_RADIUS: f64 = 30.0;
pub const FOLDER_RADIUS: f64 = 15.0;
pub const LANGUAGE_RADIUS: f64 = 12.0;
pub const DEPENDENCY_RADIUS: f64 = 10.0;
pub const FILE_RADIUS: f64 = 8.0;

/// Kind of node, used for colors, radii and stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeCategory {
	Repo,
	Folder,
	File,
	Language,
	Dependency,
}

impl NodeCategory {
	pub const ALL: [NodeCategory; 5] = [
		NodeCategory::Repo,
		NodeCategory::Folder,
		NodeCategory::File,
		NodeCategory::Language,
		NodeCategory::Dependency,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			NodeCategory::Repo => "repo",
			NodeCategory::Folder => "folder",
			NodeCategory::File => "file",
			NodeCategory::Language => "language",
			NodeCategory::Dependency => "dependency",
		}
	}
}

/// Category-specific data carried by a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
	Repo { description: String },
	Folder { path: String },
	File { path: String },
	Language { percentage: f64 },
	Dependency { kind: DependencyKind },
}

impl NodePayload {
	pub fn category(&self) -> NodeCategory {
		match self {
			NodePayload::Repo { .. } => NodeCategory::Repo,
			NodePayload::Folder { .. } => NodeCategory::Folder,
			NodePayload::File { .. } => NodeCategory::File,
			NodePayload::Language { .. } => NodeCategory::Language,
			NodePayload::Dependency { .. } => NodeCategory::Dependency,
		}
	}

	/// Repository path for tree-derived nodes.
	pub fn path(&self) -> Option<&str> {
		match self {
			NodePayload::Folder { path } | NodePayload::File { path } => Some(path),
			_ => None,
		}
	}
}

/// A node of the repository graph. Positions live in the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique within one graph.
	pub id: String,
	pub name: String,
	pub radius: f64,
	pub payload: NodePayload,
}

impl GraphNode {
	pub fn category(&self) -> NodeCategory {
		self.payload.category()
	}

	/// Hover text: category plus the path, or the id for non-tree nodes.
	pub fn tooltip(&self) -> String {
		format!(
			"Type: {}\nPath: {}",
			self.category().as_str(),
			self.payload.path().unwrap_or(&self.id)
		)
	}
}

/// Parent to child edge, stored by node id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

impl GraphEdge {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Identity used when joining edges across updates.
	pub fn key(&self) -> (String, String) {
		(self.source.clone(), self.target.clone())
	}
}

/// The file tree expressed in assigned node ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyEntry {
	pub id: String,
	pub children: Vec<HierarchyEntry>,
}

impl HierarchyEntry {
	/// Depth-first search for the first entry with `id`.
	pub fn find<'a>(entries: &'a [HierarchyEntry], id: &str) -> Option<&'a HierarchyEntry> {
		entries.iter().find_map(|entry| {
			if entry.id == id {
				Some(entry)
			} else {
				Self::find(&entry.children, id)
			}
		})
	}

	/// This entry's id followed by every descendant's, pre-order.
	pub fn subtree_ids(&self) -> Vec<&str> {
		let mut ids = Vec::new();
		let mut stack = vec![self];
		while let Some(entry) = stack.pop() {
			ids.push(entry.id.as_str());
			stack.extend(entry.children.iter().rev());
		}
		ids
	}
}

/// Full graph for one repository description.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepoGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Visibility right after build: everything shown.
	pub visibility: VisibilityState,
	/// Tree entries by assigned id, for visibility cascades.
	pub hierarchy: Vec<HierarchyEntry>,
}

impl RepoGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, payload: NodePayload) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.into(),
			radius: FILE_RADIUS,
			payload,
		}
	}

	#[test]
	fn tooltip_shows_path_for_tree_nodes() {
		let file = node("a-1", NodePayload::File { path: "src/a.rs".into() });
		assert_eq!(file.tooltip(), "Type: file\nPath: src/a.rs");
	}

	#[test]
	fn tooltip_falls_back_to_id() {
		let dep = node(
			"dep-react",
			NodePayload::Dependency {
				kind: DependencyKind::Frontend,
			},
		);
		assert_eq!(dep.tooltip(), "Type: dependency\nPath: dep-react");
		let root = node(ROOT_ID, NodePayload::Repo { description: String::new() });
		assert_eq!(root.tooltip(), "Type: repo\nPath: repo-root");
	}
}
