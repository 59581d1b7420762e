//! Application state: the loaded description, its graph, visibility,
//! customization and the visualize request lifecycle.
//!
//! All mutation goes through this type. The UI keeps one instance in a signal
//! and derives the visible graph from it.

use log::{info, warn};
use thiserror::Error;

use crate::customization::CustomizationOptions;
use crate::describer::DescribeError;
use crate::graph::{self, HierarchyEntry, NodePayload, RepoGraph, VisibilityState, VisibleGraph};
use crate::model::{DependencyKind, RepoDescription};

/// Where the current visualize request stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
	#[default]
	Idle,
	Loading {
		locator: String,
	},
	Ready,
	Failed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
	#[error("a repository is already being analyzed")]
	Busy,
	#[error("enter a repository URL to visualize")]
	EmptyLocator,
}

/// One checkbox row of the file tree panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRow {
	pub id: String,
	pub name: String,
	/// Nesting level, 0 for top-level entries.
	pub depth: usize,
	pub visible: bool,
}

/// One checkbox row of the dependency panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyRow {
	pub id: String,
	pub name: String,
	pub visible: bool,
}

/// Identifies one visualize request; completions with an outdated ticket are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Application state: the loaded graph, visibility, customization and request status.
#[derive(Debug, Default)]
pub struct Workspace {
	description: Option<RepoDescription>,
	graph: RepoGraph,
	visibility: VisibilityState,
	customization: CustomizationOptions,
	status: LoadStatus,
	pending: Option<RequestTicket>,
	issued: u64,
}

impl Workspace {
	pub fn new(customization: CustomizationOptions) -> Self {
		Self {
			customization,
			..Self::default()
		}
	}

	pub fn description(&self) -> Option<&RepoDescription> {
		self.description.as_ref()
	}

	pub fn graph(&self) -> &RepoGraph {
		&self.graph
	}

	pub fn visibility(&self) -> &VisibilityState {
		&self.visibility
	}

	pub fn customization(&self) -> &CustomizationOptions {
		&self.customization
	}

	pub fn status(&self) -> &LoadStatus {
		&self.status
	}

	pub fn is_loading(&self) -> bool {
		self.pending.is_some()
	}

	/// Starts a visualize request. Only one may be in flight; the previous
	/// graph is cleared right away.
	pub fn begin_visualize(&mut self, locator: &str) -> Result<RequestTicket, WorkspaceError> {
		let locator = locator.trim();
		if locator.is_empty() {
			return Err(WorkspaceError::EmptyLocator);
		}
		if self.pending.is_some() {
			warn!("repo-graph: ignoring visualize of {locator}, a request is pending");
			return Err(WorkspaceError::Busy);
		}
		self.issued += 1;
		let ticket = RequestTicket(self.issued);
		self.pending = Some(ticket);
		self.clear_graph();
		self.status = LoadStatus::Loading {
			locator: locator.to_string(),
		};
		Ok(ticket)
	}

	/// Applies the describer's answer. Returns false for a stale ticket.
	pub fn complete_visualize(
		&mut self,
		ticket: RequestTicket,
		result: Result<RepoDescription, DescribeError>,
	) -> bool {
		if self.pending != Some(ticket) {
			warn!("repo-graph: dropping stale describer response {ticket:?}");
			return false;
		}
		self.pending = None;
		match result {
			Ok(desc) => self.load(desc),
			Err(e) => {
				warn!("repo-graph: visualize failed: {e}");
				self.clear_graph();
				self.status = LoadStatus::Failed(e.to_string());
			}
		}
		true
	}

	/// Replaces the graph with one built from `desc`, everything visible.
	pub fn load(&mut self, desc: RepoDescription) {
		let graph = graph::build(&desc);
		info!(
			"repo-graph: showing {} ({} tree entries, {} nodes)",
			desc.name,
			desc.entry_count(),
			graph.nodes.len()
		);
		self.visibility = graph.visibility.clone();
		self.graph = graph;
		self.description = Some(desc);
		self.status = LoadStatus::Ready;
	}

	pub fn set_node_visible(&mut self, node_id: &str, visible: bool) -> usize {
		self.visibility
			.set_node_visible(&self.graph.hierarchy, node_id, visible)
	}

	pub fn set_dependency_visible(&mut self, dep_id: &str, visible: bool) {
		self.visibility.set_dependency_visible(dep_id, visible);
	}

	pub fn set_customization(&mut self, options: CustomizationOptions) {
		self.customization = options;
	}

	/// The subgraph currently shown.
	pub fn visible_graph(&self) -> VisibleGraph {
		graph::filter(&self.graph, &self.visibility)
	}

	/// File tree entries in display order with their current flags.
	pub fn tree_rows(&self) -> Vec<TreeRow> {
		let mut rows = Vec::new();
		let mut stack: Vec<(&HierarchyEntry, usize)> =
			self.graph.hierarchy.iter().rev().map(|e| (e, 0)).collect();
		while let Some((entry, depth)) = stack.pop() {
			let name = self
				.graph
				.node(&entry.id)
				.map_or_else(|| entry.id.clone(), |n| n.name.clone());
			rows.push(TreeRow {
				id: entry.id.clone(),
				name,
				depth,
				visible: self.visibility.nodes.get(&entry.id).copied().unwrap_or(false),
			});
			stack.extend(entry.children.iter().rev().map(|c| (c, depth + 1)));
		}
		rows
	}

	/// Dependency rows grouped by kind, groups in order of first appearance.
	pub fn dependency_groups(&self) -> Vec<(DependencyKind, Vec<DependencyRow>)> {
		let mut groups: Vec<(DependencyKind, Vec<DependencyRow>)> = Vec::new();
		for node in &self.graph.nodes {
			let NodePayload::Dependency { kind } = node.payload else {
				continue;
			};
			let row = DependencyRow {
				id: node.id.clone(),
				name: node.name.clone(),
				visible: self.visibility.is_visible(node),
			};
			match groups.iter_mut().find(|(k, _)| *k == kind) {
				Some((_, rows)) => rows.push(row),
				None => groups.push((kind, vec![row])),
			}
		}
		groups
	}

	fn clear_graph(&mut self) {
		self.description = None;
		self.graph = RepoGraph::default();
		self.visibility = VisibilityState::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::customization::LayoutMode;
	use crate::model::parse_description;

	fn demo() -> RepoDescription {
		parse_description(
			r#"{"name": "demo", "description": "", "languages": [],
			"dependencies": [{"name": "react", "type": "frontend"}],
			"tree": [{"id": "src", "name": "src", "type": "folder", "path": "src"}]}"#,
			3,
		)
		.unwrap()
	}

	#[test]
	fn visualize_success_builds_graph() {
		let mut ws = Workspace::default();
		let ticket = ws.begin_visualize(" https://example.com/demo ").unwrap();
		assert_eq!(
			ws.status(),
			&LoadStatus::Loading {
				locator: "https://example.com/demo".into()
			}
		);
		assert!(ws.complete_visualize(ticket, Ok(demo())));
		assert_eq!(ws.status(), &LoadStatus::Ready);
		assert_eq!(ws.visible_graph().nodes.len(), 3);
		assert!(!ws.is_loading());
	}

	#[test]
	fn second_request_while_loading_is_rejected() {
		let mut ws = Workspace::default();
		ws.begin_visualize("a").unwrap();
		assert_eq!(ws.begin_visualize("b"), Err(WorkspaceError::Busy));
		assert_eq!(ws.begin_visualize("   "), Err(WorkspaceError::EmptyLocator));
	}

	#[test]
	fn failure_clears_previous_graph() {
		let mut ws = Workspace::default();
		ws.load(demo());
		let ticket = ws.begin_visualize("next").unwrap();
		assert!(ws.graph().is_empty());
		ws.complete_visualize(ticket, Err(DescribeError::Status(500)));
		assert!(ws.graph().is_empty());
		assert!(ws.description().is_none());
		assert!(matches!(ws.status(), LoadStatus::Failed(msg) if msg.contains("500")));
	}

	#[test]
	fn stale_ticket_is_ignored() {
		let mut ws = Workspace::default();
		let first = ws.begin_visualize("a").unwrap();
		ws.complete_visualize(first, Err(DescribeError::NotEmbedded));
		let second = ws.begin_visualize("b").unwrap();
		assert!(!ws.complete_visualize(first, Ok(demo())));
		assert!(ws.is_loading());
		assert!(ws.complete_visualize(second, Ok(demo())));
	}

	#[test]
	fn customization_survives_reload() {
		let mut ws = Workspace::new(CustomizationOptions::with_layout(LayoutMode::Radial));
		ws.load(demo());
		let ticket = ws.begin_visualize("again").unwrap();
		ws.complete_visualize(ticket, Ok(demo()));
		assert_eq!(ws.customization().layout, LayoutMode::Radial);
	}

	#[test]
	fn tree_rows_are_preorder_with_depth() {
		let mut ws = Workspace::default();
		ws.load(
			parse_description(
				r#"{"name": "n", "description": "", "languages": [], "dependencies": [],
				"tree": [
					{"id": "src", "name": "src", "type": "folder", "path": "src", "children": [
						{"id": "src/a.rs", "name": "a.rs", "type": "file", "path": "src/a.rs"}
					]},
					{"id": "README.md", "name": "README.md", "type": "file", "path": "README.md"}
				]}"#,
				3,
			)
			.unwrap(),
		);
		ws.set_node_visible("src/a.rs", false);
		let rows = ws.tree_rows();
		let summary: Vec<(&str, usize, bool)> =
			rows.iter().map(|r| (r.name.as_str(), r.depth, r.visible)).collect();
		assert_eq!(summary, vec![("src", 0, true), ("a.rs", 1, false), ("README.md", 0, true)]);
	}

	#[test]
	fn dependencies_group_by_first_seen_kind() {
		let mut ws = Workspace::default();
		ws.load(
			parse_description(
				r#"{"name": "n", "description": "", "languages": [], "tree": [],
				"dependencies": [
					{"name": "jest", "type": "dev"},
					{"name": "react", "type": "frontend"},
					{"name": "vitest", "type": "dev"}
				]}"#,
				3,
			)
			.unwrap(),
		);
		ws.set_dependency_visible("dep-react", false);
		let groups = ws.dependency_groups();
		assert_eq!(groups.len(), 2);
		assert_eq!(groups[0].0, DependencyKind::Dev);
		let dev: Vec<&str> = groups[0].1.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(dev, ["jest", "vitest"]);
		assert_eq!(groups[1].1[0].id, "dep-react");
		assert!(!groups[1].1[0].visible);
	}

	#[test]
	fn toggles_flow_into_visible_graph() {
		let mut ws = Workspace::default();
		ws.load(demo());
		ws.set_dependency_visible("dep-react", false);
		assert_eq!(ws.set_node_visible("src", false), 1);
		let visible = ws.visible_graph();
		assert_eq!(visible.nodes.len(), 1);
		assert!(visible.edges.is_empty());
	}
}
