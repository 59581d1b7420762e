//! Repository graph model.
//!
//! - [`build`] turns a description into the full [`RepoGraph`]
//! - [`filter`] derives the [`VisibleGraph`] from it and a [`VisibilityState`]
//! - [`VisibilityState`] carries the two mutation operations

mod builder;
mod types;
mod visibility;

pub use builder::{build, dependency_id};
pub use types::{
	DEPENDENCY_RADIUS, FILE_RADIUS, FOLDER_RADIUS, GraphEdge, GraphNode, HierarchyEntry,
	LANGUAGE_RADIUS, NodeCategory, NodePayload, REPO_RADIUS, ROOT_ID, RepoGraph,
};
pub use visibility::{VisibilityState, VisibleGraph, filter};
