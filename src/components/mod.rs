//! UI components.

pub mod force_graph;
pub mod repo_input;
pub mod sidebar;

pub use force_graph::RepoGraphCanvas;
pub use repo_input::RepoInput;
pub use sidebar::Sidebar;
