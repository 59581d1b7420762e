//! Force-directed repository graph component.
//!
//! Renders the visible graph on an HTML canvas with:
//! - A d3-style force simulation whose forces depend on the layout mode
//! - Identity-preserving updates, so toggling visibility or colors keeps
//!   the nodes that stay on screen where they are
//! - Pan, zoom, node dragging and hover tooltips
//!
//! # Example
//!
//! ```ignore
//! let graph = Memo::new(move |_| workspace.with(Workspace::visible_graph));
//! let options = Memo::new(move |_| workspace.with(|ws| ws.customization().clone()));
//!
//! view! { <RepoGraphCanvas graph=graph customization=options /> }
//! ```

mod component;
pub mod forces;
mod quadtree;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;

pub use component::RepoGraphCanvas;
pub use state::{LayoutEngine, Reconciliation};
pub use theme::{Theme, ThemeName};
