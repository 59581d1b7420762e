//! Layout engine: persistent simulation, view transform and the drawn scene.
//!
//! The engine lives as long as the canvas. Every [`LayoutEngine::render`]
//! joins the incoming nodes and edges to the previous scene by id, so
//! persisting nodes keep their position and momentum, then reconfigures the
//! forces for the selected layout mode and reheats the simulation.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::forces::{CenterForce, Force, LinkForce, ManyBodyForce, PositionForce, RadialForce};
use super::simulation::{Body, ForceSlot, Simulation};
use crate::customization::{CustomizationOptions, LayoutMode};
use crate::graph::{GraphNode, NodeCategory, VisibleGraph};

/// Rest length of every link.
pub const LINK_DISTANCE: f64 = 50.0;
/// Zoom factor bounds.
pub const SCALE_EXTENT: (f64, f64) = (0.1, 4.0);
/// Alpha each render reheats the simulation to.
pub const RENDER_ALPHA: f64 = 0.3;
/// Alpha target held while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Visual representation of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub id: String,
	pub label: String,
	pub category: NodeCategory,
	pub radius: f64,
	pub fill: String,
	pub tooltip: String,
}

impl NodeVisual {
	fn new(node: &GraphNode, fill: String) -> Self {
		Self {
			id: node.id.clone(),
			label: node.name.clone(),
			category: node.category(),
			radius: node.radius,
			fill,
			tooltip: node.tooltip(),
		}
	}
}

/// Visual representation of one edge, resolved to body indices.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub key: (String, String),
	pub source: usize,
	pub target: usize,
	pub stroke: String,
	pub width: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to [`SCALE_EXTENT`].
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

/// Zoom behavior: a transform plus its allowed scale range.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomBehavior {
	pub transform: ViewTransform,
	pub scale_extent: (f64, f64),
}

impl ZoomBehavior {
	pub fn new(scale_extent: (f64, f64)) -> Self {
		Self {
			transform: ViewTransform::default(),
			scale_extent,
		}
	}

	/// Scales by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn scale_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let t = &mut self.transform;
		let new_k = (t.k * factor).clamp(self.scale_extent.0, self.scale_extent.1);
		let ratio = new_k / t.k;
		t.x = sx - (sx - t.x) * ratio;
		t.y = sy - (sy - t.y) * ratio;
		t.k = new_k;
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// How a render call changed the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
	pub nodes_entered: usize,
	pub nodes_updated: usize,
	pub nodes_exited: usize,
	pub edges_entered: usize,
	pub edges_updated: usize,
	pub edges_exited: usize,
}

/// Long-lived layout state behind one canvas.
#[derive(Default)]
pub struct LayoutEngine {
	simulation: Option<Simulation>,
	zoom: Option<ZoomBehavior>,
	layout: LayoutMode,
	nodes: Vec<NodeVisual>,
	node_index: HashMap<String, usize>,
	edges: Vec<EdgeVisual>,
	pub drag: DragState,
	pub pan: PanState,
	hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
}

impl LayoutEngine {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Self::default()
		}
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	pub fn transform(&self) -> ViewTransform {
		self.zoom
			.as_ref()
			.map(|z| z.transform)
			.unwrap_or_default()
	}

	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EdgeVisual] {
		&self.edges
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.node_index.get(id).copied()
	}

	/// Live position of the node at `idx`.
	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.simulation
			.as_ref()
			.and_then(|s| s.bodies().get(idx))
			.map(|b| (b.x, b.y))
	}

	pub fn hovered_index(&self) -> Option<usize> {
		self.hovered
	}

	pub fn hovered(&self) -> Option<&NodeVisual> {
		self.hovered.and_then(|i| self.nodes.get(i))
	}

	/// Whether the simulation still wants animation frames.
	pub fn is_active(&self) -> bool {
		self.simulation.as_ref().is_some_and(Simulation::is_running)
	}

	/// Re-targets the positional forces on the new viewport and reheats.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let Some(sim) = self.simulation.as_mut() else {
			return;
		};
		configure_layout(sim, self.layout, width, height);
		if !self.nodes.is_empty() {
			sim.set_alpha(RENDER_ALPHA);
			sim.restart();
		}
	}

	fn create_simulation(&self) -> Simulation {
		let mut sim = Simulation::new();
		sim.set_force(ForceSlot::Link, Some(Force::Link(LinkForce::new(LINK_DISTANCE))));
		sim.set_force(ForceSlot::Charge, Some(Force::ManyBody(ManyBodyForce::new(-100.0))));
		sim.set_force(
			ForceSlot::Center,
			Some(Force::Center(CenterForce::new(self.width / 2.0, self.height / 2.0))),
		);
		sim
	}

	/// Joins `graph` into the scene, applies `options` and reheats the layout.
	pub fn render(&mut self, graph: &VisibleGraph, options: &CustomizationOptions) -> Reconciliation {
		if self.simulation.is_none() {
			self.simulation = Some(self.create_simulation());
		}
		if self.zoom.is_none() {
			self.zoom = Some(ZoomBehavior::new(SCALE_EXTENT));
		}
		let (width, height) = (self.width, self.height);
		let Some(sim) = self.simulation.as_mut() else {
			return Reconciliation::default();
		};
		configure_layout(sim, options.layout, width, height);
		self.layout = options.layout;

		let mut rec = Reconciliation::default();
		let dragged_id = self
			.drag
			.node_idx
			.and_then(|i| self.nodes.get(i))
			.map(|n| n.id.clone());

		let old_bodies = sim.bodies().to_vec();
		let mut old_nodes: Vec<Option<NodeVisual>> = self.nodes.drain(..).map(Some).collect();
		let mut nodes = Vec::with_capacity(graph.nodes.len());
		let mut bodies = Vec::with_capacity(graph.nodes.len());
		let mut index = HashMap::with_capacity(graph.nodes.len());

		for node in &graph.nodes {
			if index.contains_key(&node.id) {
				continue;
			}
			let fill = options.node_colors.get(node.category()).to_string();
			let previous = self
				.node_index
				.get(&node.id)
				.and_then(|&i| old_nodes.get_mut(i).and_then(Option::take).map(|v| (i, v)));
			match previous {
				Some((i, mut visual)) => {
					rec.nodes_updated += 1;
					visual.fill = fill;
					nodes.push(visual);
					bodies.push(old_bodies.get(i).cloned().unwrap_or_else(Body::unplaced));
				}
				None => {
					rec.nodes_entered += 1;
					nodes.push(NodeVisual::new(node, fill));
					bodies.push(Body::unplaced());
				}
			}
			index.insert(node.id.clone(), nodes.len() - 1);
		}
		rec.nodes_exited = old_nodes.iter().filter(|n| n.is_some()).count();

		let old_keys: HashSet<(String, String)> = self.edges.drain(..).map(|e| e.key).collect();
		let mut edges = Vec::with_capacity(graph.edges.len());
		let mut seen = HashSet::with_capacity(graph.edges.len());
		for edge in &graph.edges {
			let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target))
			else {
				continue;
			};
			let key = edge.key();
			if !seen.insert(key.clone()) {
				continue;
			}
			if old_keys.contains(&key) {
				rec.edges_updated += 1;
			} else {
				rec.edges_entered += 1;
			}
			edges.push(EdgeVisual {
				key,
				source,
				target,
				stroke: options.link_style.color.clone(),
				width: options.link_style.stroke_width,
			});
		}
		rec.edges_exited = old_keys.len() - rec.edges_updated;

		let dragged_idx = dragged_id.and_then(|id| index.get(&id).copied());
		if self.drag.active && dragged_idx.is_none() {
			sim.set_alpha_target(0.0);
			self.drag = DragState::default();
		}

		sim.set_bodies(bodies);
		sim.set_links(edges.iter().map(|e| (e.source, e.target)).collect());
		if graph.is_empty() {
			sim.stop();
		} else {
			sim.set_alpha(RENDER_ALPHA);
			sim.restart();
		}

		self.nodes = nodes;
		self.node_index = index;
		self.edges = edges;
		self.hovered = None;
		self.drag.node_idx = dragged_idx;

		debug!("repo-graph: reconciled {rec:?}");
		rec
	}

	/// Advances the simulation one frame. Returns whether it is still hot.
	pub fn tick(&mut self) -> bool {
		self.simulation.as_mut().is_some_and(Simulation::step)
	}

	/// Straight segments between the live endpoints of every edge.
	pub fn edge_segments(&self) -> impl Iterator<Item = (&EdgeVisual, (f64, f64), (f64, f64))> {
		let bodies = self.simulation.as_ref().map(Simulation::bodies).unwrap_or_default();
		self.edges.iter().filter_map(move |e| {
			let (s, t) = (bodies.get(e.source)?, bodies.get(e.target)?);
			Some((e, (s.x, s.y), (t.x, t.y)))
		})
	}

	/// Every node with its live position.
	pub fn node_positions(&self) -> impl Iterator<Item = (usize, &NodeVisual, (f64, f64))> {
		let bodies = self.simulation.as_ref().map(Simulation::bodies).unwrap_or_default();
		self.nodes
			.iter()
			.enumerate()
			.filter_map(move |(i, n)| bodies.get(i).map(|b| (i, n, (b.x, b.y))))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform().invert(sx, sy)
	}

	/// Topmost node under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let min_hit = 4.0 / self.transform().k;
		self.node_positions()
			.filter(|(_, n, (x, y))| {
				let r = n.radius.max(min_hit);
				(x - gx).powi(2) + (y - gy).powi(2) <= r * r
			})
			.map(|(i, _, _)| i)
			.last()
	}

	/// Updates the hovered node from a pointer position.
	pub fn hover(&mut self, sx: f64, sy: f64) -> Option<&NodeVisual> {
		self.hovered = self.node_at_position(sx, sy);
		self.hovered()
	}

	pub fn clear_hover(&mut self) {
		self.hovered = None;
	}

	/// Pins the node under the pointer and keeps the layout warm.
	pub fn drag_start(&mut self, idx: usize, sx: f64, sy: f64) {
		let already_dragging = self.drag.active;
		let Some(sim) = self.simulation.as_mut() else {
			return;
		};
		if !already_dragging {
			sim.set_alpha_target(DRAG_ALPHA_TARGET);
			sim.restart();
		}
		let Some(body) = sim.body_mut(idx) else {
			return;
		};
		let (x, y) = (body.x, body.y);
		body.pin(x, y);
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
	}

	/// Moves the pin with the pointer.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			return;
		}
		let k = self.transform().k;
		let (nx, ny) = (
			self.drag.node_start_x + (sx - self.drag.start_x) / k,
			self.drag.node_start_y + (sy - self.drag.start_y) / k,
		);
		if let (Some(idx), Some(sim)) = (self.drag.node_idx, self.simulation.as_mut()) {
			if let Some(body) = sim.body_mut(idx) {
				body.pin(nx, ny);
			}
		}
	}

	/// Releases the pin and lets the layout cool again.
	pub fn drag_end(&mut self) {
		if !self.drag.active {
			return;
		}
		if let Some(sim) = self.simulation.as_mut() {
			sim.set_alpha_target(0.0);
			if let Some(body) = self.drag.node_idx.and_then(|i| sim.body_mut(i)) {
				body.unpin();
			}
		}
		self.drag = DragState::default();
	}

	pub fn pan_start(&mut self, sx: f64, sy: f64) {
		let t = self.transform();
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: t.x,
			transform_start_y: t.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		if let Some(zoom) = self.zoom.as_mut() {
			zoom.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			zoom.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn pan_end(&mut self) {
		self.pan = PanState::default();
	}

	/// Wheel zoom about the pointer.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		if let Some(zoom) = self.zoom.as_mut() {
			zoom.scale_at(sx, sy, factor);
		}
	}

	/// Stops the simulation and drops all engine state.
	pub fn dispose(&mut self) {
		if let Some(sim) = self.simulation.as_mut() {
			sim.stop();
		}
		self.simulation = None;
		self.zoom = None;
		self.nodes.clear();
		self.node_index.clear();
		self.edges.clear();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
	}
}

/// Installs the positional forces for `mode`.
fn configure_layout(sim: &mut Simulation, mode: LayoutMode, width: f64, height: f64) {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let center = || Some(Force::Center(CenterForce::new(cx, cy)));
	let charge = |strength| Some(Force::ManyBody(ManyBodyForce::new(strength)));
	match mode {
		LayoutMode::Force => {
			sim.set_force(ForceSlot::Center, center());
			sim.set_force(ForceSlot::Charge, charge(-100.0));
			sim.set_force(ForceSlot::Radial, None);
			sim.set_force(ForceSlot::X, None);
			sim.set_force(ForceSlot::Y, None);
		}
		LayoutMode::Radial => {
			let ring = RadialForce::new(width.min(height) / 3.0, cx, cy).with_strength(0.5);
			sim.set_force(ForceSlot::Center, center());
			sim.set_force(ForceSlot::Charge, charge(-50.0));
			sim.set_force(ForceSlot::Radial, Some(Force::Radial(ring)));
			sim.set_force(ForceSlot::X, None);
			sim.set_force(ForceSlot::Y, None);
		}
		LayoutMode::Hierarchical => {
			sim.set_force(ForceSlot::Center, None);
			sim.set_force(ForceSlot::Radial, None);
			sim.set_force(ForceSlot::Charge, charge(-150.0));
			sim.set_force(ForceSlot::Y, Some(Force::Y(PositionForce::new(cy, 0.05))));
			sim.set_force(ForceSlot::X, Some(Force::X(PositionForce::new(cx, 0.02))));
		}
	}
}
