//! Canvas rendering for the repository graph.
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Edges, straight lines in world space
//! 3. Nodes with their labels, then the hover ring

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{LayoutEngine, NodeVisual};
use super::theme::{Color, Theme};

/// Renders the complete scene to the canvas.
pub fn render(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(engine, ctx, theme);

	let t = engine.transform();
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	draw_edges(engine, ctx);
	draw_nodes(engine, ctx, theme, t.k);

	ctx.restore();
}

fn draw_background(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (engine.width, engine.height);
	let bg = &theme.background;
	let gradient = bg
		.use_gradient
		.then(|| ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8))
		.and_then(Result::ok);

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edges(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d) {
	for (edge, (x1, y1), (x2, y2)) in engine.edge_segments() {
		ctx.set_stroke_style_str(&edge.stroke);
		ctx.set_line_width(edge.width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d, theme: &Theme, k: f64) {
	ctx.set_font(&theme.label.font);
	for (_, node, (x, y)) in engine.node_positions() {
		draw_node(ctx, node, x, y, theme, k);
	}

	let hovered = engine.hovered_index().and_then(|i| engine.position(i).zip(engine.nodes().get(i)));
	if let Some(((x, y), node)) = hovered {
		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius + 3.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.hover_ring.to_css());
		ctx.set_line_width(2.0 / k);
		ctx.stroke();
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeVisual,
	x: f64,
	y: f64,
	theme: &Theme,
	k: f64,
) {
	let r = node.radius;
	let shaded = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - r * 0.3, y - r * 0.3, 0.0, x, y, r))
		.and_then(Result::ok);

	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	match shaded {
		Some(gradient) => {
			let base = Color::parse(&node.fill);
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.fill),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / k);
		ctx.stroke();
	}

	let label = &theme.label;
	ctx.set_fill_style_str(&label.color.to_css());
	let _ = ctx.fill_text(&node.label, x + r + label.offset_x, y + label.offset_y);
}
