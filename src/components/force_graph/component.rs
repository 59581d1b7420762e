//! Leptos component wrapping the repository graph canvas.
//!
//! The component owns one [`LayoutEngine`] for its whole lifetime. Whenever
//! the visible graph or the customization options change, the engine
//! reconciles the new scene and reheats; a `requestAnimationFrame` loop then
//! ticks and redraws until the simulation cools. Pointer interactions request
//! single redraws on top of that.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::LayoutEngine;
use super::theme::Theme;
use crate::customization::CustomizationOptions;
use crate::graph::VisibleGraph;

/// Tooltip offset from the pointer.
const TOOLTIP_OFFSET: (f64, f64) = (10.0, -10.0);

/// Engine plus the canvas it draws on.
struct GraphContext {
	engine: LayoutEngine,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
}

#[derive(Clone, Debug, PartialEq)]
struct Tooltip {
	text: String,
	left: f64,
	top: f64,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Schedules at most one pending animation frame at a time.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	scheduled: Rc<Cell<bool>>,
}

impl FrameLoop {
	fn install(&self, context: SharedContext) {
		let frame = self.clone();
		*self.callback.borrow_mut() = Some(Closure::new(move || {
			frame.scheduled.set(false);
			let again = {
				let mut guard = context.borrow_mut();
				let Some(c) = guard.as_mut() else {
					return;
				};
				if !c.canvas.is_connected() {
					info!("repo-graph: canvas detached, stopping layout");
					c.engine.dispose();
					*guard = None;
					return;
				}
				let hot = c.engine.tick();
				render::render(&c.engine, &c.ctx, &c.theme);
				hot
			};
			if again {
				frame.request();
			}
		}));
	}

	fn request(&self) {
		if self.scheduled.replace(true) {
			return;
		}
		let requested = match (web_sys::window(), self.callback.borrow().as_ref()) {
			(Some(window), Some(cb)) => window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.is_ok(),
			_ => false,
		};
		if !requested {
			self.scheduled.set(false);
		}
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn create_context(canvas: HtmlCanvasElement, theme: Theme) -> Option<GraphContext> {
	let (w, h) = parent_size(&canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok().flatten()?.dyn_into().ok()?;
	info!("repo-graph: canvas ready at {w}x{h}");
	Some(GraphContext {
		engine: LayoutEngine::new(w, h),
		canvas,
		ctx,
		theme,
	})
}

/// Renders the visible repository graph on a canvas element.
///
/// The canvas fills its parent; the parent's size is measured when the
/// canvas is first drawn and again whenever the window resizes.
#[component]
pub fn RepoGraphCanvas(
	#[prop(into)] graph: Signal<VisibleGraph>,
	#[prop(into)] customization: Signal<CustomizationOptions>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let frames = FrameLoop::default();
	frames.install(context.clone());
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (tooltip, set_tooltip) = signal(None::<Tooltip>);
	let theme = theme.unwrap_or_default();

	let (context_fx, frames_fx) = (context.clone(), frames.clone());
	Effect::new(move |_| {
		let graph = graph.get();
		let options = customization.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		{
			let mut guard = context_fx.borrow_mut();
			if guard.is_none() {
				*guard = create_context(canvas.clone(), theme.clone());
				if guard.is_none() {
					warn!("repo-graph: canvas has no 2d context");
					return;
				}
				install_resize_listener(&resize_cb, context_fx.clone(), frames_fx.clone());
			}
			if let Some(c) = guard.as_mut() {
				c.engine.render(&graph, &options);
			}
		}
		set_tooltip.set(None);
		frames_fx.request();
	});

	let (context_md, frames_md) = (context.clone(), frames.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			match c.engine.node_at_position(x, y) {
				Some(idx) => c.engine.drag_start(idx, x, y),
				None => c.engine.pan_start(x, y),
			}
		}
		frames_md.request();
	};

	let (context_mm, frames_mm) = (context.clone(), frames.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.engine.drag.active {
				c.engine.drag_to(x, y);
			} else if c.engine.pan.active {
				c.engine.pan_to(x, y);
			}
			let next = c.engine.hover(x, y).map(|node| Tooltip {
				text: node.tooltip.clone(),
				left: ev.client_x() as f64 + TOOLTIP_OFFSET.0,
				top: ev.client_y() as f64 + TOOLTIP_OFFSET.1,
			});
			if tooltip.with_untracked(|t| *t != next) {
				set_tooltip.set(next);
			}
		}
		frames_mm.request();
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.engine.drag_end();
			c.engine.pan_end();
		}
	};

	let (context_ml, frames_ml) = (context.clone(), frames.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.engine.drag_end();
			c.engine.pan_end();
			c.engine.clear_hover();
		}
		set_tooltip.set(None);
		frames_ml.request();
	};

	let (context_wh, frames_wh) = (context.clone(), frames.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.engine.zoom_at(x, y, ev.delta_y());
		}
		frames_wh.request();
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="repo-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; width: 100%; height: 100%; cursor: grab;"
		/>
		<div
			class="tooltip"
			style:position="fixed"
			style:pointer-events="none"
			style:white-space="pre"
			style:visibility=move || if tooltip.with(Option::is_some) { "visible" } else { "hidden" }
			style:left=move || tooltip.with(|t| t.as_ref().map_or(0.0, |t| t.left)).to_string() + "px"
			style:top=move || tooltip.with(|t| t.as_ref().map_or(0.0, |t| t.top)).to_string() + "px"
		>
			{move || tooltip.with(|t| t.as_ref().map(|t| t.text.clone()).unwrap_or_default())}
		</div>
	}
}

/// Re-measures the canvas on window resize and redraws at the new size.
fn install_resize_listener(
	slot: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	context: SharedContext,
	frames: FrameLoop,
) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(old) = slot.borrow_mut().take() {
		let _ = window.remove_event_listener_with_callback("resize", old.as_ref().unchecked_ref());
	}
	let cb: Closure<dyn FnMut()> = Closure::new(move || {
		if let Some(ref mut c) = *context.borrow_mut() {
			let (w, h) = parent_size(&c.canvas);
			c.canvas.set_width(w as u32);
			c.canvas.set_height(h as u32);
			c.engine.resize(w, h);
		}
		frames.request();
	});
	let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	*slot.borrow_mut() = Some(cb);
}
