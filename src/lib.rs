//! repo-graph: interactive force-directed visualization of a repository.
//!
//! A repository description (file tree, languages, dependencies) is turned
//! into a graph, filtered by user-controlled visibility, and laid out on a
//! canvas by a d3-style force simulation. The pure parts (model, graph,
//! workspace, simulation and layout engine) run natively; the components
//! need a browser.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod components;
pub mod config;
pub mod customization;
pub mod describer;
mod dom;
pub mod graph;
pub mod model;
pub mod workspace;

pub use components::force_graph::{LayoutEngine, RepoGraphCanvas};
pub use config::{AppConfig, load_config};
pub use customization::{CustomizationOptions, LayoutMode};
pub use describer::{DescribeError, EmbeddedDescriber, HttpDescriber, RepoDescriber};
pub use graph::{RepoGraph, VisibleGraph};
pub use model::{RepoDescription, parse_description};
pub use workspace::{LoadStatus, Workspace, WorkspaceError};

use components::force_graph::Theme;
use components::{RepoInput, Sidebar};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("repo-graph: logging initialized");
}

/// Starts a visualize request for `locator` and applies its answer when it arrives.
fn visualize<D>(workspace: RwSignal<Workspace>, describer: D, locator: String)
where
	D: RepoDescriber + 'static,
{
	let ticket = match workspace.try_update(|ws| ws.begin_visualize(&locator)) {
		Some(Ok(ticket)) => ticket,
		Some(Err(e)) => {
			warn!("repo-graph: {e}");
			return;
		}
		None => return,
	};
	spawn_local(async move {
		let result = describer.describe(&locator).await;
		workspace.update(|ws| {
			ws.complete_visualize(ticket, result);
		});
	});
}

/// Main application component.
///
/// Reads the page configuration, visualizes an embedded description if the
/// page carries one, and otherwise waits for a repository URL.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let theme = Theme::named(config.theme);
	let workspace = RwSignal::new(Workspace::new(CustomizationOptions::with_layout(
		config.default_layout,
	)));

	let embedded = EmbeddedDescriber::new(config.max_tree_depth);
	if embedded.is_available() {
		info!("repo-graph: visualizing embedded description");
		visualize(workspace, embedded, "embedded".to_string());
	}

	let (endpoint, max_depth) = (config.describer_endpoint.clone(), config.max_tree_depth);
	let on_visualize = Callback::new(move |locator: String| {
		visualize(workspace, HttpDescriber::new(endpoint.clone(), max_depth), locator);
	});

	let visible = Memo::new(move |_| workspace.with(Workspace::visible_graph));
	let options = Memo::new(move |_| workspace.with(|ws| ws.customization().clone()));
	let loading = Signal::derive(move || workspace.with(Workspace::is_loading));
	let failure = move || {
		workspace.with(|ws| match ws.status() {
			LoadStatus::Failed(message) => Some(message.clone()),
			_ => None,
		})
	};
	let idle = move || workspace.with(|ws| matches!(ws.status(), LoadStatus::Idle));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="RepoViz" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app">
			<header class="app-header">
				<h1>"RepoViz"</h1>
			</header>
			<main class="app-main">
				<Sidebar workspace=workspace graph=visible />
				<div class="graph-pane">
					<RepoInput loading=loading on_visualize=on_visualize />
					<Show when=move || loading.get()>
						<div class="overlay overlay-loading">
							<p>"Analyzing repository... this may take a moment."</p>
						</div>
					</Show>
					{move || {
						failure()
							.map(|message| {
								view! {
									<div class="overlay overlay-error">
										<h3>"Analysis Failed"</h3>
										<p>{message}</p>
									</div>
								}
							})
					}}
					<Show when=idle>
						<div class="welcome">
							<h2>"Welcome to RepoViz"</h2>
							<p>
								"Enter a public GitHub repository URL above to generate an interactive visualization of its structure, dependencies, and tech stack."
							</p>
						</div>
					</Show>
					<div class="graph-container">
						<RepoGraphCanvas graph=visible customization=options theme=theme />
					</div>
				</div>
			</main>
		</div>
	}
}
