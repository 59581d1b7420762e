//! Sidebar: file tree and dependency toggles plus customization controls.

use leptos::prelude::*;

use crate::customization::{CustomizationOptions, LayoutMode};
use crate::graph::{NodeCategory, VisibleGraph};
use crate::workspace::Workspace;

/// Applies `edit` to a copy of the current options and stores the result.
fn customize(workspace: RwSignal<Workspace>, edit: impl FnOnce(&mut CustomizationOptions)) {
	workspace.update(|ws| {
		let mut options = ws.customization().clone();
		edit(&mut options);
		ws.set_customization(options);
	});
}

#[component]
fn Section(title: &'static str, children: Children) -> impl IntoView {
	let (open, set_open) = signal(true);
	view! {
		<div class="sidebar-section">
			<button class="sidebar-section-title" on:click=move |_| set_open.update(|o| *o = !*o)>
				<span>{title}</span>
				<span>{move || if open.get() { "\u{25B4}" } else { "\u{25BE}" }}</span>
			</button>
			<div class="sidebar-section-body" style:display=move || if open.get() { "block" } else { "none" }>
				{children()}
			</div>
		</div>
	}
}

#[component]
fn FileTree(workspace: RwSignal<Workspace>) -> impl IntoView {
	move || {
		workspace
			.with(Workspace::tree_rows)
			.into_iter()
			.map(|row| {
				let id = row.id;
				view! {
					<label class="tree-row" style:margin-left=format!("{}px", row.depth * 16)>
						<input
							type="checkbox"
							prop:checked=row.visible
							on:change=move |ev| {
								let visible = event_target_checked(&ev);
								workspace.update(|ws| {
									ws.set_node_visible(&id, visible);
								});
							}
						/>
						<span>{row.name}</span>
					</label>
				}
			})
			.collect_view()
	}
}

#[component]
fn DependencyList(workspace: RwSignal<Workspace>) -> impl IntoView {
	move || {
		workspace
			.with(Workspace::dependency_groups)
			.into_iter()
			.map(|(kind, rows)| {
				let rows = rows
					.into_iter()
					.map(|row| {
						let id = row.id;
						view! {
							<label class="dependency-row">
								<input
									type="checkbox"
									prop:checked=row.visible
									on:change=move |ev| {
										let visible = event_target_checked(&ev);
										workspace.update(|ws| ws.set_dependency_visible(&id, visible));
									}
								/>
								<span>{row.name}</span>
							</label>
						}
					})
					.collect_view();
				view! {
					<div class="dependency-group">
						<h4>{kind.as_str()}</h4>
						{rows}
					</div>
				}
			})
			.collect_view()
	}
}

#[component]
fn CustomizationPanel(workspace: RwSignal<Workspace>) -> impl IntoView {
	let options = Memo::new(move |_| workspace.with(|ws| ws.customization().clone()));

	let layouts = LayoutMode::ALL
		.into_iter()
		.map(|mode| {
			view! {
				<option value=mode.as_str() selected=move || options.with(|o| o.layout == mode)>
					{mode.label()}
				</option>
			}
		})
		.collect_view();

	let colors = NodeCategory::ALL
		.into_iter()
		.map(|category| {
			view! {
				<div class="color-row">
					<label>{category.as_str()}</label>
					<input
						type="color"
						prop:value=move || options.with(|o| o.node_colors.get(category).to_string())
						on:input=move |ev| {
							let color = event_target_value(&ev);
							customize(workspace, |o| o.node_colors.set(category, color));
						}
					/>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="customization">
			<label>"Layout"</label>
			<select on:change=move |ev| {
				if let Some(mode) = LayoutMode::parse(&event_target_value(&ev)) {
					customize(workspace, |o| o.layout = mode);
				}
			}>{layouts}</select>
			<h4>"Node Colors"</h4>
			{colors}
			<h4>"Links"</h4>
			<div class="color-row">
				<label>"color"</label>
				<input
					type="color"
					prop:value=move || options.with(|o| o.link_style.color.clone())
					on:input=move |ev| {
						let color = event_target_value(&ev);
						customize(workspace, |o| o.link_style.color = color);
					}
				/>
			</div>
			<div class="color-row">
				<label>"width"</label>
				<input
					type="range"
					min="0.5"
					max="5"
					step="0.5"
					prop:value=move || options.with(|o| o.link_style.stroke_width.to_string())
					on:input=move |ev| {
						if let Ok(width) = event_target_value(&ev).parse::<f64>() {
							customize(workspace, |o| o.link_style.stroke_width = width);
						}
					}
				/>
			</div>
		</div>
	}
}

/// Left-hand panel. Shows a hint until a repository is loaded.
#[component]
pub fn Sidebar(workspace: RwSignal<Workspace>, #[prop(into)] graph: Signal<VisibleGraph>) -> impl IntoView {
	let loaded = Memo::new(move |_| workspace.with(|ws| ws.description().is_some()));
	let heading = move || {
		workspace.with(|ws| {
			ws.description()
				.map(|d| (d.name.clone(), d.description.clone()))
				.unwrap_or_default()
		})
	};
	let stats = move || {
		graph.with(|g| {
			g.stats()
				.into_iter()
				.map(|(category, count)| format!("{count} {}", category.as_str()))
				.collect::<Vec<_>>()
				.join(" \u{b7} ")
		})
	};

	move || {
		if !loaded.get() {
			return view! {
				<aside class="sidebar sidebar-empty">"Please visualize a repository to see options."</aside>
			}
			.into_any();
		}
		view! {
			<aside class="sidebar">
				<div class="sidebar-header">
					<h2>{move || heading().0}</h2>
					<p>{move || heading().1}</p>
					<p class="sidebar-stats">{stats}</p>
				</div>
				<div class="sidebar-body">
					<Section title="File Structure">
						<FileTree workspace=workspace />
					</Section>
					<Section title="Dependencies">
						<DependencyList workspace=workspace />
					</Section>
					<Section title="Customization">
						<CustomizationPanel workspace=workspace />
					</Section>
				</div>
			</aside>
		}
		.into_any()
	}
}
