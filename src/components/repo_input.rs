//! Repository locator form.

use leptos::prelude::*;
use web_sys::SubmitEvent;

/// Text input plus Visualize button; both are disabled while `loading`.
#[component]
pub fn RepoInput(#[prop(into)] loading: Signal<bool>, on_visualize: Callback<String>) -> impl IntoView {
	let (url, set_url) = signal(String::new());

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if !loading.get_untracked() {
			on_visualize.run(url.get_untracked());
		}
	};

	view! {
		<div class="repo-input">
			<form on:submit=on_submit>
				<input
					type="text"
					placeholder="Enter a public GitHub repository URL (e.g., https://github.com/facebook/react)"
					prop:value=move || url.get()
					prop:disabled=move || loading.get()
					on:input=move |ev| set_url.set(event_target_value(&ev))
				/>
				<button type="submit" prop:disabled=move || loading.get()>
					{move || if loading.get() { "Analyzing..." } else { "Visualize" }}
				</button>
			</form>
		</div>
	}
}
