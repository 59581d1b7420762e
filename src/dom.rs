//! Small DOM lookups shared by config loading and the embedded describer.

/// Text content of the `<script>` element with the given id.
#[cfg(target_arch = "wasm32")]
pub fn script_text(id: &str) -> Option<String> {
	use wasm_bindgen::JsCast;
	use web_sys::HtmlScriptElement;

	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Outside the browser there is no document to read from.
#[cfg(not(target_arch = "wasm32"))]
pub fn script_text(_id: &str) -> Option<String> {
	None
}
