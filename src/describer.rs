//! Boundary to the external repository describer.
//!
//! Everything that can go wrong while obtaining a description is folded into
//! [`DescribeError`]; callers turn it into a single user-visible message.

use log::{info, warn};
use thiserror::Error;

use crate::model::{RepoDescription, parse_description};

/// Failure to obtain a usable repository description.
#[derive(Debug, Error)]
pub enum DescribeError {
	#[error("could not reach the repository describer: {0}")]
	Transport(String),
	#[error("repository describer answered with HTTP {0}")]
	Status(u16),
	#[error("repository describer returned malformed JSON: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("repository description is invalid: {0}")]
	Schema(String),
	#[error("no embedded repository description found")]
	NotEmbedded,
}

/// Produces a [`RepoDescription`] for a repository locator (usually a URL).
#[allow(async_fn_in_trait, reason = "single-threaded wasm target, futures are never sent")]
pub trait RepoDescriber {
	async fn describe(&self, locator: &str) -> Result<RepoDescription, DescribeError>;
}

/// Fetches descriptions from an HTTP endpoint: `GET {endpoint}?repo={locator}`.
#[derive(Clone, Debug)]
pub struct HttpDescriber {
	endpoint: String,
	max_depth: usize,
}

impl HttpDescriber {
	pub fn new(endpoint: impl Into<String>, max_depth: usize) -> Self {
		Self {
			endpoint: endpoint.into(),
			max_depth,
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	#[cfg(target_arch = "wasm32")]
	async fn fetch_text(&self, locator: &str) -> Result<String, DescribeError> {
		use wasm_bindgen::JsCast;
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let encoded: String = js_sys::encode_uri_component(locator).into();
		let separator = if self.endpoint.contains('?') { '&' } else { '?' };
		let url = format!("{}{}repo={}", self.endpoint, separator, encoded);

		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);

		let request = Request::new_with_str_and_init(&url, &opts)
			.map_err(|e| DescribeError::Transport(format!("{e:?}")))?;
		let window =
			web_sys::window().ok_or_else(|| DescribeError::Transport("no window".into()))?;
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| DescribeError::Transport(format!("{e:?}")))?;
		let resp: Response = resp_value
			.dyn_into()
			.map_err(|_| DescribeError::Transport("fetch did not yield a Response".into()))?;

		if !resp.ok() {
			return Err(DescribeError::Status(resp.status()));
		}

		let text = JsFuture::from(
			resp.text()
				.map_err(|e| DescribeError::Transport(format!("{e:?}")))?,
		)
		.await
		.map_err(|e| DescribeError::Transport(format!("{e:?}")))?;

		text.as_string()
			.ok_or_else(|| DescribeError::Transport("response body is not text".into()))
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn fetch_text(&self, _locator: &str) -> Result<String, DescribeError> {
		Err(DescribeError::Transport(
			"HTTP describer is only available in the browser".into(),
		))
	}
}

impl RepoDescriber for HttpDescriber {
	async fn describe(&self, locator: &str) -> Result<RepoDescription, DescribeError> {
		info!("repo-graph: describing {locator} via {}", self.endpoint);
		let body = self.fetch_text(locator).await?;
		parse_description(&body, self.max_depth).inspect_err(|e| {
			warn!("repo-graph: rejected description for {locator}: {e}");
		})
	}
}

/// Reads a description embedded in the page as `<script id="repo-data">`.
///
/// The locator is ignored; the page carries exactly one description.
#[derive(Clone, Debug)]
pub struct EmbeddedDescriber {
	element_id: String,
	max_depth: usize,
}

impl EmbeddedDescriber {
	pub const DEFAULT_ELEMENT_ID: &'static str = "repo-data";

	pub fn new(max_depth: usize) -> Self {
		Self {
			element_id: Self::DEFAULT_ELEMENT_ID.to_string(),
			max_depth,
		}
	}

	/// Whether the page carries an embedded description.
	pub fn is_available(&self) -> bool {
		crate::dom::script_text(&self.element_id).is_some()
	}
}

impl RepoDescriber for EmbeddedDescriber {
	async fn describe(&self, _locator: &str) -> Result<RepoDescription, DescribeError> {
		let text = crate::dom::script_text(&self.element_id).ok_or(DescribeError::NotEmbedded)?;
		parse_description(&text, self.max_depth)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_messages_are_user_readable() {
		assert_eq!(
			DescribeError::Status(503).to_string(),
			"repository describer answered with HTTP 503"
		);
		let json_err = serde_json::from_str::<RepoDescription>("{").unwrap_err();
		assert!(
			DescribeError::from(json_err)
				.to_string()
				.starts_with("repository describer returned malformed JSON")
		);
	}

	#[test]
	fn embedded_description_is_absent_off_browser() {
		assert!(!EmbeddedDescriber::new(3).is_available());
	}

	#[test]
	fn http_describer_keeps_endpoint() {
		let d = HttpDescriber::new("/api/describe", 3);
		assert_eq!(d.endpoint(), "/api/describe");
	}
}
