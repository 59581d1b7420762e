//! Presentation options: layout mode, per-category colors and link style.

use serde::{Deserialize, Serialize};

use crate::graph::NodeCategory;

/// Which positional forces the layout engine installs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
	#[default]
	Force,
	Radial,
	Hierarchical,
}

impl LayoutMode {
	pub const ALL: [LayoutMode; 3] = [LayoutMode::Force, LayoutMode::Radial, LayoutMode::Hierarchical];

	pub fn as_str(self) -> &'static str {
		match self {
			LayoutMode::Force => "force",
			LayoutMode::Radial => "radial",
			LayoutMode::Hierarchical => "hierarchical",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			LayoutMode::Force => "Force-Directed",
			LayoutMode::Radial => "Radial",
			LayoutMode::Hierarchical => "Hierarchical",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|m| m.as_str() == s)
	}
}

/// One CSS color per node category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeColors {
	pub repo: String,
	pub folder: String,
	pub file: String,
	pub language: String,
	pub dependency: String,
}

impl NodeColors {
	pub fn get(&self, category: NodeCategory) -> &str {
		match category {
			NodeCategory::Repo => &self.repo,
			NodeCategory::Folder => &self.folder,
			NodeCategory::File => &self.file,
			NodeCategory::Language => &self.language,
			NodeCategory::Dependency => &self.dependency,
		}
	}

	pub fn set(&mut self, category: NodeCategory, color: impl Into<String>) {
		let slot = match category {
			NodeCategory::Repo => &mut self.repo,
			NodeCategory::Folder => &mut self.folder,
			NodeCategory::File => &mut self.file,
			NodeCategory::Language => &mut self.language,
			NodeCategory::Dependency => &mut self.dependency,
		};
		*slot = color.into();
	}
}

impl Default for NodeColors {
	fn default() -> Self {
		Self {
			repo: "#1E90FF".to_string(),
			folder: "#FFD700".to_string(),
			file: "#98FB98".to_string(),
			language: "#FF6347".to_string(),
			dependency: "#8A2BE2".to_string(),
		}
	}
}

/// Stroke used for every edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
	pub color: String,
	pub stroke_width: f64,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			color: "#4A5568".to_string(),
			stroke_width: 1.5,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOptions {
	pub layout: LayoutMode,
	pub node_colors: NodeColors,
	pub link_style: LinkStyle,
}

impl CustomizationOptions {
	pub fn with_layout(layout: LayoutMode) -> Self {
		Self {
			layout,
			..Self::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_category_has_a_color() {
		let mut colors = NodeColors::default();
		for category in NodeCategory::ALL {
			assert!(colors.get(category).starts_with('#'));
		}
		colors.set(NodeCategory::File, "#000000");
		assert_eq!(colors.get(NodeCategory::File), "#000000");
		assert_eq!(colors.get(NodeCategory::Folder), "#FFD700");
	}

	#[test]
	fn layout_mode_round_trips_through_select_values() {
		for mode in LayoutMode::ALL {
			assert_eq!(LayoutMode::parse(mode.as_str()), Some(mode));
		}
		assert_eq!(LayoutMode::parse("grid"), None);
	}
}
