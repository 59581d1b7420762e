//! Repository description as produced by the describer service.
//!
//! The shapes mirror the describer's JSON (`type` is used for both dependency
//! and tree entry kinds). A description is immutable once received; the graph
//! builder only ever reads it.

use serde::{Deserialize, Serialize};

use crate::describer::DescribeError;

/// Structured summary of a repository.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepoDescription {
	pub name: String,
	pub description: String,
	/// Language usage in the order reported by the describer.
	pub languages: Vec<LanguageUsage>,
	pub dependencies: Vec<Dependency>,
	/// Top-level files and folders.
	pub tree: Vec<TreeEntry>,
}

/// Share of the codebase written in one language.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanguageUsage {
	pub language: String,
	pub percentage: f64,
}

/// A declared package dependency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: DependencyKind,
}

/// Where a dependency is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
	Frontend,
	Backend,
	Dev,
	General,
}

impl DependencyKind {
	pub fn as_str(self) -> &'static str {
		match self {
			DependencyKind::Frontend => "frontend",
			DependencyKind::Backend => "backend",
			DependencyKind::Dev => "dev",
			DependencyKind::General => "general",
		}
	}
}

/// File or folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
	Folder,
	File,
}

/// One entry of the repository's file tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: EntryKind,
	/// Full path from the repository root; unique within a tree.
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<TreeEntry>>,
}

impl TreeEntry {
	/// Children declared by this entry, empty when none.
	pub fn children(&self) -> &[TreeEntry] {
		self.children.as_deref().unwrap_or_default()
	}

	/// Number of nesting levels in this subtree (a leaf is 1).
	pub fn depth(&self) -> usize {
		1 + self.children().iter().map(TreeEntry::depth).max().unwrap_or(0)
	}
}

impl RepoDescription {
	/// Total number of tree entries at any depth.
	pub fn entry_count(&self) -> usize {
		fn count(entries: &[TreeEntry]) -> usize {
			entries.iter().map(|e| 1 + count(e.children())).sum()
		}
		count(&self.tree)
	}

	/// Checks the constraints the describer promises but JSON alone can't express.
	pub fn validate(&self, max_depth: usize) -> Result<(), DescribeError> {
		if self.name.trim().is_empty() {
			return Err(DescribeError::Schema("repository name is empty".into()));
		}
		for lang in &self.languages {
			if !lang.percentage.is_finite() || lang.percentage < 0.0 {
				return Err(DescribeError::Schema(format!(
					"language {:?} has invalid percentage {}",
					lang.language, lang.percentage
				)));
			}
		}
		if let Some(deepest) = self.tree.iter().map(TreeEntry::depth).max() {
			if deepest > max_depth {
				return Err(DescribeError::Schema(format!(
					"tree is nested {deepest} levels deep, at most {max_depth} allowed"
				)));
			}
		}
		let mut stack: Vec<&TreeEntry> = self.tree.iter().collect();
		while let Some(entry) = stack.pop() {
			if entry.kind == EntryKind::File && !entry.children().is_empty() {
				return Err(DescribeError::Schema(format!(
					"file {:?} declares children",
					entry.path
				)));
			}
			stack.extend(entry.children());
		}
		Ok(())
	}
}

/// Parses and validates a describer response body.
pub fn parse_description(json: &str, max_depth: usize) -> Result<RepoDescription, DescribeError> {
	let desc: RepoDescription = serde_json::from_str(json.trim())?;
	desc.validate(max_depth)?;
	Ok(desc)
}

#[cfg(test)]
mod tests {
	use super::*;

	const DEMO: &str = r#"{
		"name": "demo",
		"description": "a demo",
		"languages": [{"language": "TS", "percentage": 100}],
		"dependencies": [{"name": "react", "type": "frontend"}],
		"tree": [{"id": "src", "name": "src", "type": "folder", "path": "src",
			"children": [{"id": "src/index.ts", "name": "index.ts", "type": "file", "path": "src/index.ts"}]}]
	}"#;

	#[test]
	fn parses_describer_shape() {
		let desc = parse_description(DEMO, 3).unwrap();
		assert_eq!(desc.name, "demo");
		assert_eq!(desc.dependencies[0].kind, DependencyKind::Frontend);
		assert_eq!(desc.tree[0].kind, EntryKind::Folder);
		assert_eq!(desc.tree[0].children()[0].path, "src/index.ts");
		assert_eq!(desc.entry_count(), 2);
	}

	#[test]
	fn rejects_unknown_dependency_kind() {
		let bad = DEMO.replace("\"frontend\"", "\"runtime\"");
		assert!(matches!(parse_description(&bad, 3), Err(DescribeError::Malformed(_))));
	}

	#[test]
	fn rejects_missing_tree() {
		let bad = r#"{"name": "x", "description": "", "languages": [], "dependencies": []}"#;
		assert!(matches!(parse_description(bad, 3), Err(DescribeError::Malformed(_))));
	}

	#[test]
	fn rejects_empty_name() {
		let bad = DEMO.replace("\"demo\"", "\"  \"");
		assert!(matches!(parse_description(&bad, 3), Err(DescribeError::Schema(_))));
	}

	#[test]
	fn enforces_depth_bound() {
		let desc = parse_description(DEMO, 3).unwrap();
		assert_eq!(desc.tree[0].depth(), 2);
		assert!(desc.validate(2).is_ok());
		assert!(matches!(desc.validate(1), Err(DescribeError::Schema(_))));
	}

	#[test]
	fn rejects_file_with_children() {
		let mut desc = parse_description(DEMO, 3).unwrap();
		desc.tree[0].kind = EntryKind::File;
		assert!(desc.validate(3).is_err());
	}
}
