//! Visual theming for the repository graph canvas.
//!
//! Node fills and link strokes come from the user's customization options;
//! the theme only covers what surrounds them: background, node shading,
//! the hover ring and labels.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `#RRGGBB`, `#RGB` or `rgb()`/`rgba()` notation.
	/// Anything else becomes mid gray.
	pub fn parse(css: &str) -> Self {
		const FALLBACK: Color = Color::rgb(128, 128, 128);
		let css = css.trim();
		if let Some(hex) = css.strip_prefix('#') {
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			let parsed = match hex.len() {
				_ if !hex.is_ascii() => None,
				6 => channel(&hex[0..2]).zip(channel(&hex[2..4])).zip(channel(&hex[4..6])),
				3 => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					short(0).zip(short(1)).zip(short(2))
				}
				_ => None,
			};
			return parsed.map_or(FALLBACK, |((r, g), b)| Color::rgb(r, g, b));
		}
		if css.starts_with("rgb") {
			let nums: Vec<&str> = css
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let channel = |i: usize| nums.get(i).and_then(|s| s.parse::<u8>().ok()).unwrap_or(128);
			let a = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
			return Color::rgba(channel(0), channel(1), channel(2), a);
		}
		FALLBACK
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Node shading on top of the category fill.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Shade circles with a highlight-to-shadow radial gradient
	pub use_gradient: bool,
	pub border_color: Color,
	/// Border width in screen pixels
	pub border_width: f64,
	/// Ring drawn around the hovered node
	pub hover_ring: Color,
}

#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	pub font: String,
	/// Offset from the node's right edge
	pub offset_x: f64,
	pub offset_y: f64,
}

/// Complete visual theme for the graph.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self::midnight()
	}
}

/// Named theme presets selectable from the page configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
	#[default]
	Midnight,
	Flat,
}

impl Theme {
	pub fn named(name: ThemeName) -> Self {
		match name {
			ThemeName::Midnight => Self::midnight(),
			ThemeName::Flat => Self::flat(),
		}
	}

	/// Dark gradient backdrop with shaded nodes.
	pub fn midnight() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(17, 24, 39),
				color_secondary: Color::rgb(31, 41, 55),
				use_gradient: true,
			},
			node: NodeStyle {
				use_gradient: true,
				border_color: Color::rgba(255, 255, 255, 0.25),
				border_width: 1.0,
				hover_ring: Color::rgba(255, 255, 255, 0.8),
			},
			label: LabelStyle {
				color: Color::rgb(255, 255, 255),
				font: "10px sans-serif".to_string(),
				offset_x: 5.0,
				offset_y: 5.0,
			},
		}
	}

	/// Solid background, flat fills.
	pub fn flat() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(31, 41, 55),
				color_secondary: Color::rgb(31, 41, 55),
				use_gradient: false,
			},
			node: NodeStyle {
				use_gradient: false,
				border_color: Color::rgba(0, 0, 0, 0.0),
				border_width: 0.0,
				hover_ring: Color::rgb(255, 255, 255),
			},
			..Self::midnight()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_forms() {
		assert_eq!(Color::parse("#1E90FF"), Color::rgb(0x1e, 0x90, 0xff));
		assert_eq!(Color::parse("#fff"), Color::rgb(255, 255, 255));
		assert_eq!(Color::parse("#12345"), Color::rgb(128, 128, 128));
	}

	#[test]
	fn parses_functional_notation() {
		assert_eq!(Color::parse("rgba(10, 20, 30, 0.5)"), Color::rgba(10, 20, 30, 0.5));
		assert_eq!(Color::parse("rgb(1,2,3)"), Color::rgb(1, 2, 3));
		assert_eq!(Color::parse("papayawhip"), Color::rgb(128, 128, 128));
	}

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
		assert_eq!(Color::rgb(100, 100, 100).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(100, 100, 100).darken(1.0), Color::rgb(0, 0, 0));
	}
}
