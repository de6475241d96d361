//! Visual theming for course cards and requisite edges.

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

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Card (vertex) visual style.
#[derive(Clone, Debug)]
pub struct CardStyle {
	pub fill: Color,
	pub border: Color,
	/// Border drawn while the card is hovered or dragged
	pub raised_border: Color,
	pub title: Color,
	pub subtitle: Color,
	/// Color of the open/delete action glyphs
	pub action: Color,
	/// Corner radius in graph units
	pub corner_radius: f64,
}

/// Edge visual style. Each OR-set carries its own color; the theme only
/// shades it so it reads against the background.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Positive values darken, negative values lighten.
	pub shade: f64,
}

impl EdgeStyle {
	pub fn apply(&self, color: Color) -> Color {
		if self.shade >= 0.0 {
			color.darken(self.shade)
		} else {
			color.lighten(-self.shade)
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub card: CardStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Material-style light theme (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(250, 250, 250),
			card: CardStyle {
				fill: Color::rgb(255, 255, 255),
				border: Color::rgba(0, 0, 0, 0.12),
				raised_border: Color::rgba(0, 0, 0, 0.38),
				title: Color::rgba(0, 0, 0, 0.87),
				subtitle: Color::rgba(0, 0, 0, 0.6),
				action: Color::rgba(0, 0, 0, 0.54),
				corner_radius: 4.0,
			},
			edge: EdgeStyle { shade: 0.45 },
		}
	}

	/// Dark theme toggled from the app bar
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: Color::rgb(18, 18, 18),
			card: CardStyle {
				fill: Color::rgb(40, 40, 40),
				border: Color::rgba(255, 255, 255, 0.12),
				raised_border: Color::rgba(255, 255, 255, 0.5),
				title: Color::rgba(255, 255, 255, 0.87),
				subtitle: Color::rgba(255, 255, 255, 0.6),
				action: Color::rgba(255, 255, 255, 0.7),
				corner_radius: 4.0,
			},
			edge: EdgeStyle { shade: 0.0 },
		}
	}

	pub fn toggled(&self) -> Self {
		if self.name == "dark" {
			Self::light()
		} else {
			Self::dark()
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(0, 0, 0, 0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}

	#[test]
	fn edge_shading_direction() {
		let base = Color::rgb(200, 200, 200);
		assert_eq!(EdgeStyle { shade: 0.5 }.apply(base), Color::rgb(100, 100, 100));
		assert_eq!(EdgeStyle { shade: 0.0 }.apply(base), base);
		assert!(EdgeStyle { shade: -0.5 }.apply(base).r > base.r);
	}

	#[test]
	fn toggle_alternates() {
		assert_eq!(Theme::default().toggled().name, "dark");
		assert_eq!(Theme::dark().toggled().name, "light");
	}
}
