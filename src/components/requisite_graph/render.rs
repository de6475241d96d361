//! Render surfaces.
//!
//! The graph never touches the browser directly: each draw pass clears a
//! [`Surface`], hands it every routed edge, then every card on top. The
//! canvas implementation draws in CSS pixels after applying the device pixel
//! ratio once per resize.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::edge::{EdgePath, Rect, Segment};
use super::scale::ScaledValues;
use super::theme::Theme;
use super::types::CourseId;
use super::vertex::action_rects;
use super::viewport::Viewport;

/// A card as it should appear on screen this frame.
pub struct CardView<'a> {
	pub id: &'a CourseId,
	pub name: &'a str,
	/// Screen-space rectangle (viewport transform applied).
	pub rect: Rect,
	/// Hovered or being dragged.
	pub raised: bool,
	pub scale: &'a ScaledValues,
}

/// Drawing backend for a [`RequisiteGraph`](super::state::RequisiteGraph).
pub trait Surface {
	/// The viewport changed size or device pixel ratio.
	fn resize(&mut self, viewport: &Viewport);
	/// Start a new frame.
	fn clear(&mut self, viewport: &Viewport);
	fn draw_edge(&mut self, path: &EdgePath);
	fn draw_card(&mut self, card: &CardView<'_>);
}

/// Draws onto an HTML canvas. Does nothing until [`attach`](Self::attach)ed.
#[derive(Default)]
pub struct CanvasSurface {
	target: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
	pub theme: Theme,
}

impl CanvasSurface {
	pub fn attach(&mut self, canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) {
		self.target = Some((canvas, ctx));
	}
}

impl Surface for CanvasSurface {
	fn resize(&mut self, viewport: &Viewport) {
		let Some((canvas, ctx)) = &self.target else {
			return;
		};
		let (w, h) = viewport.pixel_size();
		canvas.set_width(w);
		canvas.set_height(h);
		let dpr = viewport.device_pixel_ratio;
		let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	}

	fn clear(&mut self, viewport: &Viewport) {
		let Some((_, ctx)) = &self.target else {
			return;
		};
		ctx.set_fill_style_str(&self.theme.background.to_css());
		ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
	}

	fn draw_edge(&mut self, path: &EdgePath) {
		let Some((_, ctx)) = &self.target else {
			return;
		};
		ctx.set_stroke_style_str(&self.theme.edge.apply(path.color).to_css());
		ctx.set_line_width(path.line_width);
		ctx.begin_path();
		match path.segment {
			Segment::Line { from, to } => {
				ctx.move_to(from.x, from.y);
				ctx.line_to(to.x, to.y);
			}
			Segment::Bezier { from, c1, c2, to } => {
				ctx.move_to(from.x, from.y);
				ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
			}
		}
		for head in &path.arrowheads {
			ctx.move_to(head.tip.x, head.tip.y);
			ctx.line_to(head.left.x, head.left.y);
			ctx.move_to(head.tip.x, head.tip.y);
			ctx.line_to(head.right.x, head.right.y);
		}
		ctx.stroke();
	}

	fn draw_card(&mut self, card: &CardView<'_>) {
		let Some((_, ctx)) = &self.target else {
			return;
		};
		let style = &self.theme.card;
		let k = card.scale.k;
		let r = card.rect;

		rounded_rect(ctx, &r, style.corner_radius * k);
		ctx.set_fill_style_str(&style.fill.to_css());
		ctx.fill();
		let border = if card.raised {
			style.raised_border
		} else {
			style.border
		};
		ctx.set_stroke_style_str(&border.to_css());
		ctx.set_line_width(if card.raised { 2.0 * k } else { k });
		ctx.stroke();

		let pad = 8.0 * k;
		ctx.set_text_baseline("top");
		if let Some(font) = &card.scale.title_font {
			ctx.set_font(font);
			ctx.set_fill_style_str(&style.title.to_css());
			let _ = ctx.fill_text(card.id.as_str(), r.x + pad, r.y + pad);
		}
		if let Some(font) = &card.scale.subtitle_font {
			ctx.set_font(font);
			ctx.set_fill_style_str(&style.subtitle.to_css());
			let _ = ctx.fill_text_with_max_width(
				card.name,
				r.x + pad,
				r.y + pad + 26.0 * k,
				r.width - 2.0 * pad,
			);

			let (open, delete) = action_rects(&r, k);
			ctx.set_fill_style_str(&style.action.to_css());
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text("\u{2197}", open.x + open.width * 0.25, open.center_y());
			let _ = ctx.fill_text("\u{2715}", delete.x + delete.width * 0.25, delete.center_y());
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let radius = radius.min(r.width / 2.0).min(r.height / 2.0);
	ctx.begin_path();
	ctx.move_to(r.x + radius, r.y);
	let _ = ctx.arc_to(r.right(), r.y, r.right(), r.bottom(), radius);
	let _ = ctx.arc_to(r.right(), r.bottom(), r.x, r.bottom(), radius);
	let _ = ctx.arc_to(r.x, r.bottom(), r.x, r.y, radius);
	let _ = ctx.arc_to(r.x, r.y, r.right(), r.y, radius);
	ctx.close_path();
}

/// Surface that remembers the last frame, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSurface {
	pub frames: usize,
	pub resizes: usize,
	pub edges: Vec<EdgePath>,
	pub cards: Vec<(CourseId, Rect, bool)>,
}

#[cfg(test)]
impl Surface for RecordingSurface {
	fn resize(&mut self, _viewport: &Viewport) {
		self.resizes += 1;
	}

	fn clear(&mut self, _viewport: &Viewport) {
		self.frames += 1;
		self.edges.clear();
		self.cards.clear();
	}

	fn draw_edge(&mut self, path: &EdgePath) {
		self.edges.push(path.clone());
	}

	fn draw_card(&mut self, card: &CardView<'_>) {
		self.cards.push((card.id.clone(), card.rect, card.raised));
	}
}
