use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::components::sidebar::InfoCard;

use super::state::{
	COMPOUND_RADIUS, ElementAt, NODE_RADIUS, NetworkState, PresentationMode,
};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// "#rrggbb" to an rgba() string; falls back to mid-gray.
fn rgba(hex: &str, alpha: f64) -> String {
	let parse = |range| {
		hex.get(range)
			.and_then(|s| u8::from_str_radix(s, 16).ok())
			.unwrap_or(153)
	};
	let (r, g, b) = (parse(1..3), parse(3..5), parse(5..7));
	format!("rgba({r}, {g}, {b}, {alpha})")
}

struct EndPoint {
	x: f64,
	y: f64,
	radius: f64,
	member: bool,
}

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fafaf8");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut ends: HashMap<DefaultNodeIdx, EndPoint> = HashMap::new();
	state.sim.visit_nodes(|node| {
		let info = &node.data.user_data;
		ends.insert(
			node.index(),
			EndPoint {
				x: node.x() as f64,
				y: node.y() as f64,
				radius: if info.compound {
					COMPOUND_RADIUS
				} else {
					NODE_RADIUS
				},
				member: state.is_member(&info.id),
			},
		);
	});

	draw_hierarchy_links(state, ctx, &ends);
	draw_edges(state, ctx, &ends);
	draw_nodes(state, ctx);
	ctx.restore();

	if state.mode == PresentationMode::Tooltip {
		draw_hover_card(state, ctx, &ends);
	}
}

/// Parent tethers: static faint dashes, no arrowheads.
fn draw_hierarchy_links(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	ends: &HashMap<DefaultNodeIdx, EndPoint>,
) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.selection.highlight_t);

	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(3.0 / k),
		&JsValue::from_f64(3.0 / k),
	));
	ctx.set_line_width(1.0 / k);
	for link in &state.hierarchy_links {
		let (Some(parent), Some(child)) = (ends.get(&link.parent), ends.get(&link.child)) else {
			continue;
		};
		let alpha = if parent.member && child.member {
			0.25 + 0.1 * t
		} else {
			0.25 - 0.18 * t
		};
		ctx.set_stroke_style_str(&format!("rgba(120, 120, 120, {alpha})"));
		ctx.begin_path();
		ctx.move_to(parent.x, parent.y);
		ctx.line_to(child.x, child.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	ends: &HashMap<DefaultNodeIdx, EndPoint>,
) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.selection.highlight_t);

	for edge in &state.edge_visuals {
		let (Some(source), Some(target)) = (ends.get(&edge.source), ends.get(&edge.target))
		else {
			continue;
		};

		let is_highlighted = state.is_member(&edge.id);
		// t=0: everything at base; t=1: members brighten, the rest dims
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.6 * t, line_width * (1.0 - 0.3 * t))
		};

		if edge.source == edge.target {
			// Self-loop: a small circle hung above the node
			ctx.set_stroke_style_str(&rgba(&edge.color, edge_alpha));
			ctx.set_line_width(width);
			ctx.begin_path();
			let _ = ctx.arc(
				source.x,
				source.y - NODE_RADIUS * 2.2,
				NODE_RADIUS * 1.2,
				0.0,
				2.0 * PI,
			);
			ctx.stroke();
			continue;
		}

		let (x1, y1, x2, y2) = (source.x, source.y, target.x, target.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		ctx.set_stroke_style_str(&rgba(&edge.color, edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * source.radius, y1 + uy * source.radius);
		ctx.line_to(
			x2 - ux * (target.radius + arrow_size),
			y2 - uy * (target.radius + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&rgba(&edge.color, arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * target.radius, y2 - uy * target.radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.selection.highlight_t),
		state.transform.k,
	);
	let selected_id = match &state.selection.selected {
		Some(crate::graph::Selection::Node(id)) => Some(id.as_str()),
		_ => None,
	};

	// Faded pass first, members on top
	state.sim.visit_nodes(|node| {
		let info = &node.data.user_data;
		if has_highlight && state.is_member(&info.id) {
			return;
		}
		let alpha = 1.0 - 0.8 * t;
		draw_node_shape(
			ctx,
			node.x() as f64,
			node.y() as f64,
			&info.label,
			&info.color,
			info.compound,
			alpha,
			false,
			k,
		);
	});

	if !has_highlight {
		return;
	}

	state.sim.visit_nodes(|node| {
		let info = &node.data.user_data;
		if !state.is_member(&info.id) {
			return;
		}
		draw_node_shape(
			ctx,
			node.x() as f64,
			node.y() as f64,
			&info.label,
			&info.color,
			info.compound,
			1.0,
			true,
			k,
		);

		if selected_id == Some(info.id.as_str()) && t > 0.01 {
			let ring = if info.compound {
				COMPOUND_RADIUS * 1.4
			} else {
				NODE_RADIUS + 2.0 / k
			};
			ctx.begin_path();
			let _ = ctx.arc(node.x() as f64, node.y() as f64, ring, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(30, 30, 30, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	});
}

/// Leaves are filled circles with a trailing label; compounds are labelled
/// translucent boxes, kept visible even when highlighted members crowd them.
#[allow(clippy::too_many_arguments)]
fn draw_node_shape(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	label: &str,
	color: &str,
	compound: bool,
	alpha: f64,
	emphasized: bool,
	k: f64,
) {
	if compound {
		let font_size = 12.0 / k.max(0.5);
		ctx.set_font(&format!("bold {font_size}px sans-serif"));
		let text_width = ctx
			.measure_text(label)
			.map(|m| m.width())
			.unwrap_or(COMPOUND_RADIUS * 4.0);
		let pad = 10.0 / k.max(0.5);
		let (w, h) = (text_width + pad * 2.0, COMPOUND_RADIUS * 2.0);

		// The distinct parent treatment: fill stays visible when highlighted
		let fill_alpha = if emphasized { 0.3 * alpha } else { 0.12 * alpha };
		ctx.set_fill_style_str(&rgba(color, fill_alpha));
		ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);
		ctx.set_stroke_style_str(&format!("rgba(90, 90, 90, {})", 0.6 * alpha));
		ctx.set_line_width(if emphasized { 2.0 / k } else { 1.0 / k });
		ctx.stroke_rect(x - w / 2.0, y - h / 2.0, w, h);

		ctx.set_fill_style_str(&format!("rgba(20, 20, 20, {alpha})"));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(label, x, y - h / 2.0 - 4.0 / k.max(0.5));
		ctx.set_text_align("left");
		return;
	}

	let radius = if emphasized {
		NODE_RADIUS * 1.2
	} else {
		NODE_RADIUS
	};
	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_stroke_style_str("rgba(60, 60, 60, 0.5)");
	ctx.set_line_width(0.5 / k);
	ctx.stroke();
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str(&format!("rgba(40, 40, 40, {})", alpha * 0.9));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
}

/// Hover card for tooltip mode, drawn in screen space so it keeps its size.
fn draw_hover_card(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	ends: &HashMap<DefaultNodeIdx, EndPoint>,
) {
	let Some(element) = state.hovered else {
		return;
	};
	let Some(selection) = state.selection_for(element) else {
		return;
	};
	let Some(card) = InfoCard::for_selection(&state.graph, &selection) else {
		return;
	};

	let (wx, wy) = match element {
		ElementAt::Node(idx) => {
			let Some(end) = ends.get(&idx) else { return };
			(end.x, end.y)
		}
		ElementAt::Edge(i) => {
			let Some(edge) = state.edge_visuals.get(i) else {
				return;
			};
			let (Some(a), Some(b)) = (ends.get(&edge.source), ends.get(&edge.target)) else {
				return;
			};
			((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
		}
	};
	let sx = wx * state.transform.k + state.transform.x + 14.0;
	let sy = wy * state.transform.k + state.transform.y + 14.0;

	let mut lines: Vec<String> = vec![card.title.clone()];
	lines.extend(
		card.fields
			.iter()
			.take(4)
			.map(|(name, value)| format!("{name}: {}", truncate(value, 48))),
	);

	let (line_height, pad, width) = (15.0, 8.0, 240.0);
	let height = lines.len() as f64 * line_height + pad * 2.0;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
	ctx.fill_rect(sx, sy, width, height);
	ctx.set_stroke_style_str("rgba(60, 60, 60, 0.4)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(sx, sy, width, height);

	for (i, line) in lines.iter().enumerate() {
		ctx.set_font(if i == 0 {
			"bold 12px sans-serif"
		} else {
			"11px sans-serif"
		});
		ctx.set_fill_style_str("#222");
		let _ = ctx.fill_text(line, sx + pad, sy + pad + (i as f64 + 0.8) * line_height);
	}
}

fn truncate(value: &str, max: usize) -> String {
	if value.chars().count() <= max {
		value.to_string()
	} else {
		let cut: String = value.chars().take(max).collect();
		format!("{cut}\u{2026}")
	}
}
