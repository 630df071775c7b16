use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::{Selection, SystemGraph, neighborhood};

pub const NODE_RADIUS: f64 = 6.0;
pub const COMPOUND_RADIUS: f64 = 14.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const EDGE_HIT_DISTANCE: f64 = 6.0;
/// Mouse travel below this is a tap rather than a drag (screen px).
pub const TAP_SLOP: f64 = 4.0;

/// Where the selected element's record is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationMode {
	/// Tap fills the side panel.
	#[default]
	Sidebar,
	/// Hover draws a card next to the element on the canvas.
	Tooltip,
}

/// Per-node payload carried inside the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	pub compound: bool,
}

/// A drawable relationship: simulation endpoints plus style payload.
#[derive(Clone, Debug)]
pub struct EdgeVisual {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
}

/// Parent tether. Drawn as a dashed guide, never as a relationship arrow.
#[derive(Clone, Copy, Debug)]
pub struct HierarchyLink {
	pub parent: DefaultNodeIdx,
	pub child: DefaultNodeIdx,
}

/// Hit-test result: a node in the simulation or an index into the visual
/// edge list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementAt {
	Node(DefaultNodeIdx),
	Edge(usize),
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Tap-driven selection. Membership is recomputed wholesale on every change;
/// the previous set sticks around only to ease the fade-out.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	pub selected: Option<Selection>,
	pub members: HashSet<String>,
	pub prev_members: HashSet<String>,
	pub highlight_t: f64,
}

pub struct NetworkState {
	pub graph: SystemGraph,
	pub sim: ForceGraph<NodeInfo, ()>,
	pub idx_of: HashMap<String, DefaultNodeIdx>,
	pub id_of: HashMap<DefaultNodeIdx, String>,
	pub edge_visuals: Vec<EdgeVisual>,
	pub hierarchy_links: Vec<HierarchyLink>,
	pub mode: PresentationMode,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub selection: SelectionState,
	pub hovered: Option<ElementAt>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
}

impl NetworkState {
	pub fn new(graph: SystemGraph, mode: PresentationMode, width: f64, height: f64) -> Self {
		let mut sim = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut idx_of = HashMap::new();
		let mut id_of = HashMap::new();

		for (i, node) in graph.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / graph.nodes.len().max(1) as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);
			let compound = graph.is_compound(&node.id);
			let idx = sim.add_node(NodeData {
				x,
				y,
				mass: if compound { 20.0 } else { 10.0 },
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.display_label.clone(),
					color: node.color.clone(),
					compound,
				},
			});
			idx_of.insert(node.id.clone(), idx);
			id_of.insert(idx, node.id.clone());
		}

		let mut edge_visuals = Vec::new();
		for edge in &graph.edges {
			let (Some(&src), Some(&tgt)) = (idx_of.get(&edge.source), idx_of.get(&edge.target))
			else {
				continue;
			};
			// Self-loops get drawn but contribute no spring.
			if src != tgt {
				sim.add_edge(src, tgt, EdgeData::default());
			}
			edge_visuals.push(EdgeVisual {
				id: edge.id.clone(),
				source: src,
				target: tgt,
				color: edge.color.clone(),
			});
		}

		// Tether children to their parents so clusters hold together under
		// the charge force.
		let mut hierarchy_links = Vec::new();
		for node in &graph.nodes {
			let Some(parent) = &node.parent_id else {
				continue;
			};
			if let (Some(&p), Some(&c)) = (idx_of.get(parent), idx_of.get(&node.id)) {
				sim.add_edge(p, c, EdgeData::default());
				hierarchy_links.push(HierarchyLink { parent: p, child: c });
			}
		}

		Self {
			graph,
			sim,
			idx_of,
			id_of,
			edge_visuals,
			hierarchy_links,
			mode,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selection: SelectionState::default(),
			hovered: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Current simulation positions, world-space.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.sim.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.sim.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// Hit radii are world-space, scaling with zoom like the nodes
			let radius = if node.data.user_data.compound {
				COMPOUND_RADIUS + 4.0
			} else {
				HIT_RADIUS
			};
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let mut best: Option<(usize, f64)> = None;
		for (i, edge) in self.edge_visuals.iter().enumerate() {
			let (Some(&(x1, y1)), Some(&(x2, y2))) =
				(positions.get(&edge.source), positions.get(&edge.target))
			else {
				continue;
			};
			let dist = if edge.source == edge.target {
				let (cx, cy) = (x1, y1 - NODE_RADIUS * 2.2);
				let (dx, dy) = (gx - cx, gy - cy);
				(dx * dx + dy * dy).sqrt()
			} else {
				segment_distance(gx, gy, x1, y1, x2, y2)
			};
			if dist < EDGE_HIT_DISTANCE && best.map_or(true, |(_, d)| dist < d) {
				best = Some((i, dist));
			}
		}
		best.map(|(i, _)| i)
	}

	/// Nodes sit above edges, so they win ties.
	pub fn element_at(&self, sx: f64, sy: f64) -> Option<ElementAt> {
		self.node_at_position(sx, sy)
			.map(ElementAt::Node)
			.or_else(|| self.edge_at_position(sx, sy).map(ElementAt::Edge))
	}

	pub fn selection_for(&self, element: ElementAt) -> Option<Selection> {
		match element {
			ElementAt::Node(idx) => self.id_of.get(&idx).cloned().map(Selection::Node),
			ElementAt::Edge(i) => self
				.edge_visuals
				.get(i)
				.map(|e| Selection::Edge(e.id.clone())),
		}
	}

	/// Replace the selection and recompute its neighborhood wholesale.
	pub fn set_selection(&mut self, selection: Option<Selection>) {
		if self.selection.selected == selection {
			return;
		}
		if selection.is_none() && self.selection.selected.is_some() {
			// Keep the old set around for the fade-out
			self.selection.prev_members = std::mem::take(&mut self.selection.members);
		} else {
			self.selection.prev_members.clear();
		}
		self.selection.selected = selection;
		self.selection.members = neighborhood(&self.graph, self.selection.selected.as_ref());
	}

	pub fn is_member(&self, id: &str) -> bool {
		self.selection.members.contains(id) || self.selection.prev_members.contains(id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.selection.selected.is_some() || !self.selection.prev_members.is_empty()
	}

	pub fn tick(&mut self, dt: f32) {
		self.sim.update(dt);
		self.flow_time += dt as f64;

		let (target, speed) = if self.selection.selected.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.selection.highlight_t += (target - self.selection.highlight_t) * speed * dt as f64;
		if target == 0.0 && self.selection.highlight_t < 0.01 {
			self.selection.highlight_t = 0.0;
			self.selection.prev_members.clear();
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		let (ex, ey) = (px - x1, py - y1);
		return (ex * ex + ey * ey).sqrt();
	}
	let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	let (ex, ey) = (px - cx, py - cy);
	(ex * ex + ey * ey).sqrt()
}

#[cfg(test)]
mod tests {
	use super::{NetworkState, PresentationMode, segment_distance};
	use crate::data::Row;
	use crate::graph::{BuildOptions, Selection, build};

	fn state() -> NetworkState {
		let rows = vec![
			Row {
				id: "A".into(),
				..Row::default()
			},
			Row {
				id: "B".into(),
				..Row::default()
			},
			Row {
				id: "A-B".into(),
				source: "A".into(),
				target: "B".into(),
				..Row::default()
			},
		];
		let graph = build(&rows, &BuildOptions::default());
		NetworkState::new(graph, PresentationMode::Sidebar, 800.0, 600.0)
	}

	#[test]
	fn selecting_fills_members_and_clearing_keeps_them_for_fade() {
		let mut s = state();
		s.set_selection(Some(Selection::Node("A".into())));
		assert!(s.is_member("A"));
		assert!(s.is_member("A-B"));
		assert!(s.has_active_highlight());

		s.set_selection(None);
		assert!(s.selection.members.is_empty());
		// Old members linger until the fade finishes.
		assert!(s.is_member("A"));

		for _ in 0..600 {
			s.tick(0.016);
		}
		assert!(!s.has_active_highlight());
		assert!(!s.is_member("A"));
	}

	#[test]
	fn reselecting_is_a_no_op() {
		let mut s = state();
		s.set_selection(Some(Selection::Node("A".into())));
		let before = s.selection.members.clone();
		s.set_selection(Some(Selection::Node("A".into())));
		assert_eq!(before, s.selection.members);
	}

	#[test]
	fn segment_distance_handles_interior_and_endpoints() {
		assert!((segment_distance(5.0, 5.0, 0.0, 0.0, 10.0, 0.0) - 5.0).abs() < 1e-9);
		assert!((segment_distance(-3.0, 4.0, 0.0, 0.0, 10.0, 0.0) - 5.0).abs() < 1e-9);
		assert!((segment_distance(2.0, 0.0, 1.0, 0.0, 1.0, 0.0) - 1.0).abs() < 1e-9);
	}
}
