//! Row-to-graph transformation: classification, parent inference, the
//! visibility filter, and color assignment.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::data::Row;

use super::model::{Details, Edge, Node, SystemGraph, Trend};

/// Soft pastel palette for root-derived node colors. Roots are assigned
/// colors in first-seen order and wrap past the end of the table.
const ROOT_COLORS: &[&str] = &[
	"#FFB3BA", "#BAFFC9", "#BAE1FF", "#FFE4BA", "#E8BAFF", "#B3FFE0", "#FFF4BA", "#FFB3E6",
	"#B3FFD8", "#D4B3FF", "#FFD1B3", "#B3FFB3", "#B3D9FF", "#FFB3D9", "#D1FFB3", "#F0B3FF",
	"#B3FFF4", "#FFE0B3", "#B3C6FF", "#FFCCCC",
];

/// How node colors are derived. Edges are always colored by their own trend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorStrategy {
	/// Every node inherits the color assigned to its root identifier.
	#[default]
	ByRootHierarchy,
	/// Every node is colored by its own trend value.
	ByOwnTrend,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildOptions {
	pub color_strategy: ColorStrategy,
}

/// Transform raw rows into a renderable graph. Pure and deterministic given
/// row order: no I/O, no rendering, no hidden counters.
pub fn build(rows: &[Row], options: &BuildOptions) -> SystemGraph {
	// Partition. Duplicate ids are last-write-wins but keep their original
	// position so downstream ordering stays stable.
	let mut node_rows: Vec<&Row> = Vec::new();
	let mut node_pos: HashMap<&str, usize> = HashMap::new();
	let mut edge_rows: Vec<&Row> = Vec::new();
	let mut edge_pos: HashMap<&str, usize> = HashMap::new();
	for row in rows {
		if row.id.is_empty() {
			continue;
		}
		let (list, pos) = if row.is_edge() {
			(&mut edge_rows, &mut edge_pos)
		} else {
			(&mut node_rows, &mut node_pos)
		};
		match pos.get(row.id.as_str()) {
			Some(&i) => list[i] = row,
			None => {
				pos.insert(&row.id, list.len());
				list.push(row);
			}
		}
	}

	let node_ids: HashSet<&str> = node_rows.iter().map(|r| r.id.as_str()).collect();

	// Parents resolve against the full node set, before any filtering, so
	// ancestry is known when inclusion is decided.
	let parents: HashMap<&str, Option<&str>> = node_rows
		.iter()
		.map(|r| (r.id.as_str(), resolve_parent(&r.id, &node_ids)))
		.collect();

	// A node is visible iff it touches an edge or sits on the parent chain
	// of one that does. Seeding from endpoints and walking upward covers the
	// whole invariant in a forest.
	let mut included: HashSet<&str> = HashSet::new();
	for row in &edge_rows {
		for end in [row.source.as_str(), row.target.as_str()] {
			if !node_ids.contains(end) {
				continue;
			}
			let mut current = Some(end);
			while let Some(id) = current {
				if !included.insert(id) {
					break;
				}
				current = parents.get(id).copied().flatten();
			}
		}
	}

	// Root colors come from unfiltered input order so they do not shift when
	// the visible subset changes.
	let mut root_colors: HashMap<&str, &'static str> = HashMap::new();
	for row in &node_rows {
		let root = root_of(&row.id);
		if !root_colors.contains_key(root) {
			root_colors.insert(root, ROOT_COLORS[root_colors.len() % ROOT_COLORS.len()]);
		}
	}

	let nodes: Vec<Node> = node_rows
		.iter()
		.filter(|r| included.contains(r.id.as_str()))
		.map(|r| {
			let trend = Trend::classify(&r.trend);
			let color = match options.color_strategy {
				ColorStrategy::ByRootHierarchy => root_colors[root_of(&r.id)].to_string(),
				ColorStrategy::ByOwnTrend => trend.color().to_string(),
			};
			Node {
				id: r.id.clone(),
				parent_id: parents[r.id.as_str()].map(String::from),
				label: r.label.clone(),
				display_label: display_label(r),
				trend,
				color,
				details: details_of(r),
			}
		})
		.collect();

	let edges: Vec<Edge> = edge_rows
		.iter()
		.filter_map(|r| {
			if !included.contains(r.source.as_str()) || !included.contains(r.target.as_str()) {
				warn!("dropping dangling edge {} ({} -> {})", r.id, r.source, r.target);
				return None;
			}
			let trend = Trend::classify(&r.trend);
			Some(Edge {
				id: r.id.clone(),
				source: r.source.clone(),
				target: r.target.clone(),
				label: r.label.clone(),
				display_label: display_label(r),
				trend,
				color: trend.color().to_string(),
				details: details_of(r),
			})
		})
		.collect();

	SystemGraph::new(nodes, edges)
}

/// Identifier minus its last dot-segment, if that prefix names a real node.
/// Orphan prefixes never create synthetic parents.
fn resolve_parent<'a>(id: &'a str, node_ids: &HashSet<&str>) -> Option<&'a str> {
	let (prefix, _) = id.rsplit_once('.')?;
	node_ids.contains(prefix).then_some(prefix)
}

fn root_of(id: &str) -> &str {
	id.split('.').next().unwrap_or(id)
}

fn display_label(row: &Row) -> String {
	format!("{} {}", row.id, row.label)
}

fn details_of(row: &Row) -> Details {
	Details {
		description: row.description.clone(),
		reliability: row.reliability.clone(),
		references: row.references.clone(),
		reviewers: row.reviewers.clone(),
		organisation: row.organisation.clone(),
		mandate: row.mandate.clone(),
		comments: row.comments.clone(),
	}
}
