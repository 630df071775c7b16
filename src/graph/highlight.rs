//! Neighborhood computation for focus-highlighting. Stateless: a pure
//! function of (graph, selection), recomputed wholesale on every tap.

use std::collections::HashSet;

use super::model::SystemGraph;

/// A tapped element, by identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
	Node(String),
	Edge(String),
}

/// The set of element ids to keep fully visible for `selection`; everything
/// outside the set is faded by the renderer. `None` yields the empty set,
/// which the renderer reads as "no fading at all".
pub fn neighborhood(graph: &SystemGraph, selection: Option<&Selection>) -> HashSet<String> {
	let mut members = HashSet::new();
	match selection {
		None => {}
		Some(Selection::Edge(id)) => edge_neighborhood(graph, id, &mut members),
		Some(Selection::Node(id)) => {
			if graph.is_compound(id) {
				compound_neighborhood(graph, id, &mut members);
			} else {
				leaf_neighborhood(graph, id, &mut members);
			}
		}
	}
	members
}

/// Selecting a relationship reveals the full compound context of both
/// endpoints: the edge, the endpoints, and all their descendants.
fn edge_neighborhood(graph: &SystemGraph, id: &str, members: &mut HashSet<String>) {
	let Some(edge) = graph.edge(id) else {
		return;
	};
	members.insert(edge.id.clone());
	for end in [&edge.source, &edge.target] {
		members.insert(end.clone());
		members.extend(graph.descendants_of(end));
	}
}

/// Selecting a container keeps its whole subtree, everything wired to that
/// subtree (expanding connected containers in turn), and the edges closing
/// the subgraph.
fn compound_neighborhood(graph: &SystemGraph, id: &str, members: &mut HashSet<String>) {
	if graph.node(id).is_none() {
		return;
	}
	let mut core: HashSet<String> = graph.descendants_of(id).into_iter().collect();
	core.insert(id.to_string());

	let mut connected: HashSet<String> = HashSet::new();
	for edge in &graph.edges {
		let source_in = core.contains(&edge.source);
		let target_in = core.contains(&edge.target);
		if !source_in && !target_in {
			continue;
		}
		members.insert(edge.id.clone());
		for (end, inside) in [(&edge.source, source_in), (&edge.target, target_in)] {
			if inside {
				continue;
			}
			connected.insert(end.clone());
			if graph.is_compound(end) {
				connected.extend(graph.descendants_of(end));
			}
		}
	}

	members.extend(core);
	members.extend(connected);
	close_over_edges(graph, members);
}

/// Selecting a plain node keeps its direct neighbors, its parent and the
/// siblings under that parent, the parent's edges, and the edges closing
/// the subgraph.
fn leaf_neighborhood(graph: &SystemGraph, id: &str, members: &mut HashSet<String>) {
	if graph.node(id).is_none() {
		return;
	}
	members.insert(id.to_string());
	for edge in graph.edges_touching(id) {
		members.insert(edge.id.clone());
		members.insert(edge.source.clone());
		members.insert(edge.target.clone());
	}
	if let Some(parent) = graph.parent_of(id) {
		members.insert(parent.id.clone());
		members.extend(graph.children_of(&parent.id).iter().cloned());
		for edge in graph.edges_touching(&parent.id) {
			members.insert(edge.id.clone());
		}
	}
	close_over_edges(graph, members);
}

/// Add every edge whose endpoints are both already members.
fn close_over_edges(graph: &SystemGraph, members: &mut HashSet<String>) {
	for edge in &graph.edges {
		if members.contains(&edge.source) && members.contains(&edge.target) {
			members.insert(edge.id.clone());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Selection, neighborhood};
	use crate::data::Row;
	use crate::graph::builder::{BuildOptions, build};
	use crate::graph::model::SystemGraph;

	fn node(id: &str) -> Row {
		Row {
			id: id.into(),
			..Row::default()
		}
	}

	fn edge(id: &str, source: &str, target: &str) -> Row {
		Row {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			..Row::default()
		}
	}

	// Two containers wired together, one outside leaf:
	//   A { A.x, A.y { A.y.z } }   B { B.x }   C
	//   A.x -> B.x,  A.y.z -> C,  C -> A
	fn sample() -> SystemGraph {
		let rows = vec![
			node("A"),
			node("A.x"),
			node("A.y"),
			node("A.y.z"),
			node("B"),
			node("B.x"),
			node("C"),
			edge("ax-bx", "A.x", "B.x"),
			edge("ayz-c", "A.y.z", "C"),
			edge("c-a", "C", "A"),
		];
		build(&rows, &BuildOptions::default())
	}

	fn ids(set: &std::collections::HashSet<String>) -> Vec<&str> {
		let mut v: Vec<&str> = set.iter().map(String::as_str).collect();
		v.sort();
		v
	}

	#[test]
	fn no_selection_yields_empty_set() {
		let graph = sample();
		assert!(neighborhood(&graph, None).is_empty());
	}

	#[test]
	fn recomputation_is_idempotent() {
		let graph = sample();
		let selection = Selection::Node("A".into());
		let first = neighborhood(&graph, Some(&selection));
		let second = neighborhood(&graph, Some(&selection));
		assert_eq!(first, second);
	}

	#[test]
	fn unknown_ids_select_nothing() {
		let graph = sample();
		assert!(neighborhood(&graph, Some(&Selection::Node("ghost".into()))).is_empty());
		assert!(neighborhood(&graph, Some(&Selection::Edge("ghost".into()))).is_empty());
	}

	#[test]
	fn leaf_with_one_neighbor_keeps_exactly_that_pair() {
		let rows = vec![node("D"), node("E"), edge("d-e", "D", "E")];
		let graph = build(&rows, &BuildOptions::default());
		let members = neighborhood(&graph, Some(&Selection::Node("D".into())));
		assert_eq!(ids(&members), vec!["D", "E", "d-e"]);
	}

	#[test]
	fn truly_isolated_leaf_selects_only_itself() {
		// Assembled directly so the visibility filter does not prune it.
		let graph = SystemGraph::new(
			vec![crate::graph::model::Node {
				id: "solo".into(),
				parent_id: None,
				label: String::new(),
				display_label: "solo ".into(),
				trend: Default::default(),
				color: "#FFB3BA".into(),
				details: Default::default(),
			}],
			Vec::new(),
		);
		let members = neighborhood(&graph, Some(&Selection::Node("solo".into())));
		assert_eq!(ids(&members), vec!["solo"]);
	}

	#[test]
	fn leaf_selection_pulls_parent_siblings_and_parent_edges() {
		let graph = sample();
		let members = neighborhood(&graph, Some(&Selection::Node("A.x".into())));

		// Direct neighbor plus its edge.
		assert!(members.contains("B.x"));
		assert!(members.contains("ax-bx"));
		// Parent and all siblings under it.
		assert!(members.contains("A"));
		assert!(members.contains("A.y"));
		// Parent's own edges come along.
		assert!(members.contains("c-a"));
		// Unrelated leaves stay out.
		assert!(!members.contains("B"));
	}

	#[test]
	fn compound_selection_covers_all_descendants() {
		let graph = sample();
		let members = neighborhood(&graph, Some(&Selection::Node("A".into())));
		for descendant in graph.descendants_of("A") {
			assert!(members.contains(&descendant), "missing {descendant}");
		}
	}

	#[test]
	fn compound_selection_expands_connected_compounds() {
		let graph = sample();
		let members = neighborhood(&graph, Some(&Selection::Node("A".into())));

		// A.x -> B.x pulls in B.x; B.x's container is not itself an endpoint
		// so B stays out, but C (a plain endpoint) comes in.
		assert!(members.contains("B.x"));
		assert!(members.contains("C"));
		assert!(members.contains("ax-bx"));
		assert!(members.contains("ayz-c"));
		assert!(members.contains("c-a"));
		assert!(!members.contains("B"));
	}

	#[test]
	fn compound_endpoint_expansion_includes_its_subtree() {
		let rows = vec![
			node("A"),
			node("A.x"),
			node("B"),
			node("B.x"),
			node("B.x.y"),
			edge("ax-b", "A.x", "B"),
			edge("bxy-bx", "B.x.y", "B.x"),
		];
		let graph = build(&rows, &BuildOptions::default());
		let members = neighborhood(&graph, Some(&Selection::Node("A".into())));

		// B is an externally-connected compound, so its whole subtree rides
		// along.
		assert!(members.contains("B"));
		assert!(members.contains("B.x"));
		assert!(members.contains("B.x.y"));
	}

	#[test]
	fn edge_selection_reveals_endpoint_subtrees_only() {
		let graph = sample();
		let members = neighborhood(&graph, Some(&Selection::Edge("c-a".into())));

		assert!(members.contains("c-a"));
		assert!(members.contains("C"));
		assert!(members.contains("A"));
		// Full descendant set of the compound endpoint.
		assert!(members.contains("A.x"));
		assert!(members.contains("A.y"));
		assert!(members.contains("A.y.z"));
		// No sibling/parent expansion beyond the endpoints.
		assert!(!members.contains("B"));
		assert!(!members.contains("B.x"));
		assert!(!members.contains("ax-bx"));
	}

	#[test]
	fn closure_adds_edges_between_included_nodes() {
		let graph = sample();
		let members = neighborhood(&graph, Some(&Selection::Node("A".into())));
		// ayz-c runs between two included nodes, so the closure keeps it even
		// though C was only pulled in as an external endpoint.
		assert!(members.contains("ayz-c"));
	}
}
