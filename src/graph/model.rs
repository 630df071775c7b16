use std::collections::HashMap;

/// Three-valued classification of a row's `trend` column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Trend {
	Positive,
	Negative,
	#[default]
	Neutral,
}

impl Trend {
	/// Case-insensitive prefix match on the raw CSV value: `pos*` and `neg*`
	/// are recognized, anything else is neutral.
	pub fn classify(raw: &str) -> Self {
		let lower = raw.to_ascii_lowercase();
		if lower.starts_with("pos") {
			Trend::Positive
		} else if lower.starts_with("neg") {
			Trend::Negative
		} else {
			Trend::Neutral
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Trend::Positive => "positive",
			Trend::Negative => "negative",
			Trend::Neutral => "neutral",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Trend::Positive => "#4ade80",
			Trend::Negative => "#f87171",
			Trend::Neutral => "#d1d5db",
		}
	}
}

/// Freeform columns carried through untouched for the info panels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Details {
	pub description: String,
	pub reliability: String,
	pub references: String,
	pub reviewers: String,
	pub organisation: String,
	pub mandate: String,
	pub comments: String,
}

/// A system component. `parent_id` is derived from the dotted identifier,
/// never authored, and only set when the parent row actually exists.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub parent_id: Option<String>,
	pub label: String,
	pub display_label: String,
	pub trend: Trend,
	pub color: String,
	pub details: Details,
}

/// A relationship between two components.
#[derive(Clone, Debug)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: String,
	pub display_label: String,
	pub trend: Trend,
	pub color: String,
	pub details: Details,
}

/// The built graph plus the lookup indexes the highlight engine queries.
/// Construction is the only mutation; selection state lives elsewhere.
#[derive(Clone, Debug, Default)]
pub struct SystemGraph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	node_index: HashMap<String, usize>,
	edge_index: HashMap<String, usize>,
	children: HashMap<String, Vec<String>>,
}

impl SystemGraph {
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let mut node_index = HashMap::with_capacity(nodes.len());
		let mut children: HashMap<String, Vec<String>> = HashMap::new();
		for (i, node) in nodes.iter().enumerate() {
			node_index.insert(node.id.clone(), i);
			if let Some(parent) = &node.parent_id {
				children
					.entry(parent.clone())
					.or_default()
					.push(node.id.clone());
			}
		}
		let edge_index = edges
			.iter()
			.enumerate()
			.map(|(i, edge)| (edge.id.clone(), i))
			.collect();
		Self {
			nodes,
			edges,
			node_index,
			edge_index,
			children,
		}
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	pub fn parent_of(&self, id: &str) -> Option<&Node> {
		self.node(id)
			.and_then(|n| n.parent_id.as_deref())
			.and_then(|pid| self.node(pid))
	}

	/// Direct children, in node emission order.
	pub fn children_of(&self, id: &str) -> &[String] {
		self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn is_compound(&self, id: &str) -> bool {
		!self.children_of(id).is_empty()
	}

	/// Every node below `id` in the hierarchy forest, depth-first.
	pub fn descendants_of(&self, id: &str) -> Vec<String> {
		let mut out = Vec::new();
		let mut stack: Vec<&str> = self.children_of(id).iter().map(String::as_str).collect();
		while let Some(next) = stack.pop() {
			out.push(next.to_string());
			stack.extend(self.children_of(next).iter().map(String::as_str));
		}
		out
	}

	pub fn edges_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
		self.edges
			.iter()
			.filter(move |e| e.source == id || e.target == id)
	}
}

#[cfg(test)]
mod tests {
	use super::Trend;

	#[test]
	fn trend_prefixes_are_case_insensitive() {
		assert_eq!(Trend::classify("positive"), Trend::Positive);
		assert_eq!(Trend::classify("Positive trend"), Trend::Positive);
		assert_eq!(Trend::classify("NEGATIVE"), Trend::Negative);
		assert_eq!(Trend::classify("neg."), Trend::Negative);
	}

	#[test]
	fn unknown_trends_fall_back_to_neutral() {
		assert_eq!(Trend::classify(""), Trend::Neutral);
		assert_eq!(Trend::classify("stable"), Trend::Neutral);
		assert_eq!(Trend::classify("unknown"), Trend::Neutral);
	}
}
