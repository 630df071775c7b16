use serde::Deserialize;

/// One record of the analysis CSV. Every column is optional in the file;
/// absent or short columns deserialize to empty strings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Row {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: String,
	pub description: String,
	pub trend: String,
	pub reliability: String,
	pub references: String,
	pub reviewers: String,
	pub organisation: String,
	pub mandate: String,
	pub comments: String,
}

impl Row {
	/// Rows naming both endpoints are relationships; everything else is a
	/// component.
	pub fn is_edge(&self) -> bool {
		!self.source.is_empty() && !self.target.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::Row;

	#[test]
	fn edge_rows_need_both_endpoints() {
		let mut row = Row {
			id: "a-b".into(),
			source: "a".into(),
			target: "b".into(),
			..Row::default()
		};
		assert!(row.is_edge());

		row.target.clear();
		assert!(!row.is_edge());

		row.source.clear();
		assert!(!row.is_edge());
	}
}
