use csv::{ReaderBuilder, Trim};

use super::DataError;
use super::row::Row;

/// Parse raw CSV text into rows. A header row is required; records shorter
/// or longer than the header are tolerated, and unknown columns are ignored.
pub fn parse_rows(text: &str) -> Result<Vec<Row>, DataError> {
	let mut reader = ReaderBuilder::new()
		.trim(Trim::All)
		.flexible(true)
		.from_reader(text.as_bytes());
	let mut rows = Vec::new();
	for record in reader.deserialize() {
		rows.push(record?);
	}
	Ok(rows)
}

#[cfg(test)]
mod tests {
	use super::parse_rows;

	#[test]
	fn reads_headered_records() {
		let text = "id,source,target,label,trend\n\
			A,,,Component A,positive\n\
			A-B,A,B,links,negative\n";
		let rows = parse_rows(text).unwrap();
		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].id, "A");
		assert_eq!(rows[0].label, "Component A");
		assert!(!rows[0].is_edge());
		assert!(rows[1].is_edge());
		assert_eq!(rows[1].trend, "negative");
	}

	#[test]
	fn missing_columns_yield_empty_fields() {
		let text = "id,label\nA,Component A\n";
		let rows = parse_rows(text).unwrap();
		assert_eq!(rows[0].id, "A");
		assert_eq!(rows[0].source, "");
		assert_eq!(rows[0].mandate, "");
	}

	#[test]
	fn blank_lines_are_skipped() {
		let text = "id,label\nA,one\n\nB,two\n";
		let rows = parse_rows(text).unwrap();
		assert_eq!(rows.len(), 2);
	}

	#[test]
	fn quoted_fields_keep_commas() {
		let text = "id,label,description\nA,\"one, two\",\"desc, more\"\n";
		let rows = parse_rows(text).unwrap();
		assert_eq!(rows[0].label, "one, two");
		assert_eq!(rows[0].description, "desc, more");
	}
}
