use leptos::prelude::*;

use crate::graph::{Selection, SystemGraph};

/// The selected element's record, flattened for presentation. Empty fields
/// are omitted entirely, matching the panel's progressive layout.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoCard {
	pub title: String,
	pub fields: Vec<(&'static str, String)>,
}

impl InfoCard {
	pub fn for_selection(graph: &SystemGraph, selection: &Selection) -> Option<Self> {
		let (id, label, trend, details) = match selection {
			Selection::Node(id) => {
				let node = graph.node(id)?;
				(&node.id, &node.label, node.trend, &node.details)
			}
			Selection::Edge(id) => {
				let edge = graph.edge(id)?;
				(&edge.id, &edge.label, edge.trend, &edge.details)
			}
		};
		let title = if label.is_empty() {
			id.clone()
		} else {
			label.clone()
		};

		let mut fields = Vec::new();
		let mut push = |name: &'static str, value: &str| {
			if !value.is_empty() {
				fields.push((name, value.to_string()));
			}
		};
		push("Description", &details.description);
		push("Trend", trend.as_str());
		push("Reliability", &details.reliability);
		push("References", &details.references);
		push("Reviewers", &details.reviewers);
		push("Organisation", &details.organisation);
		push("Mandate", &details.mandate);
		push("Comments", &details.comments);

		Some(Self { title, fields })
	}
}

/// Side panel: the selected element's record, or a welcome blurb when
/// nothing is selected.
#[component]
pub fn Sidebar(#[prop(into)] info: Signal<Option<InfoCard>>) -> impl IntoView {
	view! {
		<aside class="sidebar">
			{move || match info.get() {
				Some(card) => view! {
					<div class="sidebar-card">
						<h2>{card.title}</h2>
						{card
							.fields
							.into_iter()
							.map(|(name, value)| {
								view! {
									<p>
										<strong>{name}</strong>
										<br />
										{value}
									</p>
								}
							})
							.collect_view()}
					</div>
				}
					.into_any(),
				None => view! {
					<div class="sidebar-welcome">
						<h2>"System map"</h2>
						<p>
							"Tap a component or relationship to inspect it and light up its neighborhood. Tap the background to clear the selection."
						</p>
					</div>
				}
					.into_any(),
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::InfoCard;
	use crate::data::Row;
	use crate::graph::{BuildOptions, Selection, build};

	#[test]
	fn cards_skip_empty_fields_and_fall_back_to_ids() {
		let rows = vec![
			Row {
				id: "A".into(),
				description: "does things".into(),
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
				trend: "positive".into(),
				..Row::default()
			},
		];
		let graph = build(&rows, &BuildOptions::default());

		let card = InfoCard::for_selection(&graph, &Selection::Node("A".into())).unwrap();
		assert_eq!(card.title, "A");
		assert!(card.fields.iter().any(|(n, v)| *n == "Description" && v == "does things"));
		assert!(!card.fields.iter().any(|(n, _)| *n == "Mandate"));

		let card = InfoCard::for_selection(&graph, &Selection::Edge("A-B".into())).unwrap();
		assert!(card.fields.iter().any(|(n, v)| *n == "Trend" && v == "positive"));

		assert!(InfoCard::for_selection(&graph, &Selection::Node("ghost".into())).is_none());
	}
}
