use leptos::prelude::*;
use log::error;

use crate::components::network::{NetworkCanvas, PresentationMode};
use crate::components::sidebar::{InfoCard, Sidebar};
use crate::data;
use crate::graph::BuildOptions;

/// Default Home Page: load the dataset once, then hand it to the canvas.
#[component]
pub fn Home() -> impl IntoView {
	let graph = LocalResource::new(|| async {
		match data::load_graph(&BuildOptions::default()).await {
			Ok(graph) => Some(graph),
			Err(err) => {
				// Single top-level catch. The page stays in its initial
				// unrendered state; nothing retries.
				error!("failed to load system data: {err}");
				None
			}
		}
	});
	let selected: RwSignal<Option<InfoCard>> = RwSignal::new(None);

	view! {
		<div class="map-page">
			<Suspense fallback=|| ()>
				{move || Suspend::new(async move {
					graph
						.await
						.map(|g| {
							view! {
								<div class="map-canvas">
									<NetworkCanvas
										graph=g
										mode=PresentationMode::Sidebar
										on_select=Callback::new(move |card| selected.set(card))
									/>
								</div>
								<Sidebar info=selected />
							}
						})
				})}
			</Suspense>
		</div>
	}
}
