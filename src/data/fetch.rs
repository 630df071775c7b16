use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::DataError;

/// Fetch a same-origin text asset via the browser fetch API.
pub async fn fetch_text(url: &str) -> Result<String, DataError> {
	let opts = RequestInit::new();
	opts.set_method("GET");

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| DataError::Fetch(format!("{e:?}")))?;

	let window = web_sys::window().ok_or_else(|| DataError::Fetch("no window".into()))?;
	let resp_value = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| DataError::Fetch(format!("{e:?}")))?;

	let resp: Response = resp_value
		.dyn_into()
		.map_err(|_| DataError::Fetch("response is not a Response".into()))?;
	if !resp.ok() {
		return Err(DataError::Status(resp.status()));
	}

	let text = JsFuture::from(resp.text().map_err(|e| DataError::Fetch(format!("{e:?}")))?)
		.await
		.map_err(|e| DataError::Fetch(format!("{e:?}")))?;
	text.as_string()
		.ok_or_else(|| DataError::Fetch("body is not text".into()))
}
