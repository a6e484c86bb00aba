//! Page-number pagination for list endpoints.
//!
//! Clients page with `?page=` and may shrink or grow the page with
//! `?page_size=` up to the configured maximum. List bodies are wrapped as
//! `{"count", "next", "previous", "results"}` with absolute page links.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;

use crate::config::settings::Settings;
use crate::exception::{Error, Result};
use crate::http::Request;

const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'<')
	.add(b'>')
	.add(b'&')
	.add(b'=')
	.add(b'+')
	.add(b'%');

#[derive(Debug, Clone, Copy)]
pub struct PageNumberPagination {
	pub page_size: i64,
	pub max_page_size: i64,
}

impl PageNumberPagination {
	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			page_size: settings.page_size,
			max_page_size: settings.max_page_size,
		}
	}

	/// Resolve the requested page and page size.
	///
	/// A malformed or out-of-range `page` is a 404 ("Invalid page."); a
	/// malformed `page_size` silently falls back to the default, a large
	/// one is capped.
	pub fn page_params(&self, request: &Request) -> Result<PageParams> {
		let page = match request.query_param("page") {
			Some(raw) => raw
				.parse::<i64>()
				.ok()
				.filter(|page| *page >= 1)
				.ok_or_else(|| Error::NotFound("Invalid page.".to_string()))?,
			None => 1,
		};

		let page_size = request
			.query_param("page_size")
			.and_then(|raw| raw.parse::<i64>().ok())
			.filter(|size| *size >= 1)
			.map(|size| size.min(self.max_page_size))
			.unwrap_or(self.page_size);

		Ok(PageParams { page, page_size })
	}
}

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
	pub page: i64,
	pub page_size: i64,
}

impl PageParams {
	pub fn limit(&self) -> i64 {
		self.page_size
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.page_size
	}
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
	pub count: i64,
	pub next: Option<String>,
	pub previous: Option<String>,
	pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
	/// Wrap one page of results, building absolute next/previous links from
	/// the request. Requesting a page past the end is a 404.
	pub fn build(
		request: &Request,
		params: &PageParams,
		count: i64,
		results: Vec<T>,
	) -> Result<Self> {
		let total_pages = if count == 0 {
			1
		} else {
			(count as u64).div_ceil(params.page_size as u64) as i64
		};
		if params.page > total_pages {
			return Err(Error::NotFound("Invalid page.".to_string()));
		}

		let next = (params.page < total_pages)
			.then(|| page_url(request, params.page + 1));
		let previous = (params.page > 1).then(|| page_url(request, params.page - 1));

		Ok(Self {
			count,
			next,
			previous,
			results,
		})
	}
}

/// Absolute URL for this request with the `page` query parameter replaced.
fn page_url(request: &Request, page: i64) -> String {
	let mut params: BTreeMap<String, String> =
		request.decoded_query_params().into_iter().collect();
	params.insert("page".to_string(), page.to_string());

	let query: Vec<String> = params
		.iter()
		.map(|(k, v)| {
			format!(
				"{}={}",
				utf8_percent_encode(k, QUERY_ENCODE_SET),
				utf8_percent_encode(v, QUERY_ENCODE_SET)
			)
		})
		.collect();

	request.build_absolute_uri(Some(&format!("{}?{}", request.path(), query.join("&"))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn paginator() -> PageNumberPagination {
		PageNumberPagination {
			page_size: 20,
			max_page_size: 100,
		}
	}

	fn request(uri: &str) -> Request {
		Request::builder()
			.uri(uri)
			.header("host", "testserver")
			.build()
			.unwrap()
	}

	#[rstest]
	fn test_defaults_when_no_params() {
		let params = paginator().page_params(&request("/articles/")).unwrap();

		assert_eq!(params.page, 1);
		assert_eq!(params.page_size, 20);
		assert_eq!(params.offset(), 0);
	}

	#[rstest]
	fn test_page_and_size_parsed_and_capped() {
		let params = paginator()
			.page_params(&request("/articles/?page=3&page_size=500"))
			.unwrap();

		assert_eq!(params.page, 3);
		assert_eq!(params.page_size, 100);
		assert_eq!(params.offset(), 200);
	}

	#[rstest]
	#[case("/articles/?page=0")]
	#[case("/articles/?page=-1")]
	#[case("/articles/?page=abc")]
	fn test_invalid_page_is_404(#[case] uri: &str) {
		let result = paginator().page_params(&request(uri));

		assert!(matches!(result, Err(Error::NotFound(detail)) if detail == "Invalid page."));
	}

	#[rstest]
	fn test_invalid_page_size_falls_back_to_default() {
		let params = paginator()
			.page_params(&request("/articles/?page_size=abc"))
			.unwrap();

		assert_eq!(params.page_size, 20);
	}

	#[rstest]
	fn test_links_on_middle_page() {
		let request = request("/articles/?page=2&page_size=10");
		let params = PageParams { page: 2, page_size: 10 };

		let page = PaginatedResponse::build(&request, &params, 35, vec![1, 2, 3]).unwrap();

		assert_eq!(page.count, 35);
		assert_eq!(
			page.next.as_deref(),
			Some("http://testserver/articles/?page=3&page_size=10")
		);
		assert_eq!(
			page.previous.as_deref(),
			Some("http://testserver/articles/?page=1&page_size=10")
		);
	}

	#[rstest]
	fn test_no_links_on_single_page() {
		let request = request("/articles/");
		let params = PageParams { page: 1, page_size: 20 };

		let page = PaginatedResponse::build(&request, &params, 5, vec![(); 5]).unwrap();

		assert_eq!(page.next, None);
		assert_eq!(page.previous, None);
	}

	#[rstest]
	fn test_page_past_the_end_is_404() {
		let request = request("/articles/?page=4");
		let params = PageParams { page: 4, page_size: 20 };

		let result = PaginatedResponse::build(&request, &params, 35, Vec::<()>::new());

		assert!(matches!(result, Err(Error::NotFound(_))));
	}

	#[rstest]
	fn test_empty_first_page_is_allowed() {
		let request = request("/articles/");
		let params = PageParams { page: 1, page_size: 20 };

		let page = PaginatedResponse::build(&request, &params, 0, Vec::<()>::new()).unwrap();

		assert_eq!(page.count, 0);
		assert!(page.results.is_empty());
	}
}
