//! HTTP request representation handed to view handlers.

use std::collections::HashMap;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::exception::{Error, Result};

/// Incoming HTTP request.
///
/// Query parameters are parsed once at construction; path parameters are
/// filled in by the router when a `{param}` pattern matches.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub query_params: HashMap<String, String>,
	pub path_params: HashMap<String, String>,
}

impl Request {
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Parse query parameters from a URI.
	///
	/// Splits each pair on the first `=` only, so values containing `=`
	/// (e.g. Base64 payloads) survive intact.
	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get a single query parameter, URL-decoded.
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.query_params
			.get(name)
			.map(|v| percent_decode_str(v).decode_utf8_lossy().replace('+', " "))
	}

	/// All query parameters with keys and values URL-decoded.
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| {
				(
					percent_decode_str(k).decode_utf8_lossy().to_string(),
					percent_decode_str(v).decode_utf8_lossy().replace('+', " "),
				)
			})
			.collect()
	}

	/// Set a path parameter (called by the router during matching).
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Deserialize the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(Error::from)
	}

	/// Deserialize the body as JSON and run the serializer's field
	/// validation, surfacing violations per field.
	pub fn validated_json<T: DeserializeOwned + validator::Validate>(&self) -> Result<T> {
		let value: T = self.json()?;
		value.validate()?;
		Ok(value)
	}

	/// The bearer token from the `Authorization` header, if present.
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::AUTHORIZATION)
			.and_then(|h| h.to_str().ok())
			.and_then(|h| h.strip_prefix("Bearer "))
	}

	/// Build an absolute URI for this request, optionally for another
	/// path-and-query. Used for pagination links.
	pub fn build_absolute_uri(&self, path_and_query: Option<&str>) -> String {
		let host = self
			.headers
			.get(hyper::header::HOST)
			.and_then(|h| h.to_str().ok())
			.unwrap_or("localhost");
		let target = path_and_query.unwrap_or_else(|| {
			self.uri
				.path_and_query()
				.map(|pq| pq.as_str())
				.unwrap_or_else(|| self.uri.path())
		});
		format!("http://{}{}", host, target)
	}
}

#[derive(Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<Uri>,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		self.uri = uri.as_ref().parse().ok();
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn json<T: serde::Serialize>(self, value: &T) -> Self {
		let body = serde_json::to_vec(value).unwrap_or_default();
		self.header("content-type", "application/json").body(body)
	}

	pub fn build(self) -> Result<Request> {
		let method = self.method.unwrap_or(Method::GET);
		let uri = self
			.uri
			.ok_or_else(|| Error::Internal("request builder: missing or invalid uri".to_string()))?;
		let query_params = Request::parse_query_params(&uri);
		Ok(Request {
			method,
			uri,
			headers: self.headers,
			body: self.body,
			query_params,
			path_params: HashMap::new(),
		})
	}
}
