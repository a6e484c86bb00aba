//! HTTP response representation returned by view handlers.

use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::exception::Error;

/// Outgoing HTTP response.
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn unauthorized() -> Self {
		Self::new(StatusCode::UNAUTHORIZED)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Serialize `data` as the JSON body and set the content type.
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::exception::Result<Self> {
		let body = serde_json::to_vec(data)
			.map_err(|e| Error::Internal(format!("response serialization failed: {e}")))?;
		self.body = Bytes::from(body);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Parse the body back into a value. Test helper for asserting on
	/// handler output.
	pub fn json_body(&self) -> Option<serde_json::Value> {
		serde_json::from_slice(&self.body).ok()
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		Response::new(error.status_code())
			.with_json(&error.body())
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_with_json_sets_content_type() {
		let response = Response::ok().with_json(&json!({"detail": "ok"})).unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(
			response.headers.get("content-type").unwrap().to_str().unwrap(),
			"application/json"
		);
		assert_eq!(response.json_body(), Some(json!({"detail": "ok"})));
	}

	#[rstest]
	fn test_error_conversion_carries_status_and_body() {
		let response: Response = Error::not_found().into();

		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(response.json_body(), Some(json!({"detail": "Not found."})));
	}
}
