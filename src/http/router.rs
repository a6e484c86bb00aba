//! Explicit routing table: path pattern + method -> handler function.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;
use percent_encoding::percent_decode_str;

use super::middleware::Middleware;
use super::{Request, Response};
use crate::context::AppContext;
use crate::exception::{Error, Result};

/// Handler trait for processing requests.
///
/// All view functions are adapted into this trait; the application context
/// is passed explicitly rather than held in ambient globals.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, ctx: Arc<AppContext>, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, ctx: Arc<AppContext>, request: Request) -> Result<Response> {
		(**self).handle(ctx, request).await
	}
}

struct FnHandler<F> {
	f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Arc<AppContext>, Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	async fn handle(&self, ctx: Arc<AppContext>, request: Request) -> Result<Response> {
		(self.f)(ctx, request).await
	}
}

/// URL pattern with `{param}` placeholders, e.g. `/articles/{slug}/`.
#[derive(Debug, Clone)]
pub struct PathPattern {
	raw: String,
	segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
	Literal(String),
	Param(String),
}

impl PathPattern {
	pub fn new(pattern: &str) -> Self {
		let segments = pattern
			.split('/')
			.map(|part| {
				if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
					Segment::Param(name.to_string())
				} else {
					Segment::Literal(part.to_string())
				}
			})
			.collect();
		Self {
			raw: pattern.to_string(),
			segments,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Match a concrete path, returning extracted parameters on success.
	/// Trailing slashes are significant: `/articles/` does not match
	/// `/articles`.
	pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
		let parts: Vec<&str> = path.split('/').collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = Vec::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(expected) => {
					if expected != part {
						return None;
					}
				}
				Segment::Param(name) => {
					if part.is_empty() {
						return None;
					}
					let value = percent_decode_str(part).decode_utf8_lossy().to_string();
					params.push((name.clone(), value));
				}
			}
		}
		Some(params)
	}
}

struct Route {
	method: Method,
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
}

/// Routing table for the whole application.
///
/// Routes are checked in registration order; the first pattern+method match
/// wins. A pattern match without a method match yields 405, no match at all
/// yields 404.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an async view function under a path pattern and method.
	pub fn function<F, Fut>(mut self, path: &str, method: Method, f: F) -> Self
	where
		F: Fn(Arc<AppContext>, Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response>> + Send + 'static,
	{
		self.routes.push(Route {
			method,
			pattern: PathPattern::new(path),
			handler: Arc::new(FnHandler { f }),
		});
		self
	}

	/// Mount another router's routes under a path prefix.
	pub fn include(mut self, prefix: &str, other: Router) -> Self {
		let prefix = prefix.trim_end_matches('/');
		for route in other.routes {
			self.routes.push(Route {
				method: route.method,
				pattern: PathPattern::new(&format!("{}{}", prefix, route.pattern.as_str())),
				handler: route.handler,
			});
		}
		self
	}

	pub fn with_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
		self.middlewares.push(Arc::new(middleware));
		self
	}

	/// Resolve and run the handler for a request, rendering any error into
	/// its response shape.
	pub async fn dispatch(&self, ctx: Arc<AppContext>, mut request: Request) -> Response {
		let mut path_matched = false;

		let mut matched: Option<&Route> = None;
		for route in &self.routes {
			if let Some(params) = route.pattern.matches(request.path()) {
				path_matched = true;
				if route.method == request.method {
					for (name, value) in params {
						request.set_path_param(name, value);
					}
					matched = Some(route);
					break;
				}
			}
		}

		let result = match matched {
			Some(route) => {
				let mut handler: Arc<dyn Handler> = route.handler.clone();
				for middleware in self.middlewares.iter().rev() {
					handler = Arc::new(MiddlewareHandler {
						middleware: middleware.clone(),
						next: handler,
					});
				}
				handler.handle(ctx, request).await
			}
			None if path_matched => Err(Error::MethodNotAllowed(request.method.to_string())),
			None => Err(Error::not_found()),
		};

		match result {
			Ok(response) => response,
			Err(error) => {
				if error.status_code().is_server_error() {
					tracing::error!(error = %error, "unhandled server error");
				}
				error.into()
			}
		}
	}
}

struct MiddlewareHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for MiddlewareHandler {
	async fn handle(&self, ctx: Arc<AppContext>, request: Request) -> Result<Response> {
		self.middleware.process(ctx, request, self.next.clone()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::AppContext;
	use hyper::StatusCode;
	use rstest::rstest;

	#[rstest]
	fn test_pattern_literal_match() {
		let pattern = PathPattern::new("/articles/");

		assert_eq!(pattern.matches("/articles/"), Some(vec![]));
		assert_eq!(pattern.matches("/articles"), None);
		assert_eq!(pattern.matches("/products/"), None);
	}

	#[rstest]
	fn test_pattern_param_extraction() {
		let pattern = PathPattern::new("/articles/{slug}/");

		assert_eq!(
			pattern.matches("/articles/test-article/"),
			Some(vec![("slug".to_string(), "test-article".to_string())])
		);
		assert_eq!(pattern.matches("/articles//"), None);
		assert_eq!(pattern.matches("/articles/a/b/"), None);
	}

	#[rstest]
	fn test_pattern_param_is_percent_decoded() {
		let pattern = PathPattern::new("/shop/products/{slug}/");

		assert_eq!(
			pattern.matches("/shop/products/caf%C3%A9-mug/"),
			Some(vec![("slug".to_string(), "café-mug".to_string())])
		);
	}

	async fn probe(_ctx: Arc<AppContext>, _request: Request) -> Result<Response> {
		Ok(Response::ok())
	}

	#[rstest]
	#[tokio::test(flavor = "current_thread")]
	async fn test_dispatch_unknown_path_is_404() {
		let router = Router::new().function("/articles/", Method::GET, probe);
		let ctx = Arc::new(AppContext::for_tests());
		let request = Request::builder().uri("/missing/").build().unwrap();

		let response = router.dispatch(ctx, request).await;

		assert_eq!(response.status, StatusCode::NOT_FOUND);
	}

	#[rstest]
	#[tokio::test(flavor = "current_thread")]
	async fn test_dispatch_wrong_method_is_405() {
		let router = Router::new().function("/articles/", Method::GET, probe);
		let ctx = Arc::new(AppContext::for_tests());
		let request = Request::builder()
			.method(Method::POST)
			.uri("/articles/")
			.build()
			.unwrap();

		let response = router.dispatch(ctx, request).await;

		assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(
			response.json_body(),
			Some(serde_json::json!({"detail": "Method \"POST\" not allowed."}))
		);
	}

	#[rstest]
	#[tokio::test(flavor = "current_thread")]
	async fn test_include_mounts_under_prefix() {
		let users = Router::new().function("/users/me/", Method::GET, probe);
		let router = Router::new().include("/auth", users);
		let ctx = Arc::new(AppContext::for_tests());
		let request = Request::builder().uri("/auth/users/me/").build().unwrap();

		let response = router.dispatch(ctx, request).await;

		assert_eq!(response.status, StatusCode::OK);
	}
}
