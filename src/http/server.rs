//! HTTP server: accept loop and hyper connection plumbing.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::TcpListener;

use super::router::Router;
use super::{Request, Response};
use crate::context::AppContext;
use crate::exception::{Error, Result};

/// Serves a [`Router`] over TCP.
pub struct Server {
	ctx: Arc<AppContext>,
	router: Arc<Router>,
}

impl Server {
	pub fn new(ctx: Arc<AppContext>, router: Router) -> Self {
		Self {
			ctx,
			router: Arc::new(router),
		}
	}

	/// Bind and serve until the process is stopped.
	pub async fn run(self, addr: SocketAddr) -> Result<()> {
		let listener = TcpListener::bind(addr)
			.await
			.map_err(|e| Error::Internal(format!("failed to bind {addr}: {e}")))?;
		tracing::info!(%addr, "listening");

		loop {
			let (stream, peer) = match listener.accept().await {
				Ok(conn) => conn,
				Err(e) => {
					tracing::warn!(error = %e, "accept failed");
					continue;
				}
			};

			let ctx = self.ctx.clone();
			let router = self.router.clone();
			tokio::spawn(async move {
				let io = TokioIo::new(stream);
				let service = service_fn(move |req| {
					let ctx = ctx.clone();
					let router = router.clone();
					async move { handle_connection_request(ctx, router, req).await }
				});

				let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
				if let Err(e) = builder.serve_connection(io, service).await {
					tracing::debug!(%peer, error = %e, "connection error");
				}
			});
		}
	}
}

async fn handle_connection_request(
	ctx: Arc<AppContext>,
	router: Arc<Router>,
	req: hyper::Request<Incoming>,
) -> std::result::Result<hyper::Response<Full<bytes::Bytes>>, std::convert::Infallible> {
	let response = match into_request(req).await {
		Ok(request) => router.dispatch(ctx, request).await,
		Err(error) => error.into(),
	};
	Ok(into_hyper_response(response))
}

async fn into_request(req: hyper::Request<Incoming>) -> Result<Request> {
	let (parts, body) = req.into_parts();
	let body = body
		.collect()
		.await
		.map_err(|e| Error::ParseError(format!("failed to read request body: {e}")))?
		.to_bytes();

	Request::builder()
		.method(parts.method)
		.uri(parts.uri.to_string())
		.headers(parts.headers)
		.body(body)
		.build()
}

fn into_hyper_response(response: Response) -> hyper::Response<Full<bytes::Bytes>> {
	let mut builder = hyper::Response::builder().status(response.status);
	if let Some(headers) = builder.headers_mut() {
		*headers = response.headers;
	}
	builder
		.body(Full::new(response.body))
		.unwrap_or_else(|_| hyper::Response::new(Full::new(bytes::Bytes::new())))
}
