//! HTTP layer: request/response types, routing table, middleware, server.

pub mod middleware;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use request::Request;
pub use response::Response;
pub use router::{Handler, PathPattern, Router};
pub use server::Server;
