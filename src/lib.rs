//! # tsu-users
//!
//! A small JSON API over a single `users` table, served by a minimal
//! hyper-based router.
//!
//! ## Surface
//!
//! All routes live under a configurable prefix (default `/api/rust`):
//!
//! - `GET    /users`       every user
//! - `GET    /users/{id}`  one user
//! - `POST   /users`       create from `{"name", "email"}`
//! - `PUT    /users/{id}`  overwrite both fields
//! - `DELETE /users/{id}`  remove, answers `"User deleted"`
//!
//! plus `/healthz` and `/readyz` for the orchestrator. Every response is
//! `application/json` and carries permissive CORS headers; `OPTIONS` on any
//! path is answered by the CORS layer directly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tsu_users::{App, Server, SqlUserStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_users::Error> {
//!     let store = SqlUserStore::connect("postgres://app@localhost/app").await?;
//!     store.ensure_schema().await?;
//!
//!     let app = App::users(Arc::new(store), "/api/rust");
//!     Server::bind("0.0.0.0:8000".parse().unwrap()).serve(app).await
//! }
//! ```
//!
//! ## Writing your own routes
//!
//! Handlers are plain async functions or closures from [`Request`] to
//! anything [`IntoResponse`]. Dependencies are captured, never global:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tsu_users::{App, Method, Request, Response, Router, UserStore};
//!
//! fn count_route(store: Arc<dyn UserStore>) -> App {
//!     App::new(Router::new().on(Method::Get, "/count", move |_req: Request| {
//!         let store = Arc::clone(&store);
//!         async move {
//!             match store.list_users().await {
//!                 Ok(users) => Response::json(&users.len()),
//!                 Err(e) => Response::text(e.to_string()),
//!             }
//!         }
//!     }))
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod user;

pub mod api;
pub mod config;
pub mod health;
pub mod middleware;
pub mod store;
pub mod telemetry;

pub use app::App;
pub use error::Error;
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, shutdown_signal};
pub use status::Status;
pub use store::{Dialect, SqlUserStore, StoreError, UserStore};
pub use user::{User, UserInput};
