//! Client core for the user resource API.
//!
//! # Overview
//! Manages "user" records (`id`, `name`, `email`) behind a REST API at
//! `{base}/api/users`: a stateless request builder, an async service that
//! executes it, and the list/form controllers a view layer drives.
//!
//! # Design
//! - `UserClient` is stateless and does no I/O: each operation is split into
//!   `build_*` (produces an `HttpRequest`) and `parse_*` (consumes an
//!   `HttpResponse`), so the wire contract is testable without a network.
//! - `Transport` executes requests; `ReqwestTransport` is the real one.
//! - `UserService` pairs the two and is shared by all controllers.
//! - `UserListController` and `UserFormController` never patch state
//!   optimistically: the list is refetched after every mutation.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod navigation;
pub mod service;
pub mod transport;
pub mod types;

pub use client::UserClient;
pub use config::ClientConfig;
pub use controller::{
    FormMode, FormState, ListState, Outcome, RequestStatus, UserFormController, UserListController,
};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use navigation::Navigator;
pub use service::UserService;
pub use transport::{ReqwestTransport, Transport};
pub use types::{User, UserId};
