//! GitHub GraphQL transport for project boards.
//!
//! Implements the [`board::ProjectBoardSource`] port over GitHub's GraphQL API
//! (classic Projects). Each call posts the board query with the page cursors
//! from the request and converts the response into a [`board::ProjectPage`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Query text,
//! authentication headers, response decoding and failure classification live
//! here; the [`board`] crate never sees them.
//!
//! ## Failure classification
//!
//! | Condition | [`board::BoardError`] variant |
//! |-----------|-------------------------------|
//! | Network failure, timeout | `Transport { status: None }` |
//! | Non-2xx status | `Transport { status: Some(code) }`, body verbatim |
//! | `errors` array in the body | `Service`, every message |
//! | No matching project | `ProjectNotFound` |
//! | Body is not the expected JSON | `MalformedResponse` |

pub mod client;
pub mod query;
pub mod wire;

pub use client::{GitHubBoardClient, GitHubClientConfig, DEFAULT_ENDPOINT};
