//! Weekly report GitHub infrastructure adapter.
//!
//! Implements the [`report::HostingApi`] port against the GitHub REST API
//! using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (headers, status codes, the empty-repository 409,
//! rate-limit headers, `Link` pagination hints) are handled here; the
//! [`report`] crate never sees them.
//!
//! ## Endpoints
//!
//! | Port method | Endpoint |
//! |-------------|----------|
//! | `list_repositories` | `GET /orgs/{org}/repos` |
//! | `list_commits` | `GET /repos/{owner}/{repo}/commits` |
//! | `get_commit` | `GET /repos/{owner}/{repo}/commits/{ref}` |
//!
//! Every list call requests a single page of 100 entries.

mod client;
mod wire;

pub use client::{
    GithubClient, GithubClientConfig, GithubClientError, DEFAULT_API_URL, DEFAULT_TIMEOUT,
};
