//! # entryguard-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** used by the dashboard (`/api/state`,
//!   `/api/logs`, `/api/{fan,led,buzzer}`, `/api/mock/*`)
//! - Stream state snapshots as **Server-Sent Events** (`/api/state/stream`)
//! - Record an `HTTP_REQUEST` audit entry for every request but the log reader
//! - Check the optional caller token on control routes
//!
//! Handlers only translate HTTP into controller calls; every state change
//! still goes through the controller's critical section.
//!
//! ## Dependency rule
//! Depends on `entryguard-app` (for the controller and port traits) and
//! `entryguard-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
