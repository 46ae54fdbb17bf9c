//! # entryguard-domain
//!
//! Pure domain model for the entryguard premises-security controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define the **security automaton** transition table ([`security`])
//! - Define **devices** and the closed set of codes each one accepts
//! - Define **commands** (validated actuator instructions) and their sources
//! - Define **sensor events** decoded from inbound bus topics
//! - Define the **mirrored system state** and its update rules
//! - Define **audit log records**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod audit;
pub mod command;
pub mod device;
pub mod security;
pub mod sensor;
pub mod state;
