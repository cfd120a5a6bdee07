//! # sprinkler-domain
//!
//! Pure domain model for the sprinkler zone controller.
//!
//! ## Responsibilities
//! - Foundational types: zone identifiers, output handles, signal levels
//! - Define the **Zone Registry** (static zone → output mapping)
//! - Decode inbound **Zone Commands** from the bridge wire format
//! - Define the **Controller State** machine and its mutual-exclusion policy
//! - Build **Bridge Feedback** messages that keep the bridge UI truthful
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod registry;
pub mod zone;
