//! # sprinkler-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `OutputDriver` — set a physical output to a signal level
//!   - `MessageChannel` — subscribe to and publish on the messaging broker
//!   - `Cooldown` — the post-transition quiescent wait
//! - Define **driving/inbound** use-cases:
//!   - `ZoneController` — resolve, decide, drive outputs, commit state
//!   - `Dispatcher` — the single owner of the command pipeline
//! - Provide **in-process infrastructure** that doesn't need IO (`SleepCooldown`)
//!
//! ## Dependency rule
//! Depends on `sprinkler-domain` only (plus `tokio::sync` / `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cooldown;
pub mod dispatcher;
pub mod ports;
pub mod services;
