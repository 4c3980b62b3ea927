//! # callscribe-server
//!
//! HTTP ingress for the callscribe service.
//!
//! Two routes:
//!
//! - `POST /transcriptions` — submit a job descriptor; answered `202` or
//!   `429` straight from the admission controller's synchronous decision.
//!   This is the in-process stand-in for the message transport: redelivery
//!   of rejected jobs is the caller's problem.
//! - `GET /health` — liveness plus the worker slot's busy flag.

#![deny(unsafe_code)]

pub mod health;
pub mod server;

pub use server::{AppState, router};
