#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for vigil
//!
//! This crate issues the liveness requests of a verification sweep: one plain
//! GET per URL, bounded by a per-request timeout, with no retries, custom
//! headers, or authentication. Transport failures are classified into
//! `NetworkError` variants so callers can tell a timeout from a refused
//! connection.

mod client;

pub use client::{NetClient, NetConfig};
