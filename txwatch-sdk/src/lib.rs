//! Wire types and HTTP clients for txwatch.
//!
//! The `objects` module holds every JSON shape that crosses a process
//! boundary: provider webhook payloads, provider webhook management requests,
//! chat API requests and the receiver's own responses.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
