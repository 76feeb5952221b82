//! Unit tests for the store module
//!
//! Covers the value model, edit batches, and the in-memory store contract.
//! No async machinery; listener dispatch is exercised synchronously.

#![allow(clippy::unwrap_used, clippy::panic)]
