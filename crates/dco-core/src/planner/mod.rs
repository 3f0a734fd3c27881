//! Chunk planning.
//!
//! Splits a resource of known size into fixed-size, half-open byte ranges
//! and groups them into the bounded windows the dispatcher sends together.

mod chunk;

pub use chunk::{plan_chunks, windows, Chunk};
