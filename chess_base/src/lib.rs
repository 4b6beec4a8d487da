//! # Base types for gridchess
//!
//! This is an auxiliary crate for `gridchess`, which contains the plain value types (squares,
//! sides, pieces) and board geometry. It was split from the main crate so that the types carry
//! no engine logic at all.
//!
//! Normally you don't want to use this crate directly. Use `gridchess` instead.

pub mod geometry;
pub mod types;
