//! Ontic Core Types
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Identity types (NodeId, EdgeId, EdgeTypeId)
//! - Edge direction
//! - Value types (the Value enum stored in node property bags)
//! - Entity structures (Node, Edge)
//! - Common error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
