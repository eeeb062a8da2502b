//! Circle-packing explorer engine for RDF class hierarchies.
//!
//! The engine is UI-agnostic: repositories turn a dataset plus a
//! [`state::DetailState`] into frames (circles, labels, arrows) and tree
//! scenes that any painter can draw.

pub mod animation;
pub mod config;
pub mod dataset;
pub mod geometry;
pub mod graph;
pub mod label;
pub mod layout;
pub mod node;
pub mod sparql;
pub mod state;
pub mod tree;
pub mod util;
