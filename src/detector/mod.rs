//! Component tree construction
//!
//! This module contains the flood that builds the grey-level component stack:
//! - Accessibility map (which pixels have been discovered)
//! - Boundary heap (discovered pixels ordered by grey level)
//! - Region stack (open components and the collapse routine)
//! - The state machine driving the three

/// Packed per-pixel discovery flags
pub mod accessibility;
/// Level-ordered priority queue of boundary pixels
pub mod boundary_heap;
/// State machine and per-call flood context
pub mod component_tree;
/// Stack of open components and merge records
pub mod region_stack;

pub use component_tree::{FloodContext, RegionHistory, State, Step, build_component_tree};
pub use region_stack::{MergeRecord, RegionStack};
