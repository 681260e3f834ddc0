//! Git data structures and algorithms
//!
//! - `database`: Database entry types
//! - `diff`: Tree/index comparison, delta lists and patch rendering
//! - `index`: Index/staging area data structures
//! - `objects`: Git object types (blob, tree, commit)

pub mod database;
pub mod diff;
pub mod index;
pub mod objects;
