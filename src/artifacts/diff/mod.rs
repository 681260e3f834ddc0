//! Diff core
//!
//! A comparison builds a [`diff_list::DiffList`] by walking two trees
//! ([`tree_diff`]) or a tree and the staged entries ([`index_tree`]). The list
//! can then be rendered ([`patch`]) and printed ([`print`]) in compact or
//! unified patch form.
//!
//! ## Reverse mode
//!
//! With [`options::DiffFlags::REVERSE`] set, old and new are swapped while
//! deltas are recorded. Rendering shows deltas exactly as recorded.

pub mod binary;
pub mod delta;
pub mod diff_list;
pub mod engine;
pub mod error;
pub mod index_tree;
pub mod options;
pub mod pathspec;
pub mod patch;
pub mod print;
pub mod tree_diff;
