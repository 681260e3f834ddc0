//! Structured differences between snapshots of a git file tree
//!
//! Two comparisons populate a [`DiffList`](artifacts::diff::diff_list::DiffList):
//! tree against tree, and staged index against tree. A populated list can
//! then be rendered as a compact status listing or as a unified patch.
//!
//! ```no_run
//! use bit_diff::areas::repository::Repository;
//! use bit_diff::artifacts::diff::options::DiffOptions;
//! use bit_diff::artifacts::diff::print::WriterSink;
//!
//! # fn main() -> anyhow::Result<()> {
//! let repository = Repository::open(std::path::Path::new("."))?;
//! let old = repository.resolve_tree("4b825dc")?;
//! let new = repository.resolve_tree("1a410ef")?;
//!
//! let mut diff = repository.diff_tree_to_tree(&old, &new, DiffOptions::default())?;
//! diff.print_patch(&mut WriterSink::new(std::io::stdout(), false))?;
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
