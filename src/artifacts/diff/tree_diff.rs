//! Tree-to-tree comparison
//!
//! [`compare_trees`] reports the differing names of two loaded trees. The
//! walker on top of it turns each reported name into deltas: matching
//! directories are compared recursively, a directory that exists on one side
//! only is expanded into one delta per file below it, and everything else
//! becomes a single delta.

use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::delta::DeltaStatus;
use crate::artifacts::diff::diff_list::DiffList;
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::DiffOptions;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// One differing name between two trees
///
/// A name that is a directory on one side and a file on the other sorts
/// differently on each side, so it is always reported as a deletion plus an
/// addition rather than as one modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChange<'t> {
    pub name: &'t str,
    pub old: Option<&'t DatabaseEntry>,
    pub new: Option<&'t DatabaseEntry>,
    pub status: DeltaStatus,
}

/// Merge the entries of two trees in git tree order, skipping identical ones
pub fn compare_trees<'t, F>(old: &'t Tree, new: &'t Tree, mut on_change: F) -> Result<(), DiffError>
where
    F: FnMut(TreeChange<'t>) -> Result<(), DiffError>,
{
    let mut old_entries = old.sorted_entries().peekable();
    let mut new_entries = new.sorted_entries().peekable();

    loop {
        let change = match (old_entries.peek(), new_entries.peek()) {
            (None, None) => return Ok(()),
            (Some(&(old_key, old_entry)), None) => {
                old_entries.next();
                deleted(old_key, old_entry)
            }
            (None, Some(&(new_key, new_entry))) => {
                new_entries.next();
                added(new_key, new_entry)
            }
            (Some(&(old_key, old_entry)), Some(&(new_key, new_entry))) => {
                match old_key.as_bytes().cmp(new_key.as_bytes()) {
                    Ordering::Less => {
                        old_entries.next();
                        deleted(old_key, old_entry)
                    }
                    Ordering::Greater => {
                        new_entries.next();
                        added(new_key, new_entry)
                    }
                    Ordering::Equal => {
                        old_entries.next();
                        new_entries.next();
                        if old_entry == new_entry {
                            continue;
                        }
                        TreeChange {
                            name: entry_name(old_key),
                            old: Some(old_entry),
                            new: Some(new_entry),
                            status: DeltaStatus::Modified,
                        }
                    }
                }
            }
        };

        on_change(change)?;
    }
}

fn entry_name(key: &str) -> &str {
    key.strip_suffix('/').unwrap_or(key)
}

fn added<'t>(key: &'t str, entry: &'t DatabaseEntry) -> TreeChange<'t> {
    TreeChange {
        name: entry_name(key),
        old: None,
        new: Some(entry),
        status: DeltaStatus::Added,
    }
}

fn deleted<'t>(key: &'t str, entry: &'t DatabaseEntry) -> TreeChange<'t> {
    TreeChange {
        name: entry_name(key),
        old: Some(entry),
        new: None,
        status: DeltaStatus::Deleted,
    }
}

impl<'r> DiffList<'r> {
    /// Compare two stored trees
    pub fn tree_to_tree(
        repository: &'r Repository,
        old_tree: &ObjectId,
        new_tree: &ObjectId,
        options: DiffOptions,
    ) -> Result<Self, DiffError> {
        debug!(old = %old_tree, new = %new_tree, "diffing tree to tree");

        let old = repository.lookup_tree(old_tree)?;
        let new = repository.lookup_tree(new_tree)?;

        let mut list = DiffList::new(repository, options);
        list.diff_trees(&old, &new)?;

        debug!(deltas = list.len(), "tree diff finished");
        Ok(list)
    }

    fn diff_trees(&mut self, old: &Tree, new: &Tree) -> Result<(), DiffError> {
        compare_trees(old, new, |change| self.on_tree_change(&change))
    }

    fn on_tree_change(&mut self, change: &TreeChange<'_>) -> Result<(), DiffError> {
        let repository = self.repository;
        let old_dir = change.old.filter(|entry| entry.is_tree());
        let new_dir = change.new.filter(|entry| entry.is_tree());

        let mut scope = self.enter(change.name)?;
        trace!(path = scope.current_path(), status = ?change.status, "tree entry changed");

        match (old_dir, new_dir) {
            (Some(old_dir), Some(new_dir)) => {
                let old = repository.lookup_tree(&old_dir.oid)?;
                let new = repository.lookup_tree(&new_dir.oid)?;
                scope.diff_trees(&old, &new)
            }
            (Some(old_dir), None) => scope.expand_subtree(&old_dir.oid, DeltaStatus::Deleted),
            (None, Some(new_dir)) => scope.expand_subtree(&new_dir.oid, DeltaStatus::Added),
            (None, None) => scope.from_two_sided(change.old, change.new, change.status),
        }
    }

    /// Record every file below a directory present on one side only
    fn expand_subtree(&mut self, oid: &ObjectId, status: DeltaStatus) -> Result<(), DiffError> {
        let repository = self.repository;
        let tree = repository.lookup_tree(oid)?;

        tree.walk_postorder(
            "",
            &|oid| repository.lookup_tree(oid),
            &mut |root, name, entry| {
                if entry.is_tree() {
                    return Ok(());
                }

                let mut scope = self.enter(root)?;
                let mut scope = scope.enter(name)?;
                scope.from_one_sided_here(status, entry)
            },
        )
    }
}
