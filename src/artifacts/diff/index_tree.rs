//! Staged entries compared against a stored tree
//!
//! The tree is walked children-first while a cursor advances over the staged
//! entries. Both produce full paths in the same byte order, so every staged
//! path that sorts before the current tree path can only be an addition.

use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::delta::DeltaStatus;
use crate::artifacts::diff::diff_list::DiffList;
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::DiffOptions;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::iter::Peekable;
use tracing::debug;

struct IndexTreeMerger<'l, 'r, I>
where
    I: Iterator,
{
    list: &'l mut DiffList<'r>,
    staged: Peekable<I>,
}

impl<'i, I> IndexTreeMerger<'_, '_, I>
where
    I: Iterator<Item = &'i IndexEntry>,
{
    /// Record every staged entry sorting before `stop` as added
    ///
    /// With no `stop` the remaining staged entries are all flushed.
    fn flush_added(&mut self, stop: Option<&str>) -> Result<(), DiffError> {
        while let Some(entry) = self
            .staged
            .next_if(|entry| stop.is_none_or(|stop| entry.name.as_bytes() < stop.as_bytes()))
        {
            let staged = staged_entry(entry)?;
            self.list
                .from_one_sided(DeltaStatus::Added, &staged, &entry.name)?;
        }

        Ok(())
    }

    fn visit_tree_entry(
        &mut self,
        root: &str,
        name: &str,
        entry: &DatabaseEntry,
    ) -> Result<(), DiffError> {
        // directories are walked into, never compared
        if entry.is_tree() {
            return Ok(());
        }

        let path = format!("{root}{name}");
        if entry.mode.is_gitlink() {
            return Err(DiffError::UnsupportedEntry {
                path,
                mode: entry.mode,
            });
        }

        self.flush_added(Some(&path))?;

        match self.staged.next_if(|staged| staged.name == path) {
            Some(staged) => {
                let staged = staged_entry(staged)?;
                if staged != *entry {
                    let mut scope = self.list.enter(&path)?;
                    scope.from_two_sided(Some(entry), Some(&staged), DeltaStatus::Modified)?;
                }
                Ok(())
            }
            None => self
                .list
                .from_one_sided(DeltaStatus::Deleted, entry, &path),
        }
    }
}

fn staged_entry(entry: &IndexEntry) -> Result<DatabaseEntry, DiffError> {
    let mode = entry.mode();
    if mode.is_gitlink() {
        return Err(DiffError::UnsupportedEntry {
            path: entry.name.clone(),
            mode,
        });
    }

    Ok(DatabaseEntry::new(entry.oid.clone(), mode))
}

impl<'r> DiffList<'r> {
    /// Compare a stored tree against the staged entries of the repository
    ///
    /// The tree is the old side and the staged entries are the new side.
    pub fn index_to_tree(
        repository: &'r Repository,
        old_tree: &ObjectId,
        options: DiffOptions,
    ) -> Result<Self, DiffError> {
        debug!(old = %old_tree, "diffing index to tree");

        let tree = repository.lookup_tree(old_tree)?;
        let index = repository.index().map_err(DiffError::Index)?;

        let mut list = DiffList::new(repository, options);
        let mut merger = IndexTreeMerger {
            list: &mut list,
            staged: index.entries().peekable(),
        };

        tree.walk_postorder(
            "",
            &|oid| repository.lookup_tree(oid),
            &mut |root, name, entry| merger.visit_tree_entry(root, name, entry),
        )?;
        merger.flush_added(None)?;

        debug!(deltas = list.len(), staged = index.len(), "index diff finished");
        Ok(list)
    }
}
