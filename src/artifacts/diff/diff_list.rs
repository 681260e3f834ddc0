//! The ordered result of a comparison
//!
//! Deltas are appended in walk order, which is git tree order of the full
//! path. While a walk is running the list also owns the shared path buffer
//! that names the entry being visited. Each directory level borrows the list
//! through a [`PrefixScope`], which appends one segment and restores the
//! buffer when it goes out of scope, on success and error paths alike.

use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::delta::{DeltaStatus, DiffDelta, DiffFile};
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::DiffOptions;
use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut};
use tracing::debug;

#[derive(Debug)]
pub struct DiffList<'r> {
    pub(crate) repository: &'r Repository,
    pub(crate) options: DiffOptions,
    pub(crate) deltas: Vec<DiffDelta>,
    prefix: String,
}

impl<'r> DiffList<'r> {
    pub(crate) fn new(repository: &'r Repository, options: DiffOptions) -> Self {
        DiffList {
            repository,
            options,
            deltas: Vec::new(),
            prefix: String::new(),
        }
    }

    pub fn repository(&self) -> &'r Repository {
        self.repository
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn deltas(&self) -> &[DiffDelta] {
        &self.deltas
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffDelta> {
        self.deltas.iter()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Path of the entry currently being visited
    pub(crate) fn current_path(&self) -> &str {
        &self.prefix
    }

    /// Append `segment` to the path buffer for the lifetime of the guard
    ///
    /// Separators at either end of the segment are dropped, so a walk root
    /// such as `dir/sub/` joins the same way as a plain name. An empty
    /// segment leaves the buffer unchanged.
    pub(crate) fn enter(&mut self, segment: &str) -> Result<PrefixScope<'_, 'r>, DiffError> {
        let saved_len = self.prefix.len();
        push_segment(&mut self.prefix, segment)?;

        Ok(PrefixScope {
            list: self,
            saved_len,
        })
    }

    /// Record a path that exists on one side only
    ///
    /// Under REVERSE the status flips, so the entry lands on the other side.
    pub(crate) fn from_one_sided(
        &mut self,
        status: DeltaStatus,
        entry: &DatabaseEntry,
        path: &str,
    ) -> Result<(), DiffError> {
        let delta = self.one_sided_delta(status, entry, path)?;
        self.append(delta)
    }

    /// Same as [`DiffList::from_one_sided`], named by the current path buffer
    pub(crate) fn from_one_sided_here(
        &mut self,
        status: DeltaStatus,
        entry: &DatabaseEntry,
    ) -> Result<(), DiffError> {
        let delta = self.one_sided_delta(status, entry, &self.prefix)?;
        self.append(delta)
    }

    /// Record a path present on both sides, named by the current path buffer
    ///
    /// Either side may still be missing when the caller reports an addition
    /// or deletion through this route. Under REVERSE the sides and the status
    /// are swapped.
    pub(crate) fn from_two_sided(
        &mut self,
        old: Option<&DatabaseEntry>,
        new: Option<&DatabaseEntry>,
        status: DeltaStatus,
    ) -> Result<(), DiffError> {
        let path = copy_path(&self.prefix)?;
        let (old, new, status) = if self.options.is_reversed() {
            (new, old, status.reversed())
        } else {
            (old, new, status)
        };

        let delta = DiffDelta::new(path, status, diff_file(old), diff_file(new));
        self.append(delta)
    }

    fn one_sided_delta(
        &self,
        status: DeltaStatus,
        entry: &DatabaseEntry,
        path: &str,
    ) -> Result<DiffDelta, DiffError> {
        let status = if self.options.is_reversed() {
            status.reversed()
        } else {
            status
        };
        let side = DiffFile::new(entry.mode, entry.oid.clone());

        let (old_file, new_file) = match status {
            DeltaStatus::Added => (DiffFile::absent(), side),
            DeltaStatus::Deleted | DeltaStatus::Modified => (side, DiffFile::absent()),
        };

        Ok(DiffDelta::new(copy_path(path)?, status, old_file, new_file))
    }

    fn append(&mut self, delta: DiffDelta) -> Result<(), DiffError> {
        #[cfg(test)]
        reservation_budget::spend()?;
        self.deltas.try_reserve(1)?;
        debug!(
            path = delta.path(),
            status = %delta.status().as_char(),
            "recorded delta"
        );
        self.deltas.push(delta);
        Ok(())
    }
}

impl<'a, 'r> IntoIterator for &'a DiffList<'r> {
    type Item = &'a DiffDelta;
    type IntoIter = std::slice::Iter<'a, DiffDelta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

/// Exclusive borrow of a [`DiffList`] with one extra path segment pushed
pub(crate) struct PrefixScope<'a, 'r> {
    list: &'a mut DiffList<'r>,
    saved_len: usize,
}

impl<'r> Deref for PrefixScope<'_, 'r> {
    type Target = DiffList<'r>;

    fn deref(&self) -> &Self::Target {
        self.list
    }
}

impl DerefMut for PrefixScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.list
    }
}

impl Drop for PrefixScope<'_, '_> {
    fn drop(&mut self) {
        self.list.prefix.truncate(self.saved_len);
    }
}

fn push_segment(buffer: &mut String, segment: &str) -> Result<(), TryReserveError> {
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        return Ok(());
    }

    let separator = !buffer.is_empty() && !buffer.ends_with('/');
    buffer.try_reserve(segment.len() + usize::from(separator))?;
    if separator {
        buffer.push('/');
    }
    buffer.push_str(segment);

    Ok(())
}

fn copy_path(path: &str) -> Result<String, TryReserveError> {
    #[cfg(test)]
    reservation_budget::spend()?;
    let mut copy = String::new();
    copy.try_reserve_exact(path.len())?;
    copy.push_str(path);
    Ok(copy)
}


fn diff_file(entry: Option<&DatabaseEntry>) -> DiffFile {
    entry
        .map(|entry| DiffFile::new(entry.mode, entry.oid.clone()))
        .unwrap_or_default()
}
