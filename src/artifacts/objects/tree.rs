//! Git tree object
//!
//! Trees represent directory snapshots in Git. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! Entries are kept in git tree order: a directory name sorts as if it ended
//! with `/`. This is the same order in which the index stores full paths, so
//! a tree walk and an index scan advance in lockstep.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
enum TreeNode {
    /// Entry that already has an object id (read from the database, or a
    /// file while building)
    Stored(DatabaseEntry),
    /// Directory being built from index entries
    Pending(Tree),
}

impl TreeNode {
    fn mode(&self) -> EntryMode {
        match self {
            TreeNode::Stored(entry) => entry.mode,
            TreeNode::Pending(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeNode::Stored(entry) => Ok(entry.oid.clone()),
            TreeNode::Pending(tree) => tree.object_id(),
        }
    }
}

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Keyed by entry name, with directories suffixed by `/`
    entries: BTreeMap<String, TreeNode>,
}

fn sort_key(name: &str, mode: EntryMode) -> String {
    if mode.is_tree() {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

fn entry_name(key: &str) -> &str {
    key.strip_suffix('/').unwrap_or(key)
}

impl Tree {
    /// Build a tree hierarchy from a flat list of index entries
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let components = entry.name.split('/').collect::<Vec<_>>();
            root.add_entry(&components, entry)?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, components: &[&str], entry: &IndexEntry) -> anyhow::Result<()> {
        match components {
            [] => Err(anyhow::anyhow!("Empty index entry path")),
            [name] => {
                let mode = entry.metadata.mode;
                self.entries.insert(
                    sort_key(name, mode),
                    TreeNode::Stored(DatabaseEntry::new(entry.oid.clone(), mode)),
                );
                Ok(())
            }
            [parent, rest @ ..] => {
                let key = sort_key(parent, EntryMode::Directory);
                let node = self
                    .entries
                    .entry(key)
                    .or_insert_with(|| TreeNode::Pending(Tree::default()));

                match node {
                    TreeNode::Pending(tree) => tree.add_entry(rest, entry),
                    TreeNode::Stored(_) => Err(anyhow::anyhow!(
                        "Directory {parent} already recorded as an object"
                    )),
                }
            }
        }
    }

    /// Record an entry whose object is already stored, replacing any entry
    /// of the same name and kind
    pub fn insert(&mut self, name: &str, entry: DatabaseEntry) {
        self.entries
            .insert(sort_key(name, entry.mode), TreeNode::Stored(entry));
    }

    /// Visit every pending subtree before its parent, ending with `self`
    ///
    /// Child ids must be known before a parent can be stored.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for node in self.entries.values() {
            if let TreeNode::Pending(tree) = node {
                tree.traverse(func)?;
            }
        }
        func(self)
    }

    /// Entries of a tree read from the database, in git tree order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DatabaseEntry)> {
        self.entries.iter().filter_map(|(key, node)| match node {
            TreeNode::Stored(entry) => Some((entry_name(key), entry)),
            TreeNode::Pending(_) => None,
        })
    }

    /// Entries keyed the way they sort, with directories suffixed by `/`
    pub fn sorted_entries(&self) -> impl Iterator<Item = (&str, &DatabaseEntry)> {
        self.entries.iter().filter_map(|(key, node)| match node {
            TreeNode::Stored(entry) => Some((key.as_str(), entry)),
            TreeNode::Pending(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk every entry below this tree, children before their directory
    ///
    /// `root` is the path of this tree relative to the walk's start, either
    /// empty or ending with `/`. The visitor receives `(root, name, entry)`.
    /// Subtrees are resolved through `load`; the first error from either
    /// closure stops the walk.
    pub fn walk_postorder<E, L, V>(&self, root: &str, load: &L, visitor: &mut V) -> Result<(), E>
    where
        L: Fn(&ObjectId) -> Result<Tree, E>,
        V: FnMut(&str, &str, &DatabaseEntry) -> Result<(), E>,
    {
        for (name, entry) in self.entries() {
            if entry.is_tree() {
                let subtree = load(&entry.oid)?;
                let subroot = format!("{root}{name}/");
                subtree.walk_postorder(&subroot, load, visitor)?;
            }
            visitor(root, name, entry)?;
        }

        Ok(())
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (key, node) in &self.entries {
            let header = format!("{:o} {}", node.mode().as_u32(), entry_name(key));
            content.write_all(header.as_bytes())?;
            content.push(0);
            node.oid()?.write_h40_to(&mut content)?;
        }

        Ok(with_header(self.object_type(), &content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }

            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            let name = std::str::from_utf8(&name_bytes)?;

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(
                sort_key(name, mode),
                TreeNode::Stored(DatabaseEntry::new(oid, mode)),
            );
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
