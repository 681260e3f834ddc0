use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::artifacts::diff::diff_list::DiffList;
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::DiffOptions;
use crate::artifacts::diff::patch::{self, DiffVisitor};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::path::Path;

const GIT_DIR: &str = ".git";

/// Storage collaborators of the diff core: the object database and the
/// staged entry set of one repository
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    database: Database,
    index_path: Box<Path>,
}

impl Repository {
    /// Open an existing repository rooted at `path`
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve repository path {}", path.display()))?;
        let git_dir = path.join(GIT_DIR);

        if !git_dir.is_dir() {
            anyhow::bail!("Not a git repository: {}", path.display());
        }

        Ok(Self::at(&path))
    }

    /// Create the `.git/objects` layout under `path` and open it
    pub fn init(path: &Path) -> anyhow::Result<Self> {
        let objects = path.join(GIT_DIR).join("objects");
        std::fs::create_dir_all(&objects)
            .with_context(|| format!("Unable to create {}", objects.display()))?;

        Self::open(path)
    }

    fn at(path: &Path) -> Self {
        let git_dir = path.join(GIT_DIR);

        Repository {
            path: path.to_path_buf().into_boxed_path(),
            database: Database::new(git_dir.join("objects").into_boxed_path()),
            index_path: git_dir.join("index").into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// A freshly loaded copy of the staged entry set
    pub fn index(&self) -> anyhow::Result<Index> {
        let mut index = Index::new(self.index_path.clone());
        index.rehydrate()?;
        Ok(index)
    }

    /// An empty index bound to this repository's index file, for staging
    pub fn empty_index(&self) -> Index {
        Index::new(self.index_path.clone())
    }

    /// Resolve a full or abbreviated id, peeling commits to their tree
    pub fn resolve_tree(&self, revision: &str) -> anyhow::Result<ObjectId> {
        let oid = self.resolve_object(revision)?;
        self.database.peel_to_tree(&oid)
    }

    /// Resolve a full or abbreviated id to exactly one object
    pub fn resolve_object(&self, revision: &str) -> anyhow::Result<ObjectId> {
        let mut candidates = self.database.find_objects_by_prefix(revision)?;

        match candidates.len() {
            0 => anyhow::bail!("Unknown revision {revision}"),
            1 => Ok(candidates.remove(0)),
            _ => anyhow::bail!(
                "Short object ID {revision} is ambiguous: {}",
                candidates
                    .iter()
                    .map(|oid| oid.to_short_oid())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    pub(crate) fn lookup_tree(&self, oid: &ObjectId) -> Result<Tree, DiffError> {
        self.database
            .parse_object_as_tree(oid)
            .map_err(|source| DiffError::lookup(oid, source))?
            .ok_or_else(|| DiffError::InvalidObject {
                oid: oid.clone(),
                expected: "tree",
            })
    }

    pub(crate) fn lookup_blob(&self, oid: &ObjectId) -> Result<Blob, DiffError> {
        self.database
            .parse_object_as_blob(oid)
            .map_err(|source| DiffError::lookup(oid, source))?
            .ok_or_else(|| DiffError::InvalidObject {
                oid: oid.clone(),
                expected: "blob",
            })
    }

    pub fn diff_tree_to_tree(
        &self,
        old_tree: &ObjectId,
        new_tree: &ObjectId,
        options: DiffOptions,
    ) -> Result<DiffList<'_>, DiffError> {
        DiffList::tree_to_tree(self, old_tree, new_tree, options)
    }

    pub fn diff_index_to_tree(
        &self,
        old_tree: &ObjectId,
        options: DiffOptions,
    ) -> Result<DiffList<'_>, DiffError> {
        DiffList::index_to_tree(self, old_tree, options)
    }

    pub fn diff_blobs(
        &self,
        old_blob: Option<&ObjectId>,
        new_blob: Option<&ObjectId>,
        options: &DiffOptions,
        visitor: &mut impl DiffVisitor,
    ) -> Result<(), DiffError> {
        patch::diff_blobs(self, old_blob, new_blob, options, visitor)
    }
}
