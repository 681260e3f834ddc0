use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaStatus {
    Added,
    Deleted,
    Modified,
}

impl DeltaStatus {
    /// The status seen from the other side of the comparison
    pub fn reversed(self) -> Self {
        match self {
            DeltaStatus::Added => DeltaStatus::Deleted,
            DeltaStatus::Deleted => DeltaStatus::Added,
            DeltaStatus::Modified => DeltaStatus::Modified,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            DeltaStatus::Added => 'A',
            DeltaStatus::Deleted => 'D',
            DeltaStatus::Modified => 'M',
        }
    }
}

/// Result of the binary check, decided once content is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryState {
    #[default]
    Unknown,
    Text,
    Binary,
}

/// One side of a delta
///
/// An absent side (the old side of an addition, the new side of a deletion)
/// has neither mode nor id. Content is only held while the delta is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffFile {
    pub(crate) mode: Option<EntryMode>,
    pub(crate) oid: Option<ObjectId>,
    pub(crate) blob: Option<Blob>,
}

impl DiffFile {
    pub(crate) fn new(mode: EntryMode, oid: ObjectId) -> Self {
        DiffFile {
            mode: Some(mode),
            oid: Some(oid),
            blob: None,
        }
    }

    pub(crate) fn absent() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<EntryMode> {
        self.mode
    }

    pub fn oid(&self) -> Option<&ObjectId> {
        self.oid.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.oid.is_some()
    }

    pub fn content(&self) -> &[u8] {
        self.blob.as_ref().map(Blob::content).unwrap_or_default()
    }
}

/// One changed path between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDelta {
    pub(crate) path: String,
    pub(crate) rename_target: Option<String>,
    pub(crate) status: DeltaStatus,
    pub(crate) old_file: DiffFile,
    pub(crate) new_file: DiffFile,
    pub(crate) binary: BinaryState,
}

impl DiffDelta {
    pub(crate) fn new(path: String, status: DeltaStatus, old_file: DiffFile, new_file: DiffFile) -> Self {
        DiffDelta {
            path,
            rename_target: None,
            status,
            old_file,
            new_file,
            binary: BinaryState::Unknown,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path on the new side; differs from [`DiffDelta::path`] only for renames
    pub fn new_path(&self) -> &str {
        self.rename_target.as_deref().unwrap_or(&self.path)
    }

    pub fn is_renamed(&self) -> bool {
        self.rename_target.is_some()
    }

    pub fn status(&self) -> DeltaStatus {
        self.status
    }

    pub fn old_file(&self) -> &DiffFile {
        &self.old_file
    }

    pub fn new_file(&self) -> &DiffFile {
        &self.new_file
    }

    pub fn binary(&self) -> BinaryState {
        self.binary
    }

    pub fn is_binary(&self) -> bool {
        self.binary == BinaryState::Binary
    }

    pub fn has_mode_change(&self) -> bool {
        matches!(
            (self.old_file.mode, self.new_file.mode),
            (Some(old), Some(new)) if old != new
        )
    }

    /// Present this delta as a rename to `target`
    ///
    /// The core never detects renames; callers that do can mark them here.
    pub fn renamed_to(mut self, target: impl Into<String>) -> Self {
        self.rename_target = Some(target.into());
        self
    }

    pub(crate) fn release_content(&mut self) {
        self.old_file.blob = None;
        self.new_file.blob = None;
    }
}
