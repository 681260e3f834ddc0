//! Rendering deltas into file, hunk and line events
//!
//! Content is loaded only while a delta is being rendered and released right
//! after, so a large list never holds more than one pair of blobs.

use crate::areas::repository::Repository;
use crate::artifacts::diff::binary::is_binary;
use crate::artifacts::diff::delta::{BinaryState, DeltaStatus, DiffDelta, DiffFile};
use crate::artifacts::diff::diff_list::DiffList;
use crate::artifacts::diff::engine::{
    DiffRange, EngineConfig, EngineOutput, LineEngine, LineOrigin, MyersEngine,
};
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::{DiffFlags, DiffOptions};
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use tracing::{debug, trace};

/// Receiver of rendering events
///
/// `file` is called once per rendered delta, followed by the hunks and lines
/// of that delta unless it is binary. Returning an error stops rendering.
pub trait DiffVisitor {
    fn file(&mut self, delta: &DiffDelta) -> Result<(), DiffError>;

    fn hunk(&mut self, _delta: &DiffDelta, _range: &DiffRange, _header: &str) -> Result<(), DiffError> {
        Ok(())
    }

    fn line(&mut self, _delta: &DiffDelta, _origin: LineOrigin, _content: &[u8]) -> Result<(), DiffError> {
        Ok(())
    }

    /// Visitors that only look at file events skip content loading entirely
    fn wants_content(&self) -> bool {
        true
    }
}

/// Forwards engine events for one delta to a visitor
struct DeltaOutput<'a, V: ?Sized> {
    delta: &'a DiffDelta,
    visitor: &'a mut V,
}

impl<V: DiffVisitor + ?Sized> EngineOutput for DeltaOutput<'_, V> {
    fn hunk(&mut self, range: &DiffRange, header: &str) -> Result<(), DiffError> {
        self.visitor.hunk(self.delta, range, header)
    }

    fn line(&mut self, origin: LineOrigin, content: &[u8]) -> Result<(), DiffError> {
        self.visitor.line(self.delta, origin, content)
    }
}

impl DiffList<'_> {
    /// Render every delta accepted by the pathspec with the default engine
    pub fn for_each<V>(&mut self, visitor: &mut V) -> Result<(), DiffError>
    where
        V: DiffVisitor + ?Sized,
    {
        self.for_each_with(&MyersEngine, visitor)
    }

    pub fn for_each_with<V>(&mut self, engine: &dyn LineEngine, visitor: &mut V) -> Result<(), DiffError>
    where
        V: DiffVisitor + ?Sized,
    {
        let repository = self.repository;
        let config = EngineConfig::from(&self.options);
        let force_text = self.options.flags().contains(DiffFlags::FORCE_TEXT);

        for delta in self.deltas.iter_mut() {
            if !self.options.pathspec().matches(delta.path()) {
                trace!(path = delta.path(), "skipped by pathspec");
                continue;
            }

            if !visitor.wants_content() {
                visitor.file(delta)?;
                continue;
            }

            let rendered = load_content(repository, delta, force_text)
                .and_then(|()| render_delta(&*delta, engine, &config, visitor));
            delta.release_content();
            rendered?;
        }

        Ok(())
    }
}

fn load_content(repository: &Repository, delta: &mut DiffDelta, force_text: bool) -> Result<(), DiffError> {
    delta.old_file.blob = Some(load_side(repository, &delta.old_file)?);
    delta.new_file.blob = Some(load_side(repository, &delta.new_file)?);

    delta.binary = if !force_text
        && (is_binary(delta.old_file.content()) || is_binary(delta.new_file.content()))
    {
        BinaryState::Binary
    } else {
        BinaryState::Text
    };
    debug!(path = delta.path(), binary = ?delta.binary, "loaded delta content");

    Ok(())
}

/// Content of one side; an absent side is empty and never looked up
fn load_side(repository: &Repository, file: &DiffFile) -> Result<Blob, DiffError> {
    match (file.mode, &file.oid) {
        (Some(EntryMode::Gitlink), Some(oid)) => Ok(Blob::new(format!("Subproject commit {oid}\n"))),
        (_, Some(oid)) => repository.lookup_blob(oid),
        (_, None) => Ok(Blob::default()),
    }
}

fn render_delta<V>(
    delta: &DiffDelta,
    engine: &dyn LineEngine,
    config: &EngineConfig,
    visitor: &mut V,
) -> Result<(), DiffError>
where
    V: DiffVisitor + ?Sized,
{
    visitor.file(delta)?;

    if delta.is_binary() {
        return Ok(());
    }

    engine.diff(
        delta.old_file.content(),
        delta.new_file.content(),
        config,
        &mut DeltaOutput { delta, visitor },
    )
}

/// Diff two blobs directly, reporting only hunk and line events
///
/// No delta construction has polarized the sides here, so REVERSE swaps the
/// buffers right before they reach the engine. Either side may be absent.
pub fn diff_blobs<V>(
    repository: &Repository,
    old_blob: Option<&ObjectId>,
    new_blob: Option<&ObjectId>,
    options: &DiffOptions,
    visitor: &mut V,
) -> Result<(), DiffError>
where
    V: DiffVisitor + ?Sized,
{
    let (old_blob, new_blob) = if options.is_reversed() {
        (new_blob, old_blob)
    } else {
        (old_blob, new_blob)
    };

    let status = match (old_blob, new_blob) {
        (None, Some(_)) => DeltaStatus::Added,
        (Some(_), None) => DeltaStatus::Deleted,
        _ => DeltaStatus::Modified,
    };
    let mut delta = DiffDelta::new(String::new(), status, blob_side(old_blob), blob_side(new_blob));
    load_content(repository, &mut delta, options.flags().contains(DiffFlags::FORCE_TEXT))?;

    if delta.is_binary() {
        debug!("blobs are binary, no hunks to report");
        return Ok(());
    }

    let delta = &delta;
    MyersEngine.diff(
        delta.old_file.content(),
        delta.new_file.content(),
        &EngineConfig::from(options),
        &mut DeltaOutput { delta, visitor },
    )
}

fn blob_side(oid: Option<&ObjectId>) -> DiffFile {
    oid.map(|oid| DiffFile::new(EntryMode::File(FileMode::Regular), oid.clone()))
        .unwrap_or_default()
}
