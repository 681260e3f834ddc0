//! Text forms of a diff
//!
//! Both printers stream through a [`DiffSink`], one tagged unit of text at a
//! time. Every unit ends with a newline; a file header may span several lines.
//! Units are raw bytes, since file content need not be UTF-8.

use crate::artifacts::diff::delta::DiffDelta;
use crate::artifacts::diff::diff_list::DiffList;
use crate::artifacts::diff::engine::{DiffRange, LineOrigin};
use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::{DiffOptions, Prefix};
use crate::artifacts::diff::patch::DiffVisitor;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

const NULL_PATH: &str = "/dev/null";
const NO_NEWLINE_MARKER: &[u8] = b"\\ No newline at end of file\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    FileHeader,
    HunkHeader,
    Binary,
    Addition,
    Deletion,
    Context,
}

impl From<LineOrigin> for LineKind {
    fn from(origin: LineOrigin) -> Self {
        match origin {
            LineOrigin::Context => LineKind::Context,
            LineOrigin::Addition => LineKind::Addition,
            LineOrigin::Deletion => LineKind::Deletion,
        }
    }
}

/// Destination of printed text
pub trait DiffSink {
    fn emit(&mut self, kind: LineKind, text: &[u8]) -> anyhow::Result<()>;
}

impl<F> DiffSink for F
where
    F: FnMut(LineKind, &[u8]) -> anyhow::Result<()>,
{
    fn emit(&mut self, kind: LineKind, text: &[u8]) -> anyhow::Result<()> {
        self(kind, text)
    }
}

/// Writes printed text to any writer, colorized per line kind when asked to
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    color: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, color: bool) -> Self {
        WriterSink { writer, color }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiffSink for WriterSink<W> {
    fn emit(&mut self, kind: LineKind, text: &[u8]) -> anyhow::Result<()> {
        if !self.color {
            self.writer.write_all(text)?;
            return Ok(());
        }

        for line in text.split_inclusive(|byte| *byte == b'\n') {
            let (content, newline) = match line.strip_suffix(b"\n") {
                Some(content) => (content, "\n"),
                None => (line, ""),
            };
            // colors need text; other bytes go out untouched
            let Ok(content) = std::str::from_utf8(content) else {
                self.writer.write_all(line)?;
                continue;
            };
            let content = match kind {
                LineKind::FileHeader | LineKind::Binary => content.bold(),
                LineKind::HunkHeader => content.cyan(),
                LineKind::Addition => content.green(),
                LineKind::Deletion => content.red(),
                LineKind::Context => content.normal(),
            };
            write!(self.writer, "{content}{newline}")?;
        }

        Ok(())
    }
}

fn emit(sink: &mut (impl DiffSink + ?Sized), kind: LineKind, text: &[u8]) -> Result<(), DiffError> {
    sink.emit(kind, text).map_err(DiffError::Formatting)
}

fn mode_suffix(mode: Option<EntryMode>) -> &'static str {
    match mode {
        Some(mode) if mode.is_executable() => "*",
        _ => "",
    }
}

/// One `<status>\t<path>` line per delta
pub struct CompactPrinter<'s, S: ?Sized> {
    sink: &'s mut S,
    buffer: Vec<u8>,
}

impl<'s, S: DiffSink + ?Sized> CompactPrinter<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        CompactPrinter {
            sink,
            buffer: Vec::new(),
        }
    }
}

impl<S: DiffSink + ?Sized> DiffVisitor for CompactPrinter<'_, S> {
    fn file(&mut self, delta: &DiffDelta) -> Result<(), DiffError> {
        let old_mode = delta.old_file().mode();
        let new_mode = delta.new_file().mode();
        let code = delta.status().as_char();
        let path = delta.path();

        self.buffer.clear();
        let written = if delta.is_renamed() {
            writeln!(
                self.buffer,
                "{code}\t{path}{} -> {}{}",
                mode_suffix(old_mode),
                delta.new_path(),
                mode_suffix(new_mode)
            )
        } else if let (Some(old), Some(new)) = (old_mode, new_mode)
            && old != new
        {
            writeln!(
                self.buffer,
                "{code}\t{path}{} ({old} -> {new})",
                mode_suffix(new_mode)
            )
        } else {
            writeln!(self.buffer, "{code}\t{path}{}", mode_suffix(new_mode.or(old_mode)))
        };
        written.map_err(|error| DiffError::Formatting(error.into()))?;

        emit(&mut *self.sink, LineKind::FileHeader, &self.buffer)
    }

    fn wants_content(&self) -> bool {
        false
    }
}

/// Unified patch text, the form `git diff` prints
pub struct PatchPrinter<'s, S: ?Sized> {
    sink: &'s mut S,
    buffer: Vec<u8>,
    src_prefix: Prefix,
    dst_prefix: Prefix,
}

impl<'s, S: DiffSink + ?Sized> PatchPrinter<'s, S> {
    pub fn new(sink: &'s mut S, options: &DiffOptions) -> Self {
        let (src_prefix, dst_prefix) = options.prefixes();

        PatchPrinter {
            sink,
            buffer: Vec::new(),
            src_prefix,
            dst_prefix,
        }
    }

    fn write_file_header(&mut self, delta: &DiffDelta) -> std::io::Result<()> {
        let old = delta.old_file();
        let new = delta.new_file();
        let (src, dst) = (&self.src_prefix, &self.dst_prefix);
        let buffer = &mut self.buffer;

        writeln!(buffer, "diff --git {src}{} {dst}{}", delta.path(), delta.new_path())?;

        match (old.mode(), new.mode()) {
            (None, Some(mode)) => writeln!(buffer, "new file mode {mode}")?,
            (Some(mode), None) => writeln!(buffer, "deleted file mode {mode}")?,
            (Some(old_mode), Some(new_mode)) if old_mode != new_mode => {
                writeln!(buffer, "old mode {old_mode}")?;
                writeln!(buffer, "new mode {new_mode}")?;
            }
            _ => {}
        }

        write!(
            buffer,
            "index {}..{}",
            ObjectId::short_or_null(old.oid()),
            ObjectId::short_or_null(new.oid())
        )?;
        match (old.mode(), new.mode()) {
            (Some(old_mode), Some(new_mode)) if old_mode == new_mode => writeln!(buffer, " {old_mode}")?,
            _ => writeln!(buffer)?,
        }

        if delta.is_binary() {
            return Ok(());
        }

        let old_side = side_path(src, delta.path(), old.is_present());
        let new_side = side_path(dst, delta.new_path(), new.is_present());
        writeln!(buffer, "--- {old_side}")?;
        writeln!(buffer, "+++ {new_side}")
    }
}

fn side_path(prefix: &str, path: &str, present: bool) -> String {
    if present {
        format!("{prefix}{path}")
    } else {
        NULL_PATH.to_string()
    }
}

impl<S: DiffSink + ?Sized> DiffVisitor for PatchPrinter<'_, S> {
    fn file(&mut self, delta: &DiffDelta) -> Result<(), DiffError> {
        self.buffer.clear();
        self.write_file_header(delta)
            .map_err(|error| DiffError::Formatting(error.into()))?;
        emit(&mut *self.sink, LineKind::FileHeader, &self.buffer)?;

        if !delta.is_binary() {
            return Ok(());
        }

        let old_side = side_path(&self.src_prefix, delta.path(), delta.old_file().is_present());
        let new_side = side_path(&self.dst_prefix, delta.new_path(), delta.new_file().is_present());
        self.buffer.clear();
        writeln!(self.buffer, "Binary files {old_side} and {new_side} differ")
            .map_err(|error| DiffError::Formatting(error.into()))?;
        emit(&mut *self.sink, LineKind::Binary, &self.buffer)
    }

    fn hunk(&mut self, _delta: &DiffDelta, _range: &DiffRange, header: &str) -> Result<(), DiffError> {
        emit(&mut *self.sink, LineKind::HunkHeader, header.as_bytes())
    }

    fn line(&mut self, _delta: &DiffDelta, origin: LineOrigin, content: &[u8]) -> Result<(), DiffError> {
        self.buffer.clear();
        self.buffer.push(origin.as_byte());
        self.buffer.extend_from_slice(content);
        if !content.ends_with(b"\n") {
            self.buffer.push(b'\n');
            self.buffer.extend_from_slice(NO_NEWLINE_MARKER);
        }

        emit(&mut *self.sink, LineKind::from(origin), &self.buffer)
    }
}

impl DiffList<'_> {
    /// Print one status line per delta
    pub fn print_compact<S>(&mut self, sink: &mut S) -> Result<(), DiffError>
    where
        S: DiffSink + ?Sized,
    {
        self.for_each(&mut CompactPrinter::new(sink))
    }

    /// Print every delta as a unified patch
    pub fn print_patch<S>(&mut self, sink: &mut S) -> Result<(), DiffError>
    where
        S: DiffSink + ?Sized,
    {
        let mut printer = PatchPrinter::new(sink, &self.options);
        self.for_each(&mut printer)
    }
}
