//! Line-level comparison of two buffers
//!
//! The engine splits both sides into lines, computes a shortest edit script
//! with Myers' algorithm and groups the edits into hunks surrounded by
//! context. Output is pushed through [`EngineOutput`] one hunk header or line
//! at a time.

use crate::artifacts::diff::error::DiffError;
use crate::artifacts::diff::options::{DiffOptions, WhitespaceMode};
use similar::{Algorithm, DiffOp};
use std::borrow::Cow;
use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Context,
    Addition,
    Deletion,
}

impl LineOrigin {
    pub fn as_char(self) -> char {
        match self {
            LineOrigin::Context => ' ',
            LineOrigin::Addition => '+',
            LineOrigin::Deletion => '-',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

/// Line ranges covered by one hunk, numbered the way hunk headers show them
///
/// A range with no lines starts at the line before it, which is 0 at the top
/// of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRange {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
}

impl DiffRange {
    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@\n",
            format_range(self.old_start, self.old_lines),
            format_range(self.new_start, self.new_lines)
        )
    }
}

fn format_range(start: usize, lines: usize) -> String {
    if lines == 1 {
        start.to_string()
    } else {
        format!("{start},{lines}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub context_lines: usize,
    pub interhunk_lines: usize,
    pub whitespace: WhitespaceMode,
}

impl From<&DiffOptions> for EngineConfig {
    fn from(options: &DiffOptions) -> Self {
        EngineConfig {
            context_lines: options.context_lines(),
            interhunk_lines: options.interhunk_lines(),
            whitespace: options.whitespace_mode(),
        }
    }
}

/// Receiver of engine events, in output order
pub trait EngineOutput {
    fn hunk(&mut self, range: &DiffRange, header: &str) -> Result<(), DiffError>;
    fn line(&mut self, origin: LineOrigin, content: &[u8]) -> Result<(), DiffError>;
}

pub trait LineEngine {
    fn diff(
        &self,
        old: &[u8],
        new: &[u8],
        config: &EngineConfig,
        output: &mut dyn EngineOutput,
    ) -> Result<(), DiffError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MyersEngine;

impl LineEngine for MyersEngine {
    fn diff(
        &self,
        old: &[u8],
        new: &[u8],
        config: &EngineConfig,
        output: &mut dyn EngineOutput,
    ) -> Result<(), DiffError> {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);

        let old_keys = line_keys(&old_lines, config.whitespace);
        let new_keys = line_keys(&new_lines, config.whitespace);
        let edits = edit_script(&old_keys, &new_keys)?;

        let positions = edit_positions(&edits);
        for hunk in group_hunks(&edits, config) {
            let (old_start, new_start) = positions[hunk.start];
            let range = hunk_range(&edits[hunk.clone()], old_start, new_start);
            output.hunk(&range, &range.header())?;

            for edit in &edits[hunk] {
                match *edit {
                    Edit::Equal { old, .. } => output.line(LineOrigin::Context, old_lines[old])?,
                    Edit::Delete { old } => output.line(LineOrigin::Deletion, old_lines[old])?,
                    Edit::Insert { new } => output.line(LineOrigin::Addition, new_lines[new])?,
                }
            }
        }

        Ok(())
    }
}

/// Lines keep their terminator; a last line without one is still a line
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    data.split_inclusive(|byte| *byte == b'\n').collect()
}

fn line_keys<'d>(lines: &[&'d [u8]], whitespace: WhitespaceMode) -> Vec<Cow<'d, [u8]>> {
    lines.iter().map(|&line| line_key(line, whitespace)).collect()
}

/// The part of a line that takes part in comparisons
fn line_key(line: &[u8], whitespace: WhitespaceMode) -> Cow<'_, [u8]> {
    match whitespace {
        WhitespaceMode::None => Cow::Borrowed(line),
        WhitespaceMode::IgnoreAtEol => Cow::Borrowed(line.trim_ascii_end()),
        WhitespaceMode::IgnoreAll => Cow::Owned(
            line.iter()
                .copied()
                .filter(|byte| !byte.is_ascii_whitespace())
                .collect(),
        ),
        WhitespaceMode::IgnoreChange => {
            let mut key = Vec::with_capacity(line.len());
            let mut in_space = false;
            for &byte in line.trim_ascii_end() {
                if byte.is_ascii_whitespace() {
                    in_space = true;
                    continue;
                }
                if in_space {
                    key.push(b' ');
                    in_space = false;
                }
                key.push(byte);
            }
            Cow::Owned(key)
        }
    }
}

/// Old and new line index in front of every edit
fn edit_positions(edits: &[Edit]) -> Vec<(usize, usize)> {
    let mut positions = Vec::with_capacity(edits.len());
    let (mut old, mut new) = (0, 0);

    for edit in edits {
        positions.push((old, new));
        match edit {
            Edit::Equal { .. } => {
                old += 1;
                new += 1;
            }
            Edit::Delete { .. } => old += 1,
            Edit::Insert { .. } => new += 1,
        }
    }

    positions
}

/// Ranges of the edit script that make up each hunk, context included
///
/// Two changes end up in the same hunk when at most
/// `2 * context_lines + interhunk_lines` unchanged lines separate them.
fn group_hunks(edits: &[Edit], config: &EngineConfig) -> Vec<Range<usize>> {
    let max_gap = 2 * config.context_lines + config.interhunk_lines;
    let mut groups: Vec<(usize, usize)> = Vec::new();

    for (index, edit) in edits.iter().enumerate() {
        if matches!(edit, Edit::Equal { .. }) {
            continue;
        }

        match groups.last_mut() {
            Some((_, last)) if index - *last - 1 <= max_gap => *last = index,
            _ => groups.push((index, index)),
        }
    }

    groups
        .into_iter()
        .map(|(first, last)| {
            let start = first.saturating_sub(config.context_lines);
            let end = (last + config.context_lines + 1).min(edits.len());
            start..end
        })
        .collect()
}

fn hunk_range(edits: &[Edit], old_offset: usize, new_offset: usize) -> DiffRange {
    let old_lines = edits
        .iter()
        .filter(|edit| !matches!(edit, Edit::Insert { .. }))
        .count();
    let new_lines = edits
        .iter()
        .filter(|edit| !matches!(edit, Edit::Delete { .. }))
        .count();

    DiffRange {
        old_start: if old_lines == 0 { old_offset } else { old_offset + 1 },
        old_lines,
        new_start: if new_lines == 0 { new_offset } else { new_offset + 1 },
        new_lines,
    }
}

/// One step of an edit script, as line indices into either side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Delete { old: usize },
    Insert { new: usize },
    Equal { old: usize, new: usize },
}

/// Shortest edit script between two sequences of line keys
///
/// Lines that appear only on one side can never be matched, so they are left
/// out before the Myers search runs and come back as plain deletions or
/// insertions. Between two matched lines deletions come first.
fn edit_script<T: Eq + Hash + Ord>(old: &[T], new: &[T]) -> Result<Vec<Edit>, DiffError> {
    let old_kept = matchable(old, new);
    let new_kept = matchable(new, old);
    let old_keys = old_kept.iter().map(|&index| &old[index]).collect::<Vec<_>>();
    let new_keys = new_kept.iter().map(|&index| &new[index]).collect::<Vec<_>>();

    let mut edits = Vec::new();
    edits.try_reserve_exact(old.len() + new.len())?;
    let mut cursor = (0, 0);

    for op in similar::capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys) {
        let DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        else {
            continue;
        };

        for offset in 0..len {
            let (old, new) = (old_kept[old_index + offset], new_kept[new_index + offset]);
            fill_gap(&mut edits, &mut cursor, old, new);
            edits.push(Edit::Equal { old, new });
            cursor = (old + 1, new + 1);
        }
    }
    fill_gap(&mut edits, &mut cursor, old.len(), new.len());

    Ok(edits)
}

/// Indices of the `side` lines that also occur somewhere in `other`
fn matchable<T: Eq + Hash>(side: &[T], other: &[T]) -> Vec<usize> {
    let other = other.iter().collect::<HashSet<_>>();

    side.iter()
        .enumerate()
        .filter(|(_, key)| other.contains(key))
        .map(|(index, _)| index)
        .collect()
}

fn fill_gap(edits: &mut Vec<Edit>, cursor: &mut (usize, usize), old: usize, new: usize) {
    edits.extend((cursor.0..old).map(|old| Edit::Delete { old }));
    edits.extend((cursor.1..new).map(|new| Edit::Insert { new }));
    *cursor = (old, new);
}
