//! Options shared by every stage of a comparison
//!
//! A [`DiffOptions`] value is immutable once built. Building normalizes the
//! path prefixes and, for reversed comparisons, swaps them, so consumers never
//! need to look at the REVERSE flag to decide which prefix goes where.

use crate::artifacts::diff::pathspec::Pathspec;
use bitflags::bitflags;
use std::borrow::Cow;

pub const DEFAULT_SRC_PREFIX: &str = "a/";
pub const DEFAULT_DST_PREFIX: &str = "b/";
pub const DEFAULT_CONTEXT_LINES: usize = 3;
pub const DEFAULT_INTERHUNK_LINES: usize = 3;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DiffFlags: u32 {
        const REVERSE = 1 << 0;
        const FORCE_TEXT = 1 << 1;
        const IGNORE_WHITESPACE = 1 << 2;
        const IGNORE_WHITESPACE_CHANGE = 1 << 3;
        const IGNORE_WHITESPACE_EOL = 1 << 4;
    }
}

/// How the line engine compares lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceMode {
    #[default]
    None,
    IgnoreAll,
    IgnoreChange,
    IgnoreAtEol,
}

impl From<DiffFlags> for WhitespaceMode {
    /// The broadest requested mode wins when several flags are set
    fn from(flags: DiffFlags) -> Self {
        if flags.contains(DiffFlags::IGNORE_WHITESPACE) {
            WhitespaceMode::IgnoreAll
        } else if flags.contains(DiffFlags::IGNORE_WHITESPACE_CHANGE) {
            WhitespaceMode::IgnoreChange
        } else if flags.contains(DiffFlags::IGNORE_WHITESPACE_EOL) {
            WhitespaceMode::IgnoreAtEol
        } else {
            WhitespaceMode::None
        }
    }
}

/// Either one of the static defaults or a caller-supplied prefix
pub type Prefix = Cow<'static, str>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    flags: DiffFlags,
    context_lines: usize,
    interhunk_lines: usize,
    src_prefix: Prefix,
    dst_prefix: Prefix,
    pathspec: Pathspec,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions::builder().build()
    }
}

impl DiffOptions {
    pub fn builder() -> DiffOptionsBuilder {
        DiffOptionsBuilder::default()
    }

    pub fn flags(&self) -> DiffFlags {
        self.flags
    }

    pub fn is_reversed(&self) -> bool {
        self.flags.contains(DiffFlags::REVERSE)
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    pub fn interhunk_lines(&self) -> usize {
        self.interhunk_lines
    }

    pub fn src_prefix(&self) -> &str {
        &self.src_prefix
    }

    pub fn dst_prefix(&self) -> &str {
        &self.dst_prefix
    }

    pub(crate) fn prefixes(&self) -> (Prefix, Prefix) {
        (self.src_prefix.clone(), self.dst_prefix.clone())
    }

    pub fn pathspec(&self) -> &Pathspec {
        &self.pathspec
    }

    pub fn whitespace_mode(&self) -> WhitespaceMode {
        WhitespaceMode::from(self.flags)
    }

    /// Flip the direction of the comparison
    ///
    /// Prefixes travel with the flag, so reversing twice restores the
    /// original value.
    pub fn reversed(mut self) -> Self {
        self.flags.toggle(DiffFlags::REVERSE);
        std::mem::swap(&mut self.src_prefix, &mut self.dst_prefix);
        self
    }
}

#[derive(Debug, Clone)]
pub struct DiffOptionsBuilder {
    flags: DiffFlags,
    context_lines: usize,
    interhunk_lines: usize,
    src_prefix: Option<String>,
    dst_prefix: Option<String>,
    pathspec: Vec<String>,
}

impl Default for DiffOptionsBuilder {
    fn default() -> Self {
        DiffOptionsBuilder {
            flags: DiffFlags::empty(),
            context_lines: DEFAULT_CONTEXT_LINES,
            interhunk_lines: DEFAULT_INTERHUNK_LINES,
            src_prefix: None,
            dst_prefix: None,
            pathspec: Vec::new(),
        }
    }
}

impl DiffOptionsBuilder {
    pub fn flags(mut self, flags: DiffFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Unchanged lines shown around each change
    ///
    /// 0 means no context at all. git reads `diff.context=0` from config as
    /// its default of 3; this builder takes the number literally.
    pub fn context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn interhunk_lines(mut self, lines: usize) -> Self {
        self.interhunk_lines = lines;
        self
    }

    pub fn src_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.src_prefix = Some(prefix.into());
        self
    }

    pub fn dst_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dst_prefix = Some(prefix.into());
        self
    }

    pub fn pathspec<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.pathspec.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> DiffOptions {
        let src_prefix = own_prefix(self.src_prefix, DEFAULT_SRC_PREFIX);
        let dst_prefix = own_prefix(self.dst_prefix, DEFAULT_DST_PREFIX);

        let (src_prefix, dst_prefix) = if self.flags.contains(DiffFlags::REVERSE) {
            (dst_prefix, src_prefix)
        } else {
            (src_prefix, dst_prefix)
        };

        DiffOptions {
            flags: self.flags,
            context_lines: self.context_lines,
            interhunk_lines: self.interhunk_lines,
            src_prefix,
            dst_prefix,
            pathspec: Pathspec::new(self.pathspec),
        }
    }
}

/// A supplied prefix always ends with `/` unless it is empty
fn own_prefix(prefix: Option<String>, default: &'static str) -> Prefix {
    match prefix {
        None => Cow::Borrowed(default),
        Some(mut prefix) => {
            if !prefix.is_empty() && !prefix.ends_with('/') {
                prefix.push('/');
            }
            Cow::Owned(prefix)
        }
    }
}
