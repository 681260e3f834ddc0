use crate::common::{TestRepository, patch_text, repository};
use bit_diff::artifacts::diff::delta::{BinaryState, DiffDelta};
use bit_diff::artifacts::diff::engine::{DiffRange, LineOrigin};
use bit_diff::artifacts::diff::error::DiffError;
use bit_diff::artifacts::diff::options::{DiffFlags, DiffOptions};
use bit_diff::artifacts::diff::patch::DiffVisitor;
use bit_diff::artifacts::objects::object_id::ObjectId;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[derive(Default)]
struct EventCounter {
    files: Vec<BinaryState>,
    hunks: usize,
    lines: usize,
}

impl DiffVisitor for EventCounter {
    fn file(&mut self, delta: &DiffDelta) -> Result<(), DiffError> {
        self.files.push(delta.binary());
        Ok(())
    }

    fn hunk(&mut self, _delta: &DiffDelta, _range: &DiffRange, _header: &str) -> Result<(), DiffError> {
        self.hunks += 1;
        Ok(())
    }

    fn line(&mut self, _delta: &DiffDelta, _origin: LineOrigin, _content: &[u8]) -> Result<(), DiffError> {
        self.lines += 1;
        Ok(())
    }
}

fn binary_trees(repository: &TestRepository) -> (ObjectId, ObjectId) {
    let old = repository.tree_of(&[("logo.png", "\u{0}PNG old\n")]);
    let new = repository.tree_of(&[("logo.png", "\u{0}PNG new\n")]);
    (old, new)
}

#[rstest]
fn binary_files_print_a_notice_instead_of_hunks(repository: TestRepository) {
    let (old, new) = binary_trees(&repository);
    let old_blob = repository.blob("\u{0}PNG old\n").to_short_oid();
    let new_blob = repository.blob("\u{0}PNG new\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/logo.png b/logo.png\n\
             index {old_blob}..{new_blob} 100644\n\
             Binary files a/logo.png and b/logo.png differ\n"
        )
    );
}

#[rstest]
fn binary_deltas_report_only_the_file_event(repository: TestRepository) {
    let (old, new) = binary_trees(&repository);
    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();
    let mut counter = EventCounter::default();

    diff.for_each(&mut counter).unwrap();

    assert_eq!(counter.files, vec![BinaryState::Binary]);
    assert_eq!((counter.hunks, counter.lines), (0, 0));
    // content is released once rendered, the classification stays
    assert_eq!(diff.deltas()[0].binary(), BinaryState::Binary);
    assert!(diff.deltas()[0].old_file().content().is_empty());
}

#[rstest]
fn forcing_text_diffs_binary_content(repository: TestRepository) {
    let (old, new) = binary_trees(&repository);
    let options = DiffOptions::builder().flags(DiffFlags::FORCE_TEXT).build();
    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, options)
        .unwrap();
    let mut counter = EventCounter::default();

    diff.for_each(&mut counter).unwrap();

    assert_eq!(counter.files, vec![BinaryState::Text]);
    assert_eq!((counter.hunks, counter.lines), (1, 2));
}

#[rstest]
fn added_binary_file_names_dev_null(repository: TestRepository) {
    let old = repository.tree_of(&[]);
    let new = repository.tree_of(&[("data.bin", "\u{0}\u{1}\u{2}")]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();
    let patch = patch_text(&mut diff);

    assert!(
        patch.ends_with("Binary files /dev/null and b/data.bin differ\n"),
        "unexpected patch:\n{patch}"
    );
}
