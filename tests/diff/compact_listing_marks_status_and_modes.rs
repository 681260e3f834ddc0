use crate::common::{EXECUTABLE, REGULAR, TestRepository, compact_text, repository};
use bit_diff::artifacts::diff::options::DiffOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compact_listing_marks_status_and_modes(repository: TestRepository) {
    let old = repository.tree(&[
        repository.entry("build.sh", "make\n", REGULAR),
        repository.entry("old.txt", "old\n", REGULAR),
        repository.entry("readme", "hello\n", REGULAR),
    ]);
    let new = repository.tree(&[
        repository.entry("build.sh", "make\n", EXECUTABLE),
        repository.entry("readme", "hello, world\n", REGULAR),
        repository.entry("tool", "#!/bin/sh\n", EXECUTABLE),
    ]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        compact_text(&mut diff),
        "M\tbuild.sh* (100644 -> 100755)\n\
         D\told.txt\n\
         M\treadme\n\
         A\ttool*\n"
    );
}

#[rstest]
fn compact_listing_never_loads_content(repository: TestRepository) {
    let old = repository.tree_of(&[("f", "1\n")]);
    let new = repository.tree_of(&[("f", "2\n")]);
    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    // drop the new blob so any content load would fail
    let new_blob = repository.blob("2\n");
    std::fs::remove_file(
        repository
            .repository
            .database()
            .objects_path()
            .join(new_blob.to_path()),
    )
    .unwrap();

    assert_eq!(compact_text(&mut diff), "M\tf\n");
}

#[rstest]
fn empty_list_prints_nothing(repository: TestRepository) {
    let tree = repository.tree_of(&[("f", "1\n")]);
    let mut diff = repository
        .repository
        .diff_tree_to_tree(&tree, &tree, DiffOptions::default())
        .unwrap();

    assert_eq!(compact_text(&mut diff), "");
}
