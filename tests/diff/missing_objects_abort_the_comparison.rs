use crate::common::{TestRepository, repository};
use bit_diff::artifacts::diff::error::DiffError;
use bit_diff::artifacts::diff::options::DiffOptions;
use bit_diff::artifacts::diff::print::{LineKind, WriterSink};
use bit_diff::artifacts::objects::object_id::ObjectId;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn remove_object(repository: &TestRepository, oid: &ObjectId) {
    let path = repository
        .repository
        .database()
        .objects_path()
        .join(oid.to_path());
    std::fs::remove_file(path).expect("Failed to remove object");
}

#[rstest]
fn unknown_tree_is_a_lookup_error(repository: TestRepository) {
    let tree = repository.tree_of(&[("a", "a\n")]);
    let missing = ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap();

    let error = repository
        .repository
        .diff_tree_to_tree(&tree, &missing, DiffOptions::default())
        .unwrap_err();

    assert!(
        matches!(&error, DiffError::Lookup { oid, .. } if *oid == missing),
        "unexpected error: {error}"
    );
}

#[rstest]
fn missing_subtree_aborts_the_walk(repository: TestRepository) {
    let old = repository.tree_of(&[("dir/x", "x\n"), ("top", "1\n")]);
    let new = repository.tree_of(&[("dir/x", "changed\n"), ("top", "2\n")]);
    // the nested tree of `new` holds the single entry `x`
    let subtree = repository.tree_of(&[("x", "changed\n")]);
    remove_object(&repository, &subtree);

    let error = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap_err();

    assert!(
        matches!(&error, DiffError::Lookup { oid, .. } if *oid == subtree),
        "unexpected error: {error}"
    );
}

#[rstest]
fn blob_in_place_of_a_tree_is_rejected(repository: TestRepository) {
    let tree = repository.tree_of(&[("a", "a\n")]);
    let blob = repository.blob("a\n");

    let error = repository
        .repository
        .diff_tree_to_tree(&tree, &blob, DiffOptions::default())
        .unwrap_err();

    assert!(
        matches!(&error, DiffError::InvalidObject { expected: "tree", .. }),
        "unexpected error: {error}"
    );
}

#[rstest]
fn missing_blob_fails_the_render_and_keeps_the_deltas(repository: TestRepository) {
    let old = repository.tree_of(&[("a", "1\n"), ("b", "1\n")]);
    let new = repository.tree_of(&[("a", "2\n"), ("b", "2\n")]);
    remove_object(&repository, &repository.blob("2\n"));

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();
    let mut sink = WriterSink::new(Vec::new(), false);

    let error = diff.print_patch(&mut sink).unwrap_err();

    assert!(matches!(error, DiffError::Lookup { .. }), "unexpected error: {error}");
    assert_eq!(diff.len(), 2);
    assert!(sink.into_inner().is_empty());
}

#[rstest]
fn failing_sink_stops_printing(repository: TestRepository) {
    let old = repository.tree_of(&[("a", "1\n"), ("b", "1\n")]);
    let new = repository.tree_of(&[("a", "2\n"), ("b", "2\n")]);
    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    let mut emitted = 0;
    let mut sink = |_kind: LineKind, _text: &[u8]| -> anyhow::Result<()> {
        emitted += 1;
        anyhow::bail!("disk full")
    };

    let error = diff.print_compact(&mut sink).unwrap_err();

    assert!(matches!(error, DiffError::Formatting(_)), "unexpected error: {error}");
    assert_eq!(emitted, 1);
}
