use crate::common::{TestRepository, repository, summary};
use bit_diff::artifacts::diff::delta::DeltaStatus;
use bit_diff::artifacts::diff::options::DiffOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn tree_to_tree_reports_changed_files(repository: TestRepository) {
    let old = repository.tree_of(&[("a.txt", "a\n"), ("b.txt", "b\n"), ("c.txt", "c\n")]);
    let new = repository.tree_of(&[("a.txt", "a\n"), ("b.txt", "B\n"), ("d.txt", "d\n")]);

    let diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        summary(&diff),
        vec![
            ('M', "b.txt".to_string()),
            ('D', "c.txt".to_string()),
            ('A', "d.txt".to_string()),
        ]
    );

    let deleted = &diff.deltas()[1];
    assert_eq!(deleted.status(), DeltaStatus::Deleted);
    assert!(deleted.old_file().is_present());
    assert!(!deleted.new_file().is_present());
    assert_eq!(deleted.new_path(), "c.txt");
}

#[rstest]
fn identical_trees_have_no_deltas(repository: TestRepository) {
    let tree = repository.tree_of(&[("a.txt", "a\n"), ("dir/b.txt", "b\n")]);

    let diff = repository
        .repository
        .diff_tree_to_tree(&tree, &tree, DiffOptions::default())
        .unwrap();

    assert!(diff.is_empty());
}
