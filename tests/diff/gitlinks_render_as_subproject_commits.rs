use crate::common::{TestRepository, patch_text, repository};
use bit_diff::artifacts::diff::error::DiffError;
use bit_diff::artifacts::diff::options::DiffOptions;
use bit_diff::artifacts::index::entry_mode::EntryMode;
use bit_diff::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use bit_diff::artifacts::objects::object_id::ObjectId;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn gitlink(path: &str, commit: &ObjectId) -> IndexEntry {
    IndexEntry::new(
        path.to_string(),
        commit.clone(),
        EntryMetadata::with_mode(EntryMode::Gitlink),
    )
}

fn two_commits(repository: &TestRepository) -> (ObjectId, ObjectId) {
    let first = repository.tree_of(&[("lib.rs", "// v1\n")]);
    let second = repository.tree_of(&[("lib.rs", "// v2\n")]);
    (repository.commit(&first), repository.commit(&second))
}

#[rstest]
fn gitlinks_render_as_subproject_commits(repository: TestRepository) {
    let (first, second) = two_commits(&repository);
    let old = repository.tree(&[gitlink("vendor/lib", &first)]);
    let new = repository.tree(&[gitlink("vendor/lib", &second)]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/vendor/lib b/vendor/lib\n\
             index {}..{} 160000\n\
             --- a/vendor/lib\n\
             +++ b/vendor/lib\n\
             @@ -1 +1 @@\n\
             -Subproject commit {first}\n\
             +Subproject commit {second}\n",
            first.to_short_oid(),
            second.to_short_oid(),
        )
    );
}

#[rstest]
fn staged_gitlink_is_unsupported(repository: TestRepository) {
    let (first, _) = two_commits(&repository);
    let tree = repository.tree_of(&[("a", "a\n")]);
    repository.stage(vec![
        repository.entry("a", "a\n", EntryMode::default()),
        gitlink("vendor/lib", &first),
    ]);

    let error = repository
        .repository
        .diff_index_to_tree(&tree, DiffOptions::default())
        .unwrap_err();

    assert!(
        matches!(
            &error,
            DiffError::UnsupportedEntry { path, mode: EntryMode::Gitlink } if path == "vendor/lib"
        ),
        "unexpected error: {error}"
    );
}

#[rstest]
fn gitlink_in_the_tree_is_unsupported_against_the_index(repository: TestRepository) {
    let (first, _) = two_commits(&repository);
    let tree = repository.tree(&[gitlink("vendor/lib", &first)]);

    let error = repository
        .repository
        .diff_index_to_tree(&tree, DiffOptions::default())
        .unwrap_err();

    assert!(
        matches!(&error, DiffError::UnsupportedEntry { path, .. } if path == "vendor/lib"),
        "unexpected error: {error}"
    );
}
