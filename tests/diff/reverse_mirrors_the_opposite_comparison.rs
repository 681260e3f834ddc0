use crate::common::{TestRepository, patch_text, repository};
use bit_diff::artifacts::diff::delta::DiffDelta;
use bit_diff::artifacts::diff::options::{DiffFlags, DiffOptions};
use bit_diff::artifacts::objects::object_id::ObjectId;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

const PATHS: [&str; 7] = ["a", "a.txt", "b", "d", "d/e/z", "d/x", "d/y"];

fn reversed() -> DiffOptions {
    DiffOptions::builder().flags(DiffFlags::REVERSE).build()
}

/// Everything observable about a delta except its rendered content
fn observe(deltas: &[DiffDelta]) -> Vec<(char, String, Option<String>, Option<String>)> {
    deltas
        .iter()
        .map(|delta| {
            (
                delta.status().as_char(),
                delta.path().to_string(),
                delta.old_file().oid().map(ToString::to_string),
                delta.new_file().oid().map(ToString::to_string),
            )
        })
        .collect()
}

/// A snapshot drawn from a fixed path set; `d` is either a file or a directory
fn snapshot() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    (
        prop::collection::vec(prop::option::of("[ab]{0,2}"), PATHS.len()),
        any::<bool>(),
    )
        .prop_map(|(contents, d_is_file)| {
            PATHS
                .iter()
                .zip(contents)
                .filter(|(path, _)| {
                    let nested = path.starts_with("d/");
                    match **path {
                        "d" => d_is_file,
                        _ if nested => !d_is_file,
                        _ => true,
                    }
                })
                .filter_map(|(path, content)| content.map(|content| (*path, format!("{content}\n"))))
                .collect()
        })
}

fn store(repository: &TestRepository, files: &[(&str, String)]) -> ObjectId {
    let files = files
        .iter()
        .map(|(path, content)| (*path, content.as_str()))
        .collect::<Vec<_>>();
    repository.tree_of(&files)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reverse_mirrors_the_opposite_comparison(old in snapshot(), new in snapshot()) {
        let repository = TestRepository::new();
        let old = store(&repository, &old);
        let new = store(&repository, &new);

        let reversed = repository
            .repository
            .diff_tree_to_tree(&old, &new, reversed())
            .unwrap();
        let swapped = repository
            .repository
            .diff_tree_to_tree(&new, &old, DiffOptions::default())
            .unwrap();

        prop_assert_eq!(observe(reversed.deltas()), observe(swapped.deltas()));
    }
}

#[rstest]
fn reversed_patch_swaps_prefixes_and_sides(repository: TestRepository) {
    let old = repository.tree_of(&[("f", "before\n")]);
    let new = repository.tree_of(&[("f", "after\n")]);
    let before = repository.blob("before\n").to_short_oid();
    let after = repository.blob("after\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, reversed())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git b/f a/f\n\
             index {after}..{before} 100644\n\
             --- b/f\n\
             +++ a/f\n\
             @@ -1 +1 @@\n\
             -after\n\
             +before\n"
        )
    );
}

#[rstest]
fn reversed_index_diff_turns_additions_into_deletions(repository: TestRepository) {
    let tree = repository.tree_of(&[("kept", "k\n")]);
    repository.stage(repository.entries(&[("kept", "k\n"), ("staged", "s\n")]));

    let diff = repository
        .repository
        .diff_index_to_tree(&tree, reversed())
        .unwrap();

    let deltas = observe(diff.deltas());
    assert_eq!(deltas.len(), 1);
    assert_eq!((deltas[0].0, deltas[0].1.as_str()), ('D', "staged"));
    assert_eq!(deltas[0].3, None);
}
