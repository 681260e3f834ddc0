use crate::common::{TestRepository, repository, summary};
use bit_diff::artifacts::diff::options::DiffOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn nested_directories_are_compared_recursively(repository: TestRepository) {
    let old = repository.tree_of(&[
        ("src/lib.rs", "pub mod util;\n"),
        ("src/util/io.rs", "// io\n"),
        ("src/util/mod.rs", "pub mod io;\n"),
    ]);
    let new = repository.tree_of(&[
        ("docs/guide/intro.md", "# Intro\n"),
        ("src/lib.rs", "pub mod util;\npub mod net;\n"),
        ("src/util/io.rs", "// io\n"),
        ("src/util/net.rs", "// net\n"),
    ]);

    let diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        summary(&diff),
        vec![
            ('A', "docs/guide/intro.md".to_string()),
            ('M', "src/lib.rs".to_string()),
            ('D', "src/util/mod.rs".to_string()),
            ('A', "src/util/net.rs".to_string()),
        ]
    );
}
