use crate::common::{TestRepository, compact_text, repository, summary};
use bit_diff::artifacts::diff::options::DiffOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn changed_everywhere(repository: &TestRepository, options: DiffOptions) -> String {
    let old = repository.tree_of(&[
        ("docs/a.md", "1\n"),
        ("src/lib.rs", "1\n"),
        ("src/util/io.rs", "1\n"),
        ("srcs", "1\n"),
    ]);
    let new = repository.tree_of(&[
        ("docs/a.md", "2\n"),
        ("src/lib.rs", "2\n"),
        ("src/util/io.rs", "2\n"),
        ("srcs", "2\n"),
    ]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, options)
        .unwrap();
    // every delta is recorded; the pathspec only filters rendering
    assert_eq!(summary(&diff).len(), 4);
    compact_text(&mut diff)
}

#[rstest]
#[case::everything(&[], "M\tdocs/a.md\nM\tsrc/lib.rs\nM\tsrc/util/io.rs\nM\tsrcs\n")]
#[case::directory(&["src"], "M\tsrc/lib.rs\nM\tsrc/util/io.rs\n")]
#[case::trailing_slash(&["src/util/"], "M\tsrc/util/io.rs\n")]
#[case::single_file(&["docs/a.md"], "M\tdocs/a.md\n")]
#[case::several(&["srcs", "./docs"], "M\tdocs/a.md\nM\tsrcs\n")]
#[case::nothing_matches(&["tests"], "")]
fn pathspec_limits_what_is_rendered(
    repository: TestRepository,
    #[case] paths: &[&str],
    #[case] expected: &str,
) {
    let options = DiffOptions::builder().pathspec(paths.iter().copied()).build();

    assert_eq!(changed_everywhere(&repository, options), expected);
}
