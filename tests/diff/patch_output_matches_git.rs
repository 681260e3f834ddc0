use crate::common::{EXECUTABLE, REGULAR, TestRepository, patch_bytes, patch_text, repository};
use bit_diff::artifacts::diff::options::DiffOptions;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn modified_file_patch(repository: TestRepository) {
    let old = repository.tree_of(&[("notes.txt", "one\ntwo\nthree\n")]);
    let new = repository.tree_of(&[("notes.txt", "one\n2\nthree\n")]);
    let old_blob = repository.blob("one\ntwo\nthree\n").to_short_oid();
    let new_blob = repository.blob("one\n2\nthree\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/notes.txt b/notes.txt\n\
             index {old_blob}..{new_blob} 100644\n\
             --- a/notes.txt\n\
             +++ b/notes.txt\n\
             @@ -1,3 +1,3 @@\n \
             one\n\
             -two\n\
             +2\n \
             three\n"
        )
    );
}

#[rstest]
fn added_and_deleted_files_use_dev_null(repository: TestRepository) {
    let old = repository.tree_of(&[("gone.txt", "bye\n")]);
    let new = repository.tree_of(&[("fresh.txt", "hello\n")]);
    let gone = repository.blob("bye\n").to_short_oid();
    let fresh = repository.blob("hello\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/fresh.txt b/fresh.txt\n\
             new file mode 100644\n\
             index 0000000..{fresh}\n\
             --- /dev/null\n\
             +++ b/fresh.txt\n\
             @@ -0,0 +1 @@\n\
             +hello\n\
             diff --git a/gone.txt b/gone.txt\n\
             deleted file mode 100644\n\
             index {gone}..0000000\n\
             --- a/gone.txt\n\
             +++ /dev/null\n\
             @@ -1 +0,0 @@\n\
             -bye\n"
        )
    );
}

#[rstest]
fn pure_mode_change_keeps_index_and_side_lines(repository: TestRepository) {
    let old = repository.tree(&[repository.entry("run.sh", "echo hi\n", REGULAR)]);
    let new = repository.tree(&[repository.entry("run.sh", "echo hi\n", EXECUTABLE)]);
    let blob = repository.blob("echo hi\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/run.sh b/run.sh\n\
             old mode 100644\n\
             new mode 100755\n\
             index {blob}..{blob}\n\
             --- a/run.sh\n\
             +++ b/run.sh\n"
        )
    );
}

#[rstest]
fn non_utf8_lines_pass_through_unchanged(repository: TestRepository) {
    let old = repository.tree(&[repository.entry("menu.txt", b"caf\xe9\n", REGULAR)]);
    let new = repository.tree(&[repository.entry("menu.txt", b"caf\xe8\n", REGULAR)]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();
    let patch = patch_bytes(&mut diff);

    assert!(
        patch.ends_with(b"@@ -1 +1 @@\n-caf\xe9\n+caf\xe8\n"),
        "unexpected patch:\n{}",
        String::from_utf8_lossy(&patch)
    );
}

#[rstest]
fn mode_and_content_change(repository: TestRepository) {
    let old = repository.tree(&[repository.entry("run.sh", "echo hi\n", REGULAR)]);
    let new = repository.tree(&[repository.entry("run.sh", "echo bye\n", EXECUTABLE)]);
    let old_blob = repository.blob("echo hi\n").to_short_oid();
    let new_blob = repository.blob("echo bye\n").to_short_oid();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();

    assert_eq!(
        patch_text(&mut diff),
        format!(
            "diff --git a/run.sh b/run.sh\n\
             old mode 100644\n\
             new mode 100755\n\
             index {old_blob}..{new_blob}\n\
             --- a/run.sh\n\
             +++ b/run.sh\n\
             @@ -1 +1 @@\n\
             -echo hi\n\
             +echo bye\n"
        )
    );
}

#[rstest]
fn missing_final_newline_is_marked(repository: TestRepository) {
    let old = repository.tree_of(&[("f", "a\nb")]);
    let new = repository.tree_of(&[("f", "a\nc")]);

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, DiffOptions::default())
        .unwrap();
    let patch = patch_text(&mut diff);

    assert!(
        patch.ends_with(
            "@@ -1,2 +1,2 @@\n \
             a\n\
             -b\n\
             \\ No newline at end of file\n\
             +c\n\
             \\ No newline at end of file\n"
        ),
        "unexpected patch:\n{patch}"
    );
}

#[rstest]
#[case("", "", "diff --git f f\n", "--- f\n+++ f\n")]
#[case("old", "new", "diff --git old/f new/f\n", "--- old/f\n+++ new/f\n")]
#[case("x/", "y/", "diff --git x/f y/f\n", "--- x/f\n+++ y/f\n")]
fn custom_prefixes(
    repository: TestRepository,
    #[case] src: &str,
    #[case] dst: &str,
    #[case] header: &str,
    #[case] sides: &str,
) {
    let old = repository.tree_of(&[("f", "1\n")]);
    let new = repository.tree_of(&[("f", "2\n")]);
    let options = DiffOptions::builder().src_prefix(src).dst_prefix(dst).build();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, options)
        .unwrap();
    let patch = patch_text(&mut diff);

    assert!(patch.starts_with(header), "unexpected patch:\n{patch}");
    assert!(patch.contains(sides), "unexpected patch:\n{patch}");
}

#[rstest]
#[case(0, "@@ -5 +5 @@\n-5\n+five\n")]
#[case(1, "@@ -4,3 +4,3 @@\n 4\n-5\n+five\n 6\n")]
fn context_lines_control_hunk_size(
    repository: TestRepository,
    #[case] context: usize,
    #[case] hunks: &str,
) {
    let old = repository.tree_of(&[("f", "1\n2\n3\n4\n5\n6\n7\n8\n9\n")]);
    let new = repository.tree_of(&[("f", "1\n2\n3\n4\nfive\n6\n7\n8\n9\n")]);
    let options = DiffOptions::builder().context_lines(context).build();

    let mut diff = repository
        .repository
        .diff_tree_to_tree(&old, &new, options)
        .unwrap();
    let patch = patch_text(&mut diff);

    assert!(patch.ends_with(hunks), "unexpected patch:\n{patch}");
}
