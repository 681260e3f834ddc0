mod binary_files_print_a_notice_instead_of_hunks;
mod compact_listing_marks_status_and_modes;
mod gitlinks_render_as_subproject_commits;
mod missing_objects_abort_the_comparison;
mod nested_directories_are_compared_recursively;
mod pathspec_limits_what_is_rendered;
mod patch_output_matches_git;
mod reverse_mirrors_the_opposite_comparison;
mod tree_to_tree_reports_changed_files;
