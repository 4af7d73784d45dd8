use std::fs;

use catch_core::lookups::{FilterOptions, AUTHORS_FILE, NO_FILTER, STATUS_FILE};
use pretty_assertions::assert_eq;

#[test]
fn loads_sorted_options_from_assets_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(AUTHORS_FILE),
        "author,team\nZoe,core\nAdam,web\nZoe,web\n,ops\n",
    )
    .expect("write authors");
    fs::write(dir.path().join(STATUS_FILE), "status\nIn Progress\nDone\nBacklog\n")
        .expect("write status");

    let opts = FilterOptions::load(dir.path());
    assert_eq!(opts.authors, vec!["None", "Adam", "Zoe"]);
    assert_eq!(opts.statuses, vec!["None", "Backlog", "Done", "In Progress"]);
}

#[test]
fn missing_files_degrade_to_no_filter_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let opts = FilterOptions::load(dir.path());
    assert_eq!(opts, FilterOptions::default());
    assert_eq!(opts.authors, vec![NO_FILTER.to_string()]);
    assert_eq!(opts.statuses, vec![NO_FILTER.to_string()]);
}

#[test]
fn wrong_column_degrades_that_list_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(AUTHORS_FILE), "name\nZoe\n").expect("write authors");
    fs::write(dir.path().join(STATUS_FILE), "status\nDone\n").expect("write status");

    let opts = FilterOptions::load(dir.path());
    assert_eq!(opts.authors, vec!["None"]);
    assert_eq!(opts.statuses, vec!["None", "Done"]);
}
