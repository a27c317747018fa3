#![allow(dead_code)]
/// Re-export some common utilities for system tests
pub use assert_cmd::prelude::*; // Add methods on commands
pub use assert_fs::prelude::*;
pub use predicate::str::is_match;
pub use predicates::prelude::*; // Used for writing assertions
pub use std::process::Command; // Run programs

/// Path to test files : tests/test-data/
/// Files
pub const FILE_TWO_RUNS: &str = "tests/test-data/two_runs.json";
pub const FILE_MALFORMED_LINES: &str = "tests/test-data/malformed_lines.json";
pub const FILE_NO_RUNS: &str = "tests/test-data/no_runs.json";
pub const FILE_MISSING: &str = "tests/test-data/missing_stream.json";

/// Relative path of the stream file inside a CK program entry
pub const STREAM_FILE_IN_ENTRY: &str = "tmp/vqe_stream.json";

/// Helper function to match the raw output of stderr or stdout, with a pattern a fixed amount of times
pub fn match_on_output(
    byte_output: &[u8],
    re_str: &str,
    match_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    // Build regex pattern
    let re = fancy_regex::Regex::new(re_str)?;
    // Convert the output to string as utf-8
    let str_res = std::str::from_utf8(byte_output)?;
    // Make the predicate function
    let pred_regex = predicate::function(|x: &str| re.find_iter(x).count() == match_count);
    // Evaluate the output with the predicate
    assert!(
        pred_regex.eval(str_res),
        "regex: {re_str} - expected match count: {match_count}\n{str_res}"
    );
    Ok(())
}

/// Helper function to match the raw output of stderr or stdout, with a pattern a fixed amount of times, case insensitive
pub fn match_on_out_no_case(
    byte_output: &[u8],
    re_str: &str,
    match_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    match_on_output(byte_output, &("(?i)".to_owned() + re_str), match_count)
}

/// Helper function takes in the output of stderr and asserts that there are no errors or warnings
pub fn assert_no_errors_or_warn(stderr_byte_output: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    match_on_out_no_case(stderr_byte_output, "error - ", 0)?;
    match_on_out_no_case(stderr_byte_output, "warn - ", 0)?;
    Ok(())
}

/// Creates a CK repository with a program entry for `program` in `ck_repos`, holding a copy of `stream_file`
pub fn make_ck_program_entry(
    ck_repos: &assert_fs::TempDir,
    repo: &str,
    program: &str,
    stream_file: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    ck_repos
        .child(repo)
        .child("program")
        .child(program)
        .child(STREAM_FILE_IN_ENTRY)
        .write_file(std::path::Path::new(stream_file))?;
    Ok(())
}
