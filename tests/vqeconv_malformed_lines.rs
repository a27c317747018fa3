use crate::util::*;
mod util;

#[test]
fn malformed_lines_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_MALFORMED_LINES).arg("--summary");

    // Malformed lines are not fatal
    cmd.assert().success();

    let output = cmd.output()?;
    match_on_out_no_case(&output.stderr, "malformed_lines.json:3: .*no energy", 1)?;
    match_on_out_no_case(&output.stderr, "malformed_lines.json:5: Malformed iteration record", 1)?;
    match_on_output(&output.stdout, "Total errors.*2", 1)?;
    match_on_output(&output.stdout, "Runs started.*2", 1)?;
    match_on_output(&output.stdout, "Iterations.*3", 1)?;

    Ok(())
}

#[test]
fn malformed_lines_muted() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_MALFORMED_LINES).arg("--summary").arg("-m");

    cmd.assert().success();

    let output = cmd.output()?;
    assert_no_errors_or_warn(&output.stderr)?;
    match_on_output(&output.stdout, "Total errors.*2", 1)?;

    Ok(())
}

#[test]
fn malformed_lines_any_errors_exit_code() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_MALFORMED_LINES)
        .arg("--summary")
        .arg("--any-errors-exit-code")
        .arg("7");

    cmd.assert().failure().code(7);

    Ok(())
}

#[test]
fn no_errors_keeps_exit_code_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS).arg("--summary").arg("-E").arg("7");

    cmd.assert().success();

    Ok(())
}

#[test]
fn max_tolerate_errors_stops_early() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_MALFORMED_LINES)
        .arg("--summary")
        .arg("-m")
        .arg("-e")
        .arg("1")
        .arg("-S")
        .arg("stdout")
        .arg("-D")
        .arg("json");

    cmd.assert().success();

    // The follower might read a few more lines before it sees the stop flag
    let stats: serde_json::Value = serde_json::from_slice(&cmd.output()?.stdout)?;
    let errors = stats["errors"].as_u64().ok_or("errors is not a number")?;
    assert!((1..=2).contains(&errors), "{stats}");

    Ok(())
}

#[test]
fn stats_file_records_errors() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = assert_fs::TempDir::new()?;
    let stats_file = tmp_dir.child("stats.json");

    let mut cmd = Command::cargo_bin("vqeconv")?;
    cmd.arg(FILE_MALFORMED_LINES)
        .arg("--summary")
        .arg("-m")
        .arg("-S")
        .arg(stats_file.path())
        .arg("-D")
        .arg("json");

    cmd.assert().success();

    let stats: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(stats_file.path())?)?;
    assert_eq!(stats["errors"], 2);
    assert_eq!(stats["final_energies"], serde_json::json!([-1.65, -1.66]));

    Ok(())
}
