use crate::util::*;
mod util;

#[test]
fn not_interactive_without_summary() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    // Stdin of the test process is not a terminal
    cmd.arg(FILE_TWO_RUNS);

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("please run interactively."));

    Ok(())
}

#[test]
fn stream_file_conflicts_with_provider() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS).arg("--summary").arg("-p").arg("ibm");
    cmd.assert().failure();

    match_on_out_no_case(&cmd.output()?.stderr, "cannot be used with", 1)?;

    Ok(())
}

#[test]
fn bad_provider_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg("--summary").arg("--provider").arg("dwave");
    cmd.assert().failure();

    match_on_out_no_case(&cmd.output()?.stderr, "invalid value", 1)?;
    match_on_out_no_case(&cmd.output()?.stderr, "Unknown quantum provider", 1)?;

    Ok(())
}

#[test]
fn bad_refresh_period() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS).arg("--summary").arg("--refresh-ms").arg("0");
    cmd.assert().failure().code(1);

    match_on_out_no_case(&cmd.output()?.stderr, "refresh period", 1)?;
    // Fails before anything is read
    match_on_output(&cmd.output()?.stdout, "REPORT", 0)?;

    Ok(())
}

#[test]
fn bad_y_range_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS)
        .arg("--summary")
        .arg("--y-range")
        .arg("-1.0")
        .arg("-2.0");
    cmd.assert().failure().code(1);

    match_on_out_no_case(&cmd.output()?.stderr, "invalid config", 1)?;

    Ok(())
}

#[test]
fn stats_output_requires_format() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS).arg("--summary").arg("-S").arg("stdout");
    cmd.assert().failure();

    match_on_out_no_case(&cmd.output()?.stderr, "required arguments were not provided", 1)?;

    Ok(())
}

#[test]
fn any_errors_exit_code_cannot_be_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg(FILE_TWO_RUNS).arg("--summary").arg("-E").arg("0");
    cmd.assert().failure().code(1);

    match_on_out_no_case(&cmd.output()?.stderr, "cannot be 0", 1)?;

    Ok(())
}

#[test]
fn generate_completions() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("vqeconv")?;

    cmd.arg("--generate-completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("vqeconv"))
        .stdout(predicate::str::contains("--summary"));

    Ok(())
}
