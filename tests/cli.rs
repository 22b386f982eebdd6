use std::process::Command;

fn tribench() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tribench"))
}

#[test]
fn unrecognized_flag_exits_before_rendering() {
    let output = tribench().arg("-xyz").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized argument: -xyz"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Vendor:"));
}

#[test]
fn flag_missing_its_value_exits_nonzero() {
    let output = tribench().args(["-a", "8", "-s"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Argument -s expects a value"));
}

#[test]
fn help_prints_usage() {
    let output = tribench().arg("-help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-tl LLLL"));
    assert!(stdout.contains("-line"));
}
