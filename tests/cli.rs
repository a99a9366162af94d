use std::process::{Command, Output};

fn brisk(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_brisk"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run brisk")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_call_int_to_byte() {
    let output = brisk(&["call", "toUnsignedByte", "[^d,v,i]", "int:42"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "byte 00101010b");
}

#[test]
fn test_call_byte_to_unsigned_int() {
    let output = brisk(&["call", "toUnsignedInt", "[^i,v,d]", "byte:7"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "int 7");
}

#[test]
fn test_range_violation_exit_status() {
    let output = brisk(&["call", "toUnsignedByte", "[^d,v,i]", "int:300"]);
    assert_eq!(output.status.code(), Some(252));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("precondition not satisfied"), "{}", stderr);
    assert_eq!(stderr.matches("precondition not satisfied").count(), 1, "{}", stderr);
}

#[test]
fn test_unsupported_type_exit_status() {
    let output = brisk(&["call", "toUnsignedByte", "[^d,v,i]", "bool:true"]);
    assert_eq!(output.status.code(), Some(253));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported type"), "{}", stderr);
}

#[test]
fn test_unknown_routine_is_an_ordinary_error() {
    let output = brisk(&["call", "toUnsignedByte", "[^i,v,d]", "int:1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_routines_and_check() {
    let output = brisk(&["routines"]);
    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("toUnsignedByte"));
    assert!(listing.contains("[^i,v,d]"));

    let output = brisk(&["check"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("0 failure(s)"));
}
