use assert_cmd::Command;
use paytrack::run_app;

pub fn test_err(args: &[&str]) {
    let mut function_args: Vec<&str> = vec!["testing"];
    for arg in args {
        function_args.push(arg);
    }
    let res = run_app(function_args.iter().map(|x| x.to_string()).collect());
    assert!(res.is_err());
}

/// Runs the binary with the given arguments and standard input, returns stdout and stderr
pub fn run_binary(args: &[&str], input: &str) -> (String, String) {
    let assert = Command::cargo_bin("paytrack")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(args)
        .write_stdin(input)
        .assert()
        .success();
    let output = assert.get_output().to_owned();
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}
