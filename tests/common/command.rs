use assert_cmd::Command;
use std::path::Path;

pub fn run_bit_diff(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bit-diff").expect("Failed to find bit-diff binary");
    cmd.current_dir(dir);
    cmd.arg("--color").arg("never");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
