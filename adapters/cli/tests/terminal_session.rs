use std::{
    fs,
    io::Write,
    process::{Command, Stdio},
};

fn run(args: &[&str], input: &str) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tile-merge"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch tile-merge binary");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("failed to send input");

    let output = child.wait_with_output().expect("binary did not exit");
    assert!(output.status.success(), "tile-merge exited with {}", output.status);
    (
        String::from_utf8(output.stdout).expect("utf-8 stdout"),
        String::from_utf8(output.stderr).expect("utf-8 stderr"),
    )
}

#[test]
fn plays_scripted_input_and_quits() {
    let dir = tempfile::tempdir().expect("temp dir");
    let best = dir.path().join("best.toml");
    let best_arg = best.to_str().expect("utf-8 path");

    let (stdout, stderr) = run(
        &["--seed", "7", "--best-score-path", best_arg],
        "a\nd\nw\ns\nbogus\nu\nn\nq\n",
    );

    assert!(stdout.starts_with("keys:"));
    assert!(stdout.contains("Score: 0  Best: 0  Undo: 5"));
    assert!(stderr.contains("unrecognised input `bogus`"));
}

#[test]
fn identical_seeds_print_identical_frames() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = "a\ns\nd\ns\na\ns\nd\ns\nq\n";

    let first_path = dir.path().join("first.toml");
    let second_path = dir.path().join("second.toml");
    let (first, _) = run(
        &["--seed", "11", "--best-score-path", first_path.to_str().expect("utf-8 path")],
        script,
    );
    let (second, _) = run(
        &["--seed", "11", "--best-score-path", second_path.to_str().expect("utf-8 path")],
        script,
    );

    assert_eq!(first, second);
}

#[test]
fn config_file_sets_rules_and_flags_override_it() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("tile-merge.toml");
    let best = dir.path().join("best.toml");
    fs::write(
        &config,
        format!(
            "seed = 3\nundo_budget = 2\nbest_score_path = {:?}\n",
            dir.path().join("ignored.toml").to_str().expect("utf-8 path")
        ),
    )
    .expect("write config");
    fs::write(&best, "bestScore = 77\n").expect("write best score");

    let (stdout, _) = run(
        &[
            "--config",
            config.to_str().expect("utf-8 path"),
            "--best-score-path",
            best.to_str().expect("utf-8 path"),
        ],
        "q\n",
    );

    assert!(stdout.contains("Score: 0  Best: 77  Undo: 2"), "{stdout}");
}

#[test]
fn invalid_config_file_fails_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("broken.toml");
    fs::write(&config, "undo_budget = \"many\"\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_tile-merge"))
        .args(["--config", config.to_str().expect("utf-8 path")])
        .stdin(Stdio::null())
        .output()
        .expect("failed to launch tile-merge binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config file"), "{stderr}");
}
