use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(dir: &Path, extra: &[&str]) -> Output {
    let config = dir.join("empty.toml");
    std::fs::write(&config, "").expect("write config");

    Command::new(env!("CARGO_BIN_EXE_bcrypt-secret"))
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(dir)
        .args(extra)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn binary")
}

fn written_path(stdout: &str) -> PathBuf {
    let line = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Generated password written to: "))
        .expect("path line");
    PathBuf::from(line.trim())
}

#[test]
fn default_run_writes_owner_only_file() {
    let dir = tempdir().expect("tempdir");

    let out = run(dir.path(), &[]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let path = written_path(&stdout);
    let secret = std::fs::read_to_string(&path).expect("read secret");

    assert_eq!(secret.len(), 43);
    assert!(!stdout.contains(&secret));
    assert!(stdout.contains("rounds=12"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn two_runs_give_distinct_files_and_secrets() {
    let dir = tempdir().expect("tempdir");

    let first = written_path(&String::from_utf8(run(dir.path(), &[]).stdout).unwrap());
    let second = written_path(&String::from_utf8(run(dir.path(), &[]).stdout).unwrap());

    assert_ne!(first, second);
    assert_ne!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn stdout_channel_prints_secret() {
    let dir = tempdir().expect("tempdir");

    let out = run(dir.path(), &["--output", "stdout"]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let secret = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Generated password: "))
        .expect("secret line");

    assert_eq!(secret.len(), 43);
    assert!(stdout.contains(&format!("Replace PASSWORD_HERE with: {secret}")));
}

#[test]
fn missing_directory_fails_with_diagnostic() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_bcrypt-secret"))
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(dir.path().join("missing"))
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn binary");

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: Failed to create secret file"));
}

#[test]
fn unusable_directory_fails_with_diagnostic() {
    let dir = tempdir().expect("tempdir");
    let not_a_dir = dir.path().join("plain.txt");
    std::fs::write(&not_a_dir, "x").unwrap();

    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_bcrypt-secret"))
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(&not_a_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn binary");

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: Failed to create secret file"));
    assert!(stderr.contains("plain.txt"));

    let left: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|name| name.to_string_lossy().starts_with("bcrypt-secret-"))
        .collect();
    assert!(left.is_empty());
}

#[test]
fn invalid_rounds_are_rejected() {
    let dir = tempdir().expect("tempdir");

    let out = run(dir.path(), &["--rounds", "3"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8(out.stderr).unwrap().contains("Work factor"));
}
