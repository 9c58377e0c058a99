//! End-to-end tests for the droidgen binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs droidgen in `dir` with a clean SDK environment.
fn run_droidgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_droidgen"))
        .args(args)
        .current_dir(dir)
        .env_remove("ANDROID_SDK")
        .env_remove("DROIDGEN_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute droidgen binary")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = run_droidgen(dir.path(), &["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["generate", "resources", "aidl", "init", "validate", "info"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = run_droidgen(dir.path(), &["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_droidgen(dir.path(), &["frobnicate"]);
    assert!(!output.status.success());
}

// ============================================================================
// Init / Info Tests
// ============================================================================

#[test]
fn test_init_writes_config() {
    let dir = TempDir::new().unwrap();
    let output = run_droidgen(dir.path(), &["init"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let written = fs::read_to_string(dir.path().join("droidgen.toml")).unwrap();
    assert!(written.contains("[project]"));
    assert!(written.contains("failure_policy"));
}

#[test]
fn test_init_without_force_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("droidgen.toml"), "# custom\n").unwrap();

    let output = run_droidgen(dir.path(), &["init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--force"));
    assert_eq!(
        fs::read_to_string(dir.path().join("droidgen.toml")).unwrap(),
        "# custom\n"
    );

    let output = run_droidgen(dir.path(), &["init", "--force", "--minimal"]);
    assert!(output.status.success(), "{}", stderr(&output));
}

#[test]
fn test_info_json_after_init() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/main/java/com/example")).unwrap();
    fs::write(dir.path().join("src/main/java/com/example/IPing.aidl"), "").unwrap();
    assert!(run_droidgen(dir.path(), &["init"]).status.success());

    let output = run_droidgen(dir.path(), &["info", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["aidl_files"][0], "com/example/IPing.aidl");
    assert_eq!(value["config"]["failure_policy"], "fail-fast");
    assert!(value["platform_jar"].is_null());
}

#[test]
fn test_missing_config_hints_at_init() {
    let dir = TempDir::new().unwrap();
    let output = run_droidgen(dir.path(), &["generate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("droidgen init"));
}

#[test]
fn test_validate_reports_missing_manifest() {
    let dir = TempDir::new().unwrap();
    assert!(run_droidgen(dir.path(), &["init", "--minimal"]).status.success());

    let output = run_droidgen(dir.path(), &["validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Manifest not found"));
}

// ============================================================================
// Generation Tests
// ============================================================================

#[cfg(unix)]
mod generation {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, MutexGuard};

    // Writing a script while another test forks can make exec fail with ETXTBSY.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn fake_tool(path: &Path, exit_code: i32) {
        let log = path.with_extension("log");
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\nexit {exit_code}\n",
            log.display()
        );
        fs::write(path, script).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn project(aapt_exit: i32) -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join("src/main/java/com/example")).unwrap();
        fs::write(root.join("AndroidManifest.xml"), "<manifest/>").unwrap();
        fs::write(root.join("android.jar"), "").unwrap();
        fs::write(root.join("src/main/java/com/example/IPing.aidl"), "").unwrap();
        fs::write(root.join("src/main/java/com/example/R.java"), "stale").unwrap();
        fake_tool(&root.join("bin/aapt"), aapt_exit);
        fake_tool(&root.join("bin/aidl"), 0);
        fs::write(
            root.join("droidgen.toml"),
            format!(
                "[sdk]\nplatform_jar = 'android.jar'\naapt = '{}'\naidl = '{}'\n",
                root.join("bin/aapt").display(),
                root.join("bin/aidl").display()
            ),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_default_command_generates_everything() {
        let _guard = serial();
        let dir = project(0);
        let root = dir.path();

        let output = run_droidgen(root, &[]);
        assert!(output.status.success(), "{}", stderr(&output));

        assert!(!root.join("src/main/java/com/example/R.java").exists());
        assert!(root.join("bin/aapt.log").exists());
        let aidl_log = fs::read_to_string(root.join("bin/aidl.log")).unwrap();
        assert!(aidl_log.contains("com/example/IPing.java"));
        assert!(stderr(&output).contains("generated-sources/aidl"));
    }

    #[test]
    fn test_skip_flags_and_keep_going() {
        let _guard = serial();
        let dir = project(3);
        let root = dir.path();

        let output = run_droidgen(root, &["generate", "--keep-going", "--keep-conflicting"]);
        assert!(!output.status.success());
        // The aidl task still ran after aapt failed.
        assert!(root.join("bin/aidl.log").exists());
        assert!(root.join("src/main/java/com/example/R.java").exists());

        fs::remove_file(root.join("bin/aidl.log")).unwrap();
        let output = run_droidgen(root, &["generate", "--skip-resources"]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(root.join("bin/aidl.log").exists());
    }

    #[test]
    fn test_task_failure_is_reported_once() {
        let _guard = serial();
        let dir = project(4);

        let output = run_droidgen(dir.path(), &["generate"]);
        assert!(!output.status.success());
        assert_eq!(
            stderr(&output).matches("resource generation failed").count(),
            1,
            "{}",
            stderr(&output)
        );
        // Fail-fast: aidl never ran.
        assert!(!dir.path().join("bin/aidl.log").exists());
    }
}
