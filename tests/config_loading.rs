// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use schedbridge::cli::CliArgs;
use schedbridge::config::{load_and_validate, resolve};
use schedbridge::errors::BridgeError;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_file_is_loaded() {
    let file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 9100
max_request_bytes = 4096

[backend]
dir = "/opt/scheduler"
executable = "list_sched"
build_command = "gmake"
build_jobs = 3
timeout_secs = 15

[work]
dir = "/var/tmp/io"

[task_defaults]
computation_cost = 250
num_lane = 8
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9100);
    assert_eq!(cfg.server.max_request_bytes, 4096);
    assert_eq!(cfg.backend.executable_path(), PathBuf::from("/opt/scheduler/list_sched"));
    assert_eq!(cfg.backend.build_command, "gmake");
    assert_eq!(cfg.backend.effective_build_jobs(), 3);
    assert_eq!(cfg.backend.timeout(), Some(Duration::from_secs(15)));
    assert_eq!(cfg.work.dir, PathBuf::from("/var/tmp/io"));
    assert_eq!(cfg.task_defaults.computation_cost, 250);
    assert_eq!(cfg.task_defaults.num_lane, 8);
    // Untouched placeholders keep their defaults.
    assert_eq!(cfg.task_defaults.spm_size, 1024);
}

#[test]
fn empty_file_uses_defaults() {
    let file = config_file("");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 8000);
    assert_eq!(cfg.backend.executable_path(), PathBuf::from("scheduler_cpp/main"));
    assert_eq!(cfg.backend.build_command, "make");
    assert_eq!(cfg.backend.timeout(), Some(Duration::from_secs(120)));
}

#[test]
fn zero_timeout_disables_the_bound() {
    let file = config_file("[backend]\ntimeout_secs = 0\n");

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.backend.timeout(), None);
}

#[test]
fn cli_flags_override_file_values() {
    let file = config_file(
        r#"
[server]
port = 9100

[backend]
dir = "/opt/scheduler"
timeout_secs = 15
"#,
    );

    let args = CliArgs {
        config: Some(file.path().to_path_buf()),
        host: Some("127.0.0.1".to_string()),
        port: Some(9200),
        backend_dir: Some(PathBuf::from("/srv/sched")),
        work_dir: Some(PathBuf::from("/srv/io")),
        timeout_secs: Some(5),
        ..CliArgs::default()
    };

    let cfg = resolve(&args).unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9200);
    assert_eq!(cfg.backend.dir, PathBuf::from("/srv/sched"));
    assert_eq!(cfg.work.dir, PathBuf::from("/srv/io"));
    assert_eq!(cfg.backend.timeout(), Some(Duration::from_secs(5)));
}

#[test]
fn cli_overrides_are_validated_too() {
    let file = config_file("");
    let args = CliArgs {
        config: Some(file.path().to_path_buf()),
        host: Some("  ".to_string()),
        ..CliArgs::default()
    };

    match resolve(&args) {
        Err(BridgeError::Config(msg)) => assert!(msg.contains("[server].host")),
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn explicit_config_must_exist() {
    let args = CliArgs {
        config: Some(PathBuf::from("/nonexistent/schedbridge.toml")),
        ..CliArgs::default()
    };

    assert!(matches!(resolve(&args), Err(BridgeError::Io(_))));
}

#[test]
fn executable_with_a_path_returns_config_error() {
    let file = config_file("[backend]\nexecutable = \"../bin/main\"\n");

    match load_and_validate(file.path()) {
        Err(BridgeError::Config(msg)) => {
            assert!(msg.contains("bare file name"));
            assert!(msg.contains("../bin/main"));
        }
        Err(e) => panic!("Expected Config error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_build_jobs_returns_config_error() {
    let file = config_file("[backend]\nbuild_jobs = 0\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(BridgeError::Config(msg)) if msg.contains("build_jobs")
    ));
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = config_file("[server\nport = 1");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(BridgeError::Toml(_))
    ));
}

#[test]
fn wrong_value_type_returns_toml_error() {
    let file = config_file("[server]\nport = \"eighty\"\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(BridgeError::Toml(_))
    ));
}
