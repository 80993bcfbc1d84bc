//! Loading application and logging settings through the facade.

use std::io::Write;
use std::sync::Arc;

use keel::prelude::*;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_log_config_from_file_and_env() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "logging.toml",
        r#"
            level = "keel_config=debug,info"
            format = "compact"
            thread_ids = true
        "#,
    );

    let config = Config::new()
        .with_loader(FileLoader::new(&path))
        .with_loader(EnvLoader::from_vars("SVC_LOG", [("SVC_LOG__FORMAT", "json")]));

    let log = LogConfig::from_config(config).unwrap();

    assert_eq!(log.level, "keel_config=debug,info");
    assert_eq!(log.format, LogFormat::Json);
    assert!(log.thread_ids);
    assert!(!log.span_events);
    assert!(keel::telemetry::create_env_filter(&log.level).is_ok());
}

#[test]
fn test_invalid_log_file_is_reported_per_key() {
    let config = Config::new().with_loader(FileLoader::from_string(
        r#"{"format": "xml", "span_events": "maybe"}"#,
        Format::Json,
    ));

    let err = LogConfig::from_config(config).unwrap_err();
    let TelemetryError::InvalidConfig(ConfigError::InvalidConfiguration(invalid)) = err else {
        panic!("expected invalid configuration");
    };

    let keys: Vec<_> = invalid.errors().keys().cloned().collect();
    assert_eq!(keys, ["format", "span_events"]);
}

#[test]
fn test_structure_shared_between_configs() {
    let structure = Arc::new(
        Structure::new()
            .with("listen", Str.required())
            .with("workers", Integer::new().min(1).with_default(4)),
    );

    let primary = Config::new()
        .with_structure(Arc::clone(&structure))
        .with_loader(MapLoader::from_iter([("listen", "0.0.0.0:8080")]));
    let replica = Config::new()
        .with_structure(Arc::clone(&structure))
        .with_loader(MapLoader::from_iter([
            ("listen", Value::from("0.0.0.0:8081")),
            ("workers", Value::from("2")),
        ]));

    let primary = primary.load().unwrap();
    let replica = replica.load().unwrap();

    assert_eq!(primary.get_i64("workers"), Some(4));
    assert_eq!(replica.get_i64("workers"), Some(2));
    assert_eq!(replica.get_str("listen"), Some("0.0.0.0:8081"));
}

#[test]
fn test_closure_loader_sees_structure() {
    let structure = Structure::new()
        .with("region", Str)
        .with("zone", Str);

    let settings = Config::new()
        .with_structure(structure)
        .with_loader(|structure: &Structure| -> Result<Value, LoaderError> {
            Ok(structure
                .keys()
                .map(|key| (key.clone(), Value::from(format!("{key}-1"))))
                .collect::<Value>())
        })
        .load()
        .unwrap();

    assert_eq!(settings.get_str("region"), Some("region-1"));
    assert_eq!(settings.get_str("zone"), Some("zone-1"));
}

#[test]
fn test_describe_lists_declared_types() {
    let structure = Structure::new()
        .with("listen", Str.required())
        .with("mode", Choice::new(["fast", "safe"]));

    assert_eq!(
        structure.describe(),
        "listen: string (required)\nmode: one of [fast, safe]\n"
    );
}
