use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use prefix::config::loader::DEFAULT_CONFIG_TEMPLATE;
use prefix::config::{
    load_and_validate, load_from_path, load_or_init, parse_duration, validate_dump_directory,
    ConfigFile, DEFAULT_DEBOUNCE,
};
use prefix::fs::mock::MockFileSystem;
use prefix_test_utils::builders::ConfigFileBuilder;
use prefix_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &Path, contents: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("prefix.toml");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn full_config_is_loaded_in_order() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let path = write_config(
        tmp.path(),
        r#"
dump_directory = "/home/me/Downloads"
debounce = "750ms"

[[destinations]]
path = "/home/me/Documents/reports"
prefix = "report_"

[[destinations]]
path = "/home/me/Pictures"
suffix = ".png"

[[destinations]]
path = "/home/me/Pictures/scans"
prefix = "scan_"
suffix = ".jpg"
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.dump_directory, PathBuf::from("/home/me/Downloads"));
    assert_eq!(cfg.debounce, Duration::from_millis(750));
    assert_eq!(cfg.destinations.len(), 3);
    assert_eq!(cfg.destinations[0].prefix(), Some("report_"));
    assert_eq!(cfg.destinations[0].suffix(), None);
    assert_eq!(cfg.destinations[1].suffix(), Some(".png"));
    assert_eq!(cfg.destinations[2].path, PathBuf::from("/home/me/Pictures/scans"));
    Ok(())
}

#[test]
fn debounce_defaults_to_five_seconds() -> TestResult {
    let cfg = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out", "a")
        .build();
    assert_eq!(cfg.debounce, DEFAULT_DEBOUNCE);
    assert_eq!(DEFAULT_DEBOUNCE, Duration::from_secs(5));
    Ok(())
}

#[test]
fn rule_without_prefix_or_suffix_is_rejected() {
    let raw = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out/a", "a")
        .with_prefix_rule("/out/b", "")
        .raw();

    let err = ConfigFile::try_from(raw).expect_err("destination[1] has no pattern");
    assert!(
        err.to_string()
            .contains("destination[1] must have at least prefix or suffix"),
        "unexpected error: {err}"
    );
}

#[test]
fn empty_destination_path_is_rejected() {
    let raw = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("", "a")
        .raw();

    let err = ConfigFile::try_from(raw).expect_err("empty path");
    assert!(err.to_string().contains("destination[0] has empty path"));
}

#[test]
fn empty_dump_directory_is_rejected() {
    let raw = ConfigFileBuilder::new("")
        .with_prefix_rule("/out", "a")
        .raw();

    let err = ConfigFile::try_from(raw).expect_err("empty dump_directory");
    assert!(err.to_string().contains("dump_directory is empty"));
}

#[test]
fn missing_destinations_are_rejected() {
    let raw = ConfigFileBuilder::new("/dump").raw();

    let err = ConfigFile::try_from(raw).expect_err("no destinations");
    assert!(err.to_string().contains("no destinations configured"));
}

#[test]
fn zero_or_garbage_debounce_is_rejected() {
    let zero = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out", "a")
        .debounce("0s")
        .raw();
    assert!(ConfigFile::try_from(zero).is_err());

    let garbage = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out", "a")
        .debounce("soon")
        .raw();
    assert!(ConfigFile::try_from(garbage).is_err());
}

#[test]
fn invalid_toml_reports_the_file() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let path = write_config(tmp.path(), "dump_directory = [unclosed")?;

    let err = load_from_path(&path).expect_err("invalid TOML");
    assert!(format!("{err:#}").contains("parsing TOML config"));
    Ok(())
}

#[test]
fn missing_config_file_is_created_from_template() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested").join("prefix").join("prefix.toml");

    let err = load_or_init(&path).expect_err("fresh config must be edited first");
    assert!(err.to_string().contains("created default config file"));
    assert_eq!(fs::read_to_string(&path)?, DEFAULT_CONFIG_TEMPLATE);

    // The untouched template does not validate yet.
    let err = load_or_init(&path).expect_err("template is incomplete");
    assert!(format!("{err:#}").contains("dump_directory is empty"));
    Ok(())
}

#[test]
fn template_parses_as_raw_config() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let path = write_config(tmp.path(), DEFAULT_CONFIG_TEMPLATE)?;

    let raw = load_from_path(&path)?;
    assert_eq!(raw.destinations.len(), 1);
    assert_eq!(raw.debounce.as_deref(), Some("5s"));
    Ok(())
}

#[test]
fn dump_directory_must_exist_and_be_a_directory() {
    let fs = MockFileSystem::new();
    fs.add_file("/file", b"x");
    fs.add_dir("/dump");

    let ok = ConfigFileBuilder::new("/dump").with_prefix_rule("/out", "a").build();
    assert!(validate_dump_directory(&fs, &ok).is_ok());

    let missing = ConfigFileBuilder::new("/missing").with_prefix_rule("/out", "a").build();
    let err = validate_dump_directory(&fs, &missing).expect_err("missing");
    assert!(err.to_string().contains("does not exist"));

    let file = ConfigFileBuilder::new("/file").with_prefix_rule("/out", "a").build();
    let err = validate_dump_directory(&fs, &file).expect_err("not a directory");
    assert!(err.to_string().contains("is not a directory"));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
    assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("5").is_err());
    assert!(parse_duration("").is_err());
    assert!(parse_duration("5d").is_err());
}

#[test]
fn oversized_durations_are_rejected_not_wrapped() {
    let err = parse_duration("307445734561825861m").expect_err("overflows u64 seconds");
    assert!(err.contains("duration too large"), "unexpected error: {err}");
    assert!(parse_duration("5124095576030432h").is_err());
    assert_eq!(
        parse_duration("18446744073709551615s"),
        Ok(Duration::from_secs(u64::MAX))
    );

    let raw = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out", "a")
        .debounce("5124095576030432h")
        .raw();
    let err = ConfigFile::try_from(raw).expect_err("oversized debounce");
    assert!(err.to_string().contains("invalid debounce"));
}
