use super::*;

fn chain(dir: &tempfile::TempDir) -> ChainConf {
    ChainConf::new(
        Conf::new(dir.path().join("local").join("config")),
        Conf::with_valid_keys(dir.path().join("global"), GLOBAL_KEYS.iter().copied()),
    )
}

#[test]
fn test_local_overrides_global() {
    let dir = tempfile::tempdir().unwrap();
    let mut conf = chain(&dir);
    conf.global.set("dat.path", "/global.dat").unwrap();
    assert_eq!(conf.get("dat.path").and_then(Value::as_str), Some("/global.dat"));

    conf.set("dat.path", "/local.dat").unwrap();
    assert_eq!(conf.get("dat.path").and_then(Value::as_str), Some("/local.dat"));

    conf.remove("dat.path");
    assert_eq!(conf.get("dat.path").and_then(Value::as_str), Some("/global.dat"));
}

#[test]
fn test_local_accepts_any_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut conf = chain(&dir);
    conf.set("status.progress", false).unwrap();
    assert!(matches!(
        conf.global.set("status.progress", false),
        Err(ConfigError::KeyNotAllowed(_))
    ));
}

#[test]
fn test_load_and_save_both() {
    let dir = tempfile::tempdir().unwrap();
    let mut conf = chain(&dir);
    assert!(!conf.exists());
    conf.load(true).unwrap();
    assert!(conf.exists());
    assert!(conf.global.exists());

    conf.set("dat.path", "/local.dat").unwrap();
    conf.global.set("dat.path", "/global.dat").unwrap();
    conf.save().unwrap();

    let mut reloaded = chain(&dir);
    reloaded.load(false).unwrap();
    assert_eq!(reloaded.local.get("dat.path").and_then(Value::as_str), Some("/local.dat"));
    assert_eq!(reloaded.global.get("dat.path").and_then(Value::as_str), Some("/global.dat"));
}

#[test]
fn test_load_existing_skips_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("global"), "[dat]\npath = \"/global.dat\"\n").unwrap();

    let mut conf = chain(&dir);
    assert!(matches!(conf.load(false), Err(ConfigError::Io(_))));

    let mut conf = chain(&dir);
    conf.load_existing().unwrap();
    assert_eq!(conf.get("dat.path").and_then(Value::as_str), Some("/global.dat"));
}

#[test]
fn test_default_paths() {
    let (local, global) = ChainConf::default_paths();
    assert_eq!(local, PathBuf::from(".srm/config"));
    assert!(global.ends_with(".srmconfig"));

    let conf = ChainConf::with_default_paths();
    assert_eq!(conf.local.path(), local.as_path());
    assert_eq!(conf.global.path(), global.as_path());
}
