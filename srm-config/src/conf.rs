use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::ConfigError;

/// A config store backed by a single TOML file.
///
/// Keys are dotted paths: `dat.path` is the `path` entry of the `[dat]`
/// table. Nothing is read until [`load`](Self::load) and nothing is written
/// until [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct Conf {
    path: PathBuf,
    valid_keys: Option<HashSet<String>>,
    table: Table,
}

impl Conf {
    /// A store at `path`. A leading `~/` is expanded to the home directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_home(path.as_ref()),
            valid_keys: None,
            table: Table::new(),
        }
    }

    /// A store that rejects [`set`](Self::set) for keys not in `keys`.
    pub fn with_valid_keys<I, S>(path: impl AsRef<Path>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid_keys: Some(keys.into_iter().map(Into::into).collect()),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists and is a regular file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the backing file, replacing anything held in memory.
    ///
    /// A missing file is an error unless `create` is set, in which case the
    /// parent directories and an empty file are created.
    pub fn load(&mut self, create: bool) -> Result<(), ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                self.table = contents.parse::<Table>()?;
                log::debug!("Loaded config from {}", self.path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && create => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, "")?;
                self.table = Table::new();
                log::debug!("Created empty config at {}", self.path.display());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Write all values back to the backing file.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(&self.table)?;

        // Write atomically
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let (tables, leaf) = split_key(key).ok()?;
        let mut table = &self.table;
        for name in tables {
            table = table.get(name)?.as_table()?;
        }
        table.get(leaf)
    }

    /// Set a value, creating intermediate tables as needed.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let (tables, leaf) = split_key(key)?;
        if let Some(valid) = &self.valid_keys {
            if !valid.contains(key) {
                return Err(ConfigError::KeyNotAllowed(key.to_string()));
            }
        }

        let mut table = &mut self.table;
        for (depth, name) in tables.iter().enumerate() {
            let entry = table
                .entry(name.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            table = entry.as_table_mut().ok_or_else(|| ConfigError::NotATable {
                key: key.to_string(),
                prefix: tables[..=depth].join("."),
            })?;
        }
        table.insert(leaf.to_string(), value.into());
        Ok(())
    }

    /// Remove a value, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let (tables, leaf) = split_key(key).ok()?;
        let mut table = &mut self.table;
        for name in tables {
            table = table.get_mut(name)?.as_table_mut()?;
        }
        table.remove(leaf)
    }

    /// Everything currently held in memory.
    pub fn table(&self) -> &Table {
        &self.table
    }
}

/// Split `a.b.c` into `(["a", "b"], "c")`.
fn split_key(key: &str) -> Result<(Vec<&str>, &str), ConfigError> {
    let mut segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::EmptyKey);
    }
    let leaf = segments.pop().ok_or(ConfigError::EmptyKey)?;
    Ok((segments, leaf))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

pub(crate) fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Interpret a command-line value as TOML (`42`, `true`, `"quoted"`, `[1, 2]`),
/// falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    format!("v = {raw}")
        .parse::<Table>()
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

#[cfg(test)]
#[path = "tests/conf_tests.rs"]
mod tests;
