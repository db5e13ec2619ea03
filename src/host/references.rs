//! File-backed package reference set.
//!
//! A project's persisted references live in a TOML file:
//!
//! ```toml
//! [package-references]
//! Newtonsoft.Json = { Version = "13.0.1" }
//! Analyzers = { Version = "2.0.0", PrivateAssets = "all" }
//! ```
//!
//! Keys match ignoring case. Edits go through `toml_edit` so the rest of the
//! file is preserved.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::Version;
use tokio::sync::Mutex;
use toml_edit::{DocumentMut, InlineTable, Item, Table, Value};

use crate::core::version::display_version;
use crate::project::mutation::VERSION_PROPERTY;
use crate::project::{DependencyEntry, DependencySetService, HostError};
use crate::util::fs;
use crate::util::name::eq_ignore_case;

const TABLE: &str = "package-references";

/// Package references stored in a TOML file.
pub struct PackageReferenceFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PackageReferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PackageReferenceFile {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<DocumentMut, HostError> {
        let contents = fs::read_optional(&self.path).await?.unwrap_or_default();
        let doc = contents
            .parse::<DocumentMut>()
            .map_err(|e| format!("failed to parse {}: {}", self.path.display(), e))?;
        Ok(doc)
    }

    async fn save(&self, doc: &DocumentMut) -> Result<(), HostError> {
        fs::write_async(&self.path, &doc.to_string()).await?;
        Ok(())
    }
}

fn references_mut(doc: &mut DocumentMut) -> Result<&mut Table, HostError> {
    if !doc.contains_key(TABLE) {
        doc[TABLE] = Item::Table(Table::new());
    }
    doc[TABLE]
        .as_table_mut()
        .ok_or_else(|| format!("`{}` is not a table", TABLE).into())
}

/// The stored spelling of `name`, if present.
fn find_key(table: &Table, name: &str) -> Option<String> {
    table
        .iter()
        .map(|(key, _)| key)
        .find(|key| eq_ignore_case(key, name))
        .map(str::to_string)
}

fn to_entry(name: &str, item: &Item) -> DependencyEntry {
    let mut entry = DependencyEntry::new(name);
    match item {
        Item::Value(Value::InlineTable(table)) => {
            for (key, value) in table.iter() {
                if let Some(s) = value.as_str() {
                    entry = entry.with_property(key, s);
                }
            }
        }
        Item::Table(table) => {
            for (key, value) in table.iter() {
                if let Some(s) = value.as_str() {
                    entry = entry.with_property(key, s);
                }
            }
        }
        Item::Value(Value::String(version)) => {
            entry = entry.with_property(VERSION_PROPERTY, version.value().as_str());
        }
        _ => {}
    }
    entry
}

#[async_trait]
impl DependencySetService for PackageReferenceFile {
    async fn add(&self, name: &str, version: &Version) -> Result<bool, HostError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let table = references_mut(&mut doc)?;

        if find_key(table, name).is_some() {
            return Ok(false);
        }

        let mut entry = InlineTable::new();
        entry.insert(VERSION_PROPERTY, display_version(version).to_string().into());
        table.insert(name, Item::Value(entry.into()));

        self.save(&doc).await?;
        tracing::debug!("added `{}` to {}", name, self.path.display());
        Ok(true)
    }

    async fn set_property(&self, name: &str, key: &str, value: &str) -> Result<(), HostError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let table = references_mut(&mut doc)?;

        let stored = find_key(table, name)
            .ok_or_else(|| format!("no package reference `{}` in {}", name, self.path.display()))?;

        let item = table
            .get_mut(&stored)
            .ok_or_else(|| format!("no package reference `{}`", name))?;
        if let Item::Value(Value::String(version)) = item {
            let mut entry = InlineTable::new();
            entry.insert(VERSION_PROPERTY, version.value().clone().into());
            *item = Item::Value(entry.into());
        }

        match item {
            Item::Value(Value::InlineTable(entry)) => {
                let existing = entry.iter().map(|(k, _)| k).find(|k| k.eq_ignore_ascii_case(key)).map(str::to_string);
                entry.insert(existing.as_deref().unwrap_or(key), value.into());
            }
            Item::Table(entry) => {
                let existing = entry.iter().map(|(k, _)| k).find(|k| k.eq_ignore_ascii_case(key)).map(str::to_string);
                entry.insert(existing.as_deref().unwrap_or(key), toml_edit::value(value));
            }
            _ => return Err(format!("package reference `{}` is not a table", name).into()),
        }

        self.save(&doc).await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, HostError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let table = references_mut(&mut doc)?;

        let Some(stored) = find_key(table, name) else {
            return Ok(false);
        };
        table.remove(&stored);

        self.save(&doc).await?;
        tracing::debug!("removed `{}` from {}", stored, self.path.display());
        Ok(true)
    }

    async fn entries(&self) -> Result<Vec<DependencyEntry>, HostError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        let Some(table) = doc.get(TABLE).and_then(Item::as_table) else {
            return Ok(Vec::new());
        };
        Ok(table.iter().map(|(name, item)| to_entry(name, item)).collect())
    }
}
