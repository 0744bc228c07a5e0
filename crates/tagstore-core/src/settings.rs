//! File-backed YAML settings.
//!
//! [`Settings`] pairs a [`YamlDocument`] with the file it was loaded from. A
//! file that does not exist yet loads as an empty document and marks the
//! settings as freshly created, which is what [`Settings::add_default`] keys
//! off: defaults are only written into files created during this run.
//!
//! Getters never fail. A missing property reads as the type's zero value, and
//! the `*_with` variants consult an optional fallback [`Settings`] before
//! giving up.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec;
use crate::document::YamlDocument;
use crate::error::Result;
use crate::store::{FlatStore, Leaf};
use crate::types::{Compound, List};

#[derive(Debug, Clone, Default)]
pub struct Settings {
    document: YamlDocument,
    file: Option<PathBuf>,
    was_created: bool,
}

impl Settings {
    /// Settings with no backing file. [`Settings::save`] is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `<dir>/<folder>/<name>`, or start empty if the file is missing.
    pub fn open(dir: impl AsRef<Path>, folder: Option<&str>, name: &str) -> Result<Self> {
        let mut file = dir.as_ref().to_path_buf();
        if let Some(folder) = folder {
            file.push(folder);
        }
        file.push(name);
        Self::open_file(file)
    }

    /// Load the given file, or start empty if it is missing.
    pub fn open_file(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();
        if !file.exists() {
            info!(file = %file.display(), "settings file not found, creating it");
            return Ok(Self {
                document: YamlDocument::new(),
                file: Some(file),
                was_created: true,
            });
        }

        let text = fs::read_to_string(&file)?;
        let document = YamlDocument::from_yaml_str(&text).inspect_err(|e| {
            warn!(file = %file.display(), error = %e, "failed to parse settings file");
        })?;
        debug!(file = %file.display(), "loaded settings");
        Ok(Self {
            document,
            file: Some(file),
            was_created: false,
        })
    }

    /// Write the document to its backing file, creating parent directories.
    pub fn save(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(file, self.document.to_yaml_string()?)?;
        debug!(file = %file.display(), "saved settings");
        Ok(())
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether the backing file did not exist when these settings were opened.
    pub fn was_created(&self) -> bool {
        self.was_created
    }

    pub fn document(&self) -> &YamlDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut YamlDocument {
        &mut self.document
    }

    pub fn set(&mut self, path: &str, value: impl Into<Leaf>) -> Result<()> {
        self.document.set(path, value.into())
    }

    pub fn set_string_list(&mut self, path: &str, items: &[String]) -> Result<()> {
        self.document.set_string_list(path, items)
    }

    /// Remove `path` and everything below it.
    pub fn remove(&mut self, path: &str) -> Result<()> {
        self.document.clear(path)
    }

    /// Write `value` only when the file was created this run and `path` is
    /// not already set.
    pub fn add_default(&mut self, path: &str, value: impl Into<Leaf>) -> Result<()> {
        if !self.was_created || self.has_property(path) {
            return Ok(());
        }
        self.set(path, value)
    }

    /// A detached in-memory copy of the section at `path`, whose top-level
    /// properties are the section's direct children.
    pub fn base_config(&self, path: &str) -> Settings {
        Settings {
            document: self.document.subsection(path),
            file: None,
            was_created: false,
        }
    }

    pub fn has_property(&self, path: &str) -> bool {
        !path.is_empty() && self.document.has(path)
    }

    /// Direct children of `path`, sorted.
    pub fn keys(&self, path: &str) -> Vec<String> {
        let mut keys = self.document.keys_under(path).unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn get_bool(&self, path: &str) -> bool {
        self.document.get_bool(path).unwrap_or_default()
    }

    pub fn get_int(&self, path: &str) -> i32 {
        self.document.get_int(path).unwrap_or_default()
    }

    pub fn get_long(&self, path: &str) -> i64 {
        self.document.get_long(path).unwrap_or_default()
    }

    pub fn get_short(&self, path: &str) -> i16 {
        self.document.get_short(path).unwrap_or_default()
    }

    pub fn get_byte(&self, path: &str) -> i8 {
        self.document.get_byte(path).unwrap_or_default()
    }

    pub fn get_float(&self, path: &str) -> f32 {
        self.document.get_float(path).unwrap_or_default()
    }

    pub fn get_double(&self, path: &str) -> f64 {
        self.document.get_double(path).unwrap_or_default()
    }

    pub fn get_string(&self, path: &str) -> String {
        self.document.get_string(path).unwrap_or_default()
    }

    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.document.get_string_list(path)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> i32 {
        if self.has_property(path) {
            self.get_int(path)
        } else {
            default
        }
    }

    pub fn get_bool_with(&self, alternative: Option<&Settings>, path: &str) -> bool {
        self.lookup(alternative, path, Settings::get_bool).unwrap_or(false)
    }

    pub fn get_int_with(&self, alternative: Option<&Settings>, path: &str, default: i32) -> i32 {
        self.lookup(alternative, path, Settings::get_int).unwrap_or(default)
    }

    pub fn get_float_with(&self, alternative: Option<&Settings>, path: &str, default: f32) -> f32 {
        self.lookup(alternative, path, Settings::get_float).unwrap_or(default)
    }

    pub fn get_string_with(&self, alternative: Option<&Settings>, path: &str) -> String {
        self.lookup(alternative, path, Settings::get_string).unwrap_or_default()
    }

    pub fn get_string_list_with(&self, alternative: Option<&Settings>, path: &str) -> Vec<String> {
        self.lookup(alternative, path, Settings::get_string_list).unwrap_or_default()
    }

    /// `base<name> + scale * scale<name>`, both read under `prefix`.
    ///
    /// `prefix` is concatenated as-is, so pass `"damage."` rather than
    /// `"damage"` to read `damage.baseFire`.
    pub fn scaled_value(&self, prefix: &str, name: &str, scale: f32) -> f32 {
        self.get_float(&format!("{prefix}base{name}"))
            + scale * self.get_float(&format!("{prefix}scale{name}"))
    }

    /// Like [`Settings::scaled_value`] with no prefix, falling back to
    /// `alternative`. A missing base reads as `default`, a missing scale as 0.
    pub fn scaled_value_with(
        &self,
        alternative: Option<&Settings>,
        name: &str,
        scale: f32,
        default: f32,
    ) -> f32 {
        self.get_float_with(alternative, &format!("base{name}"), default)
            + scale * self.get_float_with(alternative, &format!("scale{name}"), 0.0)
    }

    /// Explode `compound` under `path`, replacing whatever was there.
    pub fn set_tag_compound(&mut self, path: &str, compound: &Compound) -> Result<()> {
        codec::encode_compound(compound, &mut self.document, path)
    }

    pub fn get_tag_compound(&self, path: &str) -> Result<Compound> {
        codec::decode_compound(&self.document, path)
    }

    /// Explode `list` under `path`, replacing whatever was there.
    pub fn set_tag_list(&mut self, path: &str, list: &List) -> Result<()> {
        codec::encode_list(list, &mut self.document, path)
    }

    pub fn get_tag_list(&self, path: &str) -> Result<List> {
        codec::decode_list(&self.document, path)
    }

    /// Own value if present, else the alternative's if present.
    fn lookup<T>(
        &self,
        alternative: Option<&Settings>,
        path: &str,
        read: impl Fn(&Settings, &str) -> T,
    ) -> Option<T> {
        if self.has_property(path) {
            return Some(read(self, path));
        }
        alternative
            .filter(|alt| alt.has_property(path))
            .map(|alt| read(alt, path))
    }
}
