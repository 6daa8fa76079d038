//! Templates: named, ordered lists of `(data type, note)` entries.
//!
//! A template says how to read a register block: the first entry's type
//! covers the first bytes of the response, the next entry the following
//! bytes, and so on. Template files map a template name to its entries:
//!
//! ```yaml
//! unit_status:
//!   - note: text label
//!     data_type: B64_STRING
//!   - note: 16 bit unsigned integer
//!     data_type: B16_UINT
//! ```
//!
//! Entries keep the type *name* as written. Resolving it against the
//! [`DataType`] registry happens at decode time, so an unknown name is
//! reported as `CodecError::UnknownType` by [`decode`](crate::decode).
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::TemplateSet;
//!
//! let yaml = "
//! unit_status:
//!   - note: text label
//!     data_type: B64_STRING
//!   - note: setpoint
//!     data_type: B16_INT
//! ";
//! let templates = TemplateSet::from_yaml_str(yaml).unwrap();
//! let entries = templates.get("unit_status").unwrap();
//!
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].data_type, "B16_INT");
//! assert!(templates.get("missing").is_err());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{CodecError, Result};

/// Note used for entries of a synthesized template.
pub const DEFAULT_NOTE: &str = "-";

/// One slot of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Canonical data type name, e.g. `B32_FLOAT`.
    pub data_type: String,
    /// Free-form label shown next to the value.
    #[serde(default = "default_note")]
    pub note: String,
}

fn default_note() -> String {
    DEFAULT_NOTE.to_string()
}

impl TemplateEntry {
    /// Creates an entry from a type name and a note.
    ///
    /// The name is not checked here.
    pub fn new(data_type: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            note: note.into(),
        }
    }

    /// Creates an entry for a known data type.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::{DataType, TemplateEntry};
    ///
    /// let entry = TemplateEntry::of(DataType::B32Float, "flow");
    /// assert_eq!(entry.data_type, "B32_FLOAT");
    /// ```
    pub fn of(data_type: DataType, note: impl Into<String>) -> Self {
        Self::new(data_type.name(), note)
    }

    /// Resolves the entry's type name.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnknownType` if the name is not a known type.
    pub fn resolve(&self) -> Result<DataType> {
        DataType::lookup(&self.data_type)
    }
}

/// Builds the template used when the caller supplies none.
///
/// `count` slots of `data_type`, each with the note `-`.
///
/// # Example
///
/// ```
/// use modbus_regcodec::template::repeat_entry;
/// use modbus_regcodec::DataType;
///
/// let template = repeat_entry(DataType::B16Uint, 2);
/// assert_eq!(template.len(), 2);
/// assert_eq!(template[0].note, "-");
/// ```
pub fn repeat_entry(data_type: DataType, count: usize) -> Vec<TemplateEntry> {
    vec![TemplateEntry::of(data_type, DEFAULT_NOTE); count]
}

/// Resolves every entry of a template.
///
/// # Errors
///
/// Returns `CodecError::UnknownType` for the first unknown type name.
pub fn resolve_all(entries: &[TemplateEntry]) -> Result<Vec<DataType>> {
    entries.iter().map(TemplateEntry::resolve).collect()
}

/// A collection of named templates, as loaded from a template file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet {
    templates: BTreeMap<String, Vec<TemplateEntry>>,
}

impl TemplateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML template document.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Yaml` if the document is not a mapping of
    /// template names to entry lists.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yml::from_str(contents)?)
    }

    /// Parses a JSON template document.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Json` if the document is not a mapping of
    /// template names to entry lists.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::TemplateSet;
    ///
    /// let json = r#"{"pump": [{"note": "speed", "data_type": "B16_UINT"}]}"#;
    /// let templates = TemplateSet::from_json_str(json).unwrap();
    /// assert_eq!(templates.get("pump").unwrap()[0].note, "speed");
    /// ```
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Loads a template file.
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Io` if the file cannot be read, or a parse error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading templates from {:?}", path);
        let contents = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, name: impl Into<String>, entries: Vec<TemplateEntry>) {
        self.templates.insert(name.into(), entries);
    }

    /// Returns the entries of a named template.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::TemplateNotFound` if the name is absent.
    pub fn get(&self, name: &str) -> Result<&[TemplateEntry]> {
        self.templates
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| CodecError::template_not_found(name))
    }

    /// Returns the template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
