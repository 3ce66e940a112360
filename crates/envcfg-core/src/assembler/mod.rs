//! Document assembly from flat wizard records
//!
//! A [`FlatRecord`] is turned into the nested source document the evaluator
//! consumes. Each [`Section`] reads the keys it owns and emits fragments at
//! fixed paths; discriminated sections (provider, database driver, optional
//! features) pick exactly one variant and refuse values they do not know.
//! Fragments are deep-merged in section order, so the resulting key order is
//! the same for every run.
//!
//! ```
//! use envcfg_core::assembler::{FlatRecord, assemble};
//!
//! let record = FlatRecord::from_json(r#"{
//!     "environment_name": "dev",
//!     "provider": "lxd",
//!     "lxd_profile_name": "torrust-dev",
//!     "database_driver": "sqlite3"
//! }"#).unwrap();
//!
//! let doc = assemble(&record).unwrap();
//! assert_eq!(
//!     doc.pointer(&["provider", "profile_name"]).and_then(|v| v.as_str()),
//!     Some("torrust-dev")
//! );
//! ```

mod database;
mod features;
mod provider;
mod record;
mod sections;

pub use database::{Database, DatabaseSection};
pub use features::{Feature, FeatureSection};
pub use provider::{Provider, ProviderSection};
pub use record::FlatRecord;
pub use sections::{EnvironmentSection, SshSection, TrackerSection};

use envcfg_content::{ConfigValue, Object};
use tracing::debug;

/// Errors raised while assembling a source document
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// Discriminant holds a value no variant handles
    #[error("Unknown {discriminant} '{value}'")]
    UnknownVariant { discriminant: String, value: String },

    /// Required discriminant is absent
    #[error("Missing required field '{discriminant}'")]
    MissingDiscriminant { discriminant: String },

    /// Field value cannot be coerced to its type
    #[error("Field '{key}' has value '{value}', expected {expected}")]
    InvalidField {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// Record is not a flat JSON object
    #[error("Invalid wizard record: {message}")]
    Parse { message: String },
}

/// A sub-document destined for a fixed path
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    path: Vec<&'static str>,
    value: ConfigValue,
}

impl Fragment {
    pub fn new(path: &[&'static str], value: impl Into<ConfigValue>) -> Self {
        Self {
            path: path.to_vec(),
            value: value.into(),
        }
    }

    /// Dotted destination path
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    /// Wrap the value in one single-key object per path segment.
    fn into_document(self) -> ConfigValue {
        self.path.iter().rev().fold(self.value, |inner, key| {
            let mut wrapper = Object::new();
            wrapper.insert((*key).to_string(), inner);
            ConfigValue::Object(wrapper)
        })
    }
}

/// One part of the document
pub trait Section: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fragments for `record`, in merge order.
    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError>;
}

/// Ordered set of sections
pub struct Assembler {
    sections: Vec<Box<dyn Section>>,
}

impl Default for Assembler {
    /// Environment, SSH, provider, database, tracker, then each optional feature.
    fn default() -> Self {
        let mut assembler = Self::empty()
            .with_section(EnvironmentSection)
            .with_section(SshSection)
            .with_section(ProviderSection)
            .with_section(DatabaseSection)
            .with_section(TrackerSection);
        for feature in Feature::ALL {
            assembler = assembler.with_section(FeatureSection(feature));
        }
        assembler
    }
}

impl Assembler {
    /// An assembler with no sections.
    pub fn empty() -> Self {
        Self { sections: Vec::new() }
    }

    /// Append a section after the existing ones.
    pub fn with_section(mut self, section: impl Section + 'static) -> Self {
        self.sections.push(Box::new(section));
        self
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    /// Build the source document for `record`.
    pub fn assemble(&self, record: &FlatRecord) -> Result<ConfigValue, AssembleError> {
        let mut document = ConfigValue::object();
        for section in &self.sections {
            for fragment in section.fragments(record)? {
                debug!(section = section.name(), path = %fragment.path(), "Merging fragment");
                document.merge(fragment.into_document());
            }
        }
        Ok(document)
    }
}

/// Assemble with the default section order.
pub fn assemble(record: &FlatRecord) -> Result<ConfigValue, AssembleError> {
    Assembler::default().assemble(record)
}

/// Accumulates the present fields of one fragment
#[derive(Debug, Default)]
pub(crate) struct Fields(Object);

impl Fields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start from a tag field, e.g. `provider = "lxd"`.
    pub(crate) fn tagged(tag: &str, kind: &str) -> Self {
        let mut fields = Self::new();
        fields.0.insert(tag.to_string(), ConfigValue::from(kind));
        fields
    }

    pub(crate) fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_value(self) -> ConfigValue {
        ConfigValue::Object(self.0)
    }

    /// A fragment at `path`, or nothing if no field was set.
    pub(crate) fn into_fragment(self, path: &[&'static str]) -> Option<Fragment> {
        (!self.is_empty()).then(|| Fragment::new(path, self.into_value()))
    }
}
