//! The kiosk configuration document.
//!
//! [`KioskDocument`] is the single persisted entity of the whole system.  On
//! disk it is a JSON object with exactly four keys:
//!
//! ```json
//! {
//!     "urls": ["https://example.com/board"],
//!     "layout": "auto",
//!     "generator_url": "",
//!     "dashboard_enabled": true
//! }
//! ```
//!
//! # Legacy and incomplete files
//!
//! Early kiosks stored nothing but a bare JSON list of URLs.  Later versions
//! added `layout`, then `generator_url`, then `dashboard_enabled`.  Any of
//! those files must still load.  Normalization happens in two steps:
//!
//! 1. [`DocumentShape::detect`] looks at the top-level JSON kind only and
//!    decides between the legacy list and the object form.
//! 2. [`DocumentShape::into_document`] turns either form into a complete
//!    [`KioskDocument`], backfilling every missing field with its default.
//!
//! A field that is present but has the wrong type is an error, not a default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Layout used when none is stored.  The display page picks a grid based on
/// the number of URLs.
pub const DEFAULT_LAYOUT: &str = "auto";

/// Error type for document normalization.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The top-level JSON value is neither a list nor an object.
    #[error("unsupported document shape: expected a list or an object, found {found}")]
    UnsupportedShape { found: &'static str },

    /// A legacy list contained something other than a string.
    #[error("legacy url list entry {index} is {found}, expected a string")]
    LegacyEntryNotString { index: usize, found: &'static str },

    /// An object field is present but has the wrong type.
    #[error("invalid document field: {0}")]
    InvalidField(#[source] serde_json::Error),
}

/// The complete kiosk configuration.
///
/// Every field carries a serde default so that an object missing any of them
/// still deserializes.  Serialization always writes all four keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KioskDocument {
    /// Pages shown by the kiosk, in rotation order.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Layout name, e.g. `"auto"` or `"2x2"`.  Not validated.
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Optional page that produces content for the kiosk.  Empty means unset.
    #[serde(default)]
    pub generator_url: String,
    /// When `false` the management page is locked.
    #[serde(default = "default_true")]
    pub dashboard_enabled: bool,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for KioskDocument {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            layout: default_layout(),
            generator_url: String::new(),
            dashboard_enabled: default_true(),
        }
    }
}

impl KioskDocument {
    /// Normalizes any accepted JSON value into a complete document.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the value is not a list or an object,
    /// or when a present field has the wrong type.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        DocumentShape::detect(value)?.into_document()
    }

    /// Appends `url` unless it is blank or already present.
    ///
    /// The URL is trimmed first.  Returns `true` if the list changed.
    pub fn add_url(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || self.urls.iter().any(|u| u == url) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    /// Removes every entry equal to `url`.  Returns `true` if anything was removed.
    pub fn remove_url(&mut self, url: &str) -> bool {
        let before = self.urls.len();
        self.urls.retain(|u| u != url);
        self.urls.len() != before
    }

    /// Sets the layout name.  Blank names are ignored.
    pub fn set_layout(&mut self, layout: &str) -> bool {
        let layout = layout.trim();
        if layout.is_empty() || layout == self.layout {
            return false;
        }
        self.layout = layout.to_string();
        true
    }

    /// Sets or clears the generator URL.  A blank value clears it.
    pub fn set_generator_url(&mut self, url: &str) {
        self.generator_url = url.trim().to_string();
    }

    /// Returns the generator URL, or `None` when unset.
    pub fn generator(&self) -> Option<&str> {
        if self.generator_url.is_empty() {
            None
        } else {
            Some(&self.generator_url)
        }
    }

    /// Returns `true` when the management interface must refuse changes.
    pub fn is_locked(&self) -> bool {
        !self.dashboard_enabled
    }
}

/// The top-level form of a stored document, detected before any field-level
/// defaulting runs.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentShape {
    /// A bare list of URLs (the original file format).
    Legacy(Vec<String>),
    /// A JSON object, possibly missing some fields.
    Mapping(Map<String, Value>),
}

impl DocumentShape {
    /// Classifies a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedShape`] for scalars and `null`, and
    /// [`DocumentError::LegacyEntryNotString`] for a list holding non-strings.
    pub fn detect(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(url) => Ok(url),
                    other => Err(DocumentError::LegacyEntryNotString {
                        index,
                        found: kind_name(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Legacy),
            Value::Object(map) => Ok(Self::Mapping(map)),
            other => Err(DocumentError::UnsupportedShape {
                found: kind_name(&other),
            }),
        }
    }

    /// Converts the detected shape into a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidField`] if an object field has the
    /// wrong type.
    pub fn into_document(self) -> Result<KioskDocument, DocumentError> {
        match self {
            Self::Legacy(urls) => Ok(KioskDocument {
                urls,
                ..KioskDocument::default()
            }),
            Self::Mapping(map) => {
                serde_json::from_value(Value::Object(map)).map_err(DocumentError::InvalidField)
            }
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
