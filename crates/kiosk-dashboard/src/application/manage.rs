//! ManageKioskUseCase: applies management-page form submissions.
//!
//! The management page is a set of small HTML forms that all POST to
//! `/manage`.  Which form was submitted is told apart by which field is
//! present, so the page works without JavaScript:
//!
//! | Field present   | Action                                         |
//! |-----------------|------------------------------------------------|
//! | `add`           | append `url` (trimmed, no duplicates)          |
//! | `remove`        | remove that URL                                |
//! | `layout`        | set the layout                                 |
//! | `set_generator` | set `generator_url` (blank clears it)          |
//! | `lock`          | set `dashboard_enabled = false`                |
//!
//! If several are present the first one in this order wins.
//!
//! Every submission reloads the document from disk, applies the action, and
//! saves the whole document back, even when nothing changed.  That keeps the
//! file's modification time moving, which is what the display page watches.

use kiosk_core::{ConfigStore, KioskDocument};
use serde::Deserialize;
use tracing::info;

use crate::application::error::ActionError;

/// Raw `application/x-www-form-urlencoded` body of a `/manage` POST.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ManageForm {
    pub add: Option<String>,
    pub url: Option<String>,
    pub remove: Option<String>,
    pub layout: Option<String>,
    pub set_generator: Option<String>,
    pub generator_url: Option<String>,
    pub lock: Option<String>,
}

/// One management action, decoded from a [`ManageForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageAction {
    AddUrl(String),
    RemoveUrl(String),
    SetLayout(String),
    SetGenerator(String),
    Lock,
    /// The form carried no recognised action.  The document is saved as-is.
    Nothing,
}

impl From<ManageForm> for ManageAction {
    fn from(form: ManageForm) -> Self {
        if form.add.is_some() {
            Self::AddUrl(form.url.unwrap_or_default())
        } else if let Some(url) = form.remove {
            Self::RemoveUrl(url)
        } else if let Some(layout) = form.layout {
            Self::SetLayout(layout)
        } else if form.set_generator.is_some() {
            Self::SetGenerator(form.generator_url.unwrap_or_default())
        } else if form.lock.is_some() {
            Self::Lock
        } else {
            Self::Nothing
        }
    }
}

impl ManageAction {
    /// Applies the action to `doc`.  Returns `true` if the document changed.
    pub fn apply(&self, doc: &mut KioskDocument) -> bool {
        match self {
            Self::AddUrl(url) => doc.add_url(url),
            Self::RemoveUrl(url) => doc.remove_url(url),
            Self::SetLayout(layout) => doc.set_layout(layout),
            Self::SetGenerator(url) => {
                let before = doc.generator_url.clone();
                doc.set_generator_url(url);
                before != doc.generator_url
            }
            Self::Lock => {
                let was_enabled = doc.dashboard_enabled;
                doc.dashboard_enabled = false;
                was_enabled
            }
            Self::Nothing => false,
        }
    }
}

/// Loads the document, applies `action`, and saves the result.
///
/// # Errors
///
/// Returns [`ActionError::Locked`] without writing anything if the dashboard
/// is locked, or [`ActionError::Store`] if the file cannot be read or written.
pub fn submit(store: &ConfigStore, action: &ManageAction) -> Result<KioskDocument, ActionError> {
    let mut doc = store.load()?;
    if doc.is_locked() {
        return Err(ActionError::Locked);
    }

    let changed = action.apply(&mut doc);
    store.save(&doc)?;

    if changed {
        info!("kiosk config updated: {action:?}");
    }
    Ok(doc)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
