//! Input fields and output panels of the probe page.
//!
//! Actions never take arguments. They read the current [`FormInputs`] by field identifier
//! and write their result into an [`OutputBoard`] panel, which always holds exactly the last
//! text written to it.

use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::errors::{Error, Result};

/// Identifier of an input field on the probe page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    UploadPath,
    UploadFile,
    TextPath,
    TextBody,
    FetchPath,
}

impl FieldId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::UploadPath => "put-file-path",
            FieldId::UploadFile => "put-file-input",
            FieldId::TextPath => "put-text-path",
            FieldId::TextBody => "put-text-body",
            FieldId::FetchPath => "get-path",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an output panel. Each action owns exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OutputTarget {
    #[serde(rename = "put-file-result")]
    UploadFileResult,
    #[serde(rename = "put-text-result")]
    UploadTextResult,
    #[serde(rename = "get-result")]
    FetchResult,
}

impl OutputTarget {
    /// Panels in page order.
    pub const ALL: [OutputTarget; 3] = [
        OutputTarget::UploadFileResult,
        OutputTarget::UploadTextResult,
        OutputTarget::FetchResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputTarget::UploadFileResult => "put-file-result",
            OutputTarget::UploadTextResult => "put-text-result",
            OutputTarget::FetchResult => "get-result",
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file chosen for upload: its name and raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk.
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await.map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(file = %path.display(), size = data.len(), "Loaded file for upload");
        Ok(Self::new(name, data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Current values of the page's input fields.
///
/// `None` and the empty string both mean "blank".
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    pub upload_path: Option<String>,
    pub upload_file: Option<SelectedFile>,
    pub text_path: Option<String>,
    pub text_body: Option<String>,
    pub fetch_path: Option<String>,
}

impl FormInputs {
    /// Value of a text field, `None` when blank. The file field has no text value.
    pub fn value(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::UploadPath => self.upload_path.as_deref(),
            FieldId::TextPath => self.text_path.as_deref(),
            FieldId::TextBody => self.text_body.as_deref(),
            FieldId::FetchPath => self.fetch_path.as_deref(),
            FieldId::UploadFile => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Value of a text field, or `default` when the field is blank.
    ///
    /// Only an empty value is blank; whitespace is sent as typed.
    pub fn value_or<'a>(&'a self, field: FieldId, default: &'a str) -> &'a str {
        self.value(field).unwrap_or(default)
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.upload_file.as_ref()
    }
}

/// Text of every output panel.
#[derive(Debug, Default)]
pub struct OutputBoard {
    panels: DashMap<OutputTarget, String>,
}

impl OutputBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the panel's text wholesale.
    pub fn write(&self, target: OutputTarget, text: impl Into<String>) {
        self.panels.insert(target, text.into());
    }

    pub fn read(&self, target: OutputTarget) -> Option<String> {
        self.panels.get(&target).map(|text| text.value().clone())
    }

    /// Written panels in page order.
    pub fn snapshot(&self) -> Vec<Panel> {
        OutputTarget::ALL
            .iter()
            .filter_map(|target| {
                self.read(*target).map(|text| Panel {
                    target: *target,
                    text,
                })
            })
            .collect()
    }
}

/// One output panel and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub target: OutputTarget,
    pub text: String,
}

/// Load the file field's selection, if a path was given.
pub async fn load_selection(path: Option<&Path>) -> Result<Option<SelectedFile>> {
    match path {
        Some(path) => SelectedFile::load(path).await.map(Some),
        None => Ok(None),
    }
}
