use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{DEFAULT_FORMAT, DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::error::{ErrorMetadata, FailureKind};

/// A directive or item field was out of range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid argument: {0}")]
pub struct InvalidArgument(pub String);

impl ErrorMetadata for InvalidArgument {
    fn failure_kind(&self) -> FailureKind {
        FailureKind::InvalidArgument
    }
}

/// Opaque handle to an item's raw bytes, interpreted by a byte source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(handle: impl Into<String>) -> Self {
        SourceRef(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        SourceRef::new(s)
    }
}

/// Transform parameters attached to one upload item.
///
/// The format token is kept as given; the transformer resolves it, so a token
/// such as `gif` is representable and handled by the configured format policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    format: String,
    quality: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
}

impl Directive {
    pub fn new(format: impl Into<String>, quality: u8) -> Result<Self, InvalidArgument> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(InvalidArgument(format!(
                "quality must be between {} and {}, got {}",
                MIN_QUALITY, MAX_QUALITY, quality
            )));
        }

        Ok(Directive {
            format: format.into(),
            quality,
            width: None,
            height: None,
        })
    }

    /// Bound the output size. Either dimension may be left open.
    pub fn with_size(
        mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self, InvalidArgument> {
        if width == Some(0) || height == Some(0) {
            return Err(InvalidArgument(
                "width and height must be greater than zero".to_string(),
            ));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn has_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

impl Default for Directive {
    fn default() -> Self {
        Directive {
            format: DEFAULT_FORMAT.to_string(),
            quality: DEFAULT_QUALITY,
            width: None,
            height: None,
        }
    }
}

/// One file to transform and upload. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadItem {
    logical_name: String,
    source: SourceRef,
    directive: Directive,
}

impl UploadItem {
    pub fn new(
        logical_name: impl Into<String>,
        source: SourceRef,
        directive: Directive,
    ) -> Result<Self, InvalidArgument> {
        let logical_name = logical_name.into();
        if logical_name.trim().is_empty() {
            return Err(InvalidArgument("logical name must not be empty".to_string()));
        }

        Ok(UploadItem {
            logical_name,
            source,
            directive,
        })
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn directive(&self) -> &Directive {
        &self.directive
    }
}
