//! Keystore input resolution.
//!
//! The caller supplies either a filesystem path or a base64-encoded blob.
//! A blob is decoded into a temporary file owned by the returned handle,
//! so the decoded copy is removed on every exit path.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tempfile::NamedTempFile;

use crate::Result;
use crate::VerifyError;

/// Where the keystore bytes come from.
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    /// An existing keystore file.
    Path(PathBuf),
    /// A base64-encoded keystore blob, e.g. from a CI secret variable.
    Base64(String),
}

impl ArchiveSource {
    /// Picks the source from the two optional inputs.
    ///
    /// When both are supplied the path wins and the blob is ignored; when
    /// neither is supplied this is [`VerifyError::MissingInput`].
    pub fn resolve(path: Option<PathBuf>, blob: Option<String>) -> Result<ResolvedArchive> {
        let source = match (path, blob) {
            (Some(path), _) => Self::Path(path),
            (None, Some(blob)) => Self::Base64(blob),
            (None, None) => return Err(VerifyError::MissingInput),
        };
        source.into_resolved()
    }

    /// Materializes the source into a usable keystore path.
    pub fn into_resolved(self) -> Result<ResolvedArchive> {
        match self {
            Self::Path(path) => Ok(ResolvedArchive { path, temp: None }),
            Self::Base64(blob) => ResolvedArchive::from_base64(&blob),
        }
    }
}

/// A keystore path usable for the duration of one verification run.
///
/// When the keystore was supplied as base64, the handle owns the decoded
/// temporary file and deletes it on drop.
#[derive(Debug)]
pub struct ResolvedArchive {
    path: PathBuf,
    temp: Option<NamedTempFile>,
}

impl ResolvedArchive {
    fn from_base64(blob: &str) -> Result<Self> {
        // CI systems wrap base64 output; strip all whitespace first.
        let compact: String = blob.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| VerifyError::InvalidBase64 {
                detail: e.to_string(),
            })?;

        let mut temp = tempfile::Builder::new()
            .prefix("keyvet-keystore-")
            .tempfile()?;
        temp.write_all(&bytes)?;
        temp.flush()?;

        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
        })
    }

    /// The keystore path to hand to the inspection tool.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this archive lives in a temporary file owned by the handle.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}
