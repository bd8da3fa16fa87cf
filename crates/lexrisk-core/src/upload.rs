//! Supporting-attachment checks: size limit and MIME allow-list.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File size exceeds {limit_mb}MB limit")]
    TooLarge { name: String, size: u64, limit_mb: u64 },
    #[error("File type not supported. Allowed: {allowed}")]
    UnsupportedType { name: String, mime: String, allowed: String },
    #[error("cannot read attachment {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl Attachment {
    /// Stat a file on disk and infer its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let meta = std::fs::metadata(path).map_err(|e| UploadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !meta.is_file() {
            return Err(UploadError::Unreadable {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: meta.len(),
            mime: mime_for_path(path).to_string(),
        })
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Size and type rules for an upload control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    /// Shown in the unsupported-type message, e.g. "PDF, DOC, DOCX".
    pub formats_label: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size: MAX_FILE_SIZE,
            allowed_types: DOCUMENT_TYPES.iter().map(|s| s.to_string()).collect(),
            formats_label: "PDF, DOC, DOCX".to_string(),
        }
    }
}

impl UploadPolicy {
    pub fn validate(&self, file: &Attachment) -> Result<(), UploadError> {
        if file.size > self.max_size {
            return Err(UploadError::TooLarge {
                name: file.name.clone(),
                size: file.size,
                limit_mb: self.max_size / (1024 * 1024),
            });
        }
        if !self.allowed_types.iter().any(|t| *t == file.mime) {
            return Err(UploadError::UnsupportedType {
                name: file.name.clone(),
                mime: file.mime.clone(),
                allowed: self.formats_label.clone(),
            });
        }
        Ok(())
    }

    /// Split a batch into accepted files and per-file rejections.
    pub fn accept(&self, files: Vec<Attachment>) -> (Vec<Attachment>, Vec<UploadError>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for file in files {
            match self.validate(&file) {
                Ok(()) => accepted.push(file),
                Err(e) => rejected.push(e),
            }
        }
        (accepted, rejected)
    }
}
