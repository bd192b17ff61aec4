//! Upload Intake
//!
//! Validates the recording a user selects and the subject identifier they
//! type, and holds the upload form state between those two steps.
//!
//! File contents are carried along for the analyzer but never inspected
//! here: acceptance is decided by the file extension alone.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Recording formats accepted at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// European Data Format polysomnography recording
    Edf,
    /// NumPy array dump of a preprocessed recording
    Npy,
}

impl FileFormat {
    /// Every accepted format, in display order
    pub const ALL: [FileFormat; 2] = [FileFormat::Edf, FileFormat::Npy];

    /// Lower-case extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Edf => "edf",
            FileFormat::Npy => "npy",
        }
    }

    /// Match an extension (without the dot), ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Intake validation failures, worded for display to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The selected file is not `.edf` or `.npy`
    #[error("Please upload a .edf or .npy file (got \"{filename}\")")]
    InvalidFileExtension { filename: String },

    /// Submission attempted before any file was accepted
    #[error("Please upload an EEG data file")]
    MissingFile,

    /// Submission attempted with an empty or whitespace-only subject ID
    #[error("Please enter a subject ID")]
    MissingSubjectId,
}

impl IntakeError {
    /// Stable machine-readable code, shared by the API and the CLI
    pub fn code(&self) -> &'static str {
        match self {
            IntakeError::InvalidFileExtension { .. } => "INVALID_FILE_EXTENSION",
            IntakeError::MissingFile => "MISSING_FILE",
            IntakeError::MissingSubjectId => "MISSING_SUBJECT_ID",
        }
    }
}

/// Text after the last `.` of a file name, if there is one
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Check a file name against the accepted formats
pub fn validate_file_name(filename: &str) -> Result<FileFormat, IntakeError> {
    file_extension(filename)
        .and_then(FileFormat::from_extension)
        .ok_or_else(|| IntakeError::InvalidFileExtension {
            filename: filename.to_string(),
        })
}

/// Check that a subject ID has something besides whitespace. The ID is
/// passed on exactly as typed.
pub fn validate_subject_id(subject_id: &str) -> Result<&str, IntakeError> {
    if subject_id.trim().is_empty() {
        return Err(IntakeError::MissingSubjectId);
    }
    Ok(subject_id)
}

/// A recording that passed the extension check.
///
/// Bytes are shared so the form and an in-flight analysis can hold the same
/// upload without copying it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    format: FileFormat,
    bytes: Arc<[u8]>,
}

impl UploadedFile {
    /// Accept a file if its name carries a supported extension
    pub fn accept(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, IntakeError> {
        let name = name.into();
        let format = validate_file_name(&name)?;
        Ok(Self {
            name,
            format,
            bytes: bytes.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// State of the upload form: the accepted file, the typed subject ID and
/// whether a submission is being processed.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    subject_id: String,
    is_loading: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a file to the form.
    ///
    /// A rejected file leaves the form untouched, including any file that
    /// was accepted earlier.
    pub fn select_file(&mut self, name: &str, bytes: Vec<u8>) -> Result<&UploadedFile, IntakeError> {
        let file = UploadedFile::accept(name, bytes)?;
        Ok(&*self.file.insert(file))
    }

    pub fn set_subject_id(&mut self, subject_id: impl Into<String>) {
        self.subject_id = subject_id.into();
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// Subject ID exactly as typed
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Submission guard: the accepted file and the subject ID, or the first
    /// missing piece (file before subject ID).
    pub fn check_submission(&self) -> Result<(UploadedFile, String), IntakeError> {
        let file = self.file.clone().ok_or(IntakeError::MissingFile)?;
        let subject_id = validate_subject_id(&self.subject_id)?;
        Ok((file, subject_id.to_string()))
    }

    /// Return to an empty form
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_extensions_any_case() {
        assert_eq!(validate_file_name("night1.edf"), Ok(FileFormat::Edf));
        assert_eq!(validate_file_name("night1.EDF"), Ok(FileFormat::Edf));
        assert_eq!(validate_file_name("S002_X_norm.npy"), Ok(FileFormat::Npy));
        assert_eq!(validate_file_name("archive.tar.Npy"), Ok(FileFormat::Npy));
    }

    #[test]
    fn test_rejects_other_names() {
        for name in ["data.csv", "edf", "npy", "recording.edf.zip", "notes.", "", ".edfx", "file.ed"] {
            let err = validate_file_name(name).unwrap_err();
            assert_eq!(
                err,
                IntakeError::InvalidFileExtension {
                    filename: name.to_string()
                },
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hidden_file_with_extension_only() {
        // ".edf" has an empty stem but still ends in the extension
        assert_eq!(validate_file_name(".edf"), Ok(FileFormat::Edf));
    }

    #[test]
    fn test_subject_id_kept_as_typed() {
        assert_eq!(validate_subject_id("  S42 "), Ok("  S42 "));
        assert_eq!(validate_subject_id(""), Err(IntakeError::MissingSubjectId));
        assert_eq!(validate_subject_id(" \t\n "), Err(IntakeError::MissingSubjectId));
    }

    #[test]
    fn test_rejected_file_keeps_previous() {
        let mut form = UploadForm::new();
        form.select_file("sample.edf", vec![1, 2, 3]).unwrap();

        let err = form.select_file("sample.csv", vec![9]).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILE_EXTENSION");

        let file = form.file().unwrap();
        assert_eq!(file.name(), "sample.edf");
        assert_eq!(file.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_rejected_file_on_empty_form() {
        let mut form = UploadForm::new();
        assert!(form.select_file("sample.csv", Vec::new()).is_err());
        assert!(form.file().is_none());
    }

    #[test]
    fn test_submission_guard_order() {
        let mut form = UploadForm::new();
        assert_eq!(form.check_submission().unwrap_err(), IntakeError::MissingFile);

        form.set_subject_id("S42");
        assert_eq!(form.check_submission().unwrap_err(), IntakeError::MissingFile);

        form.select_file("sample.npy", vec![0; 16]).unwrap();
        form.set_subject_id("   ");
        assert_eq!(form.check_submission().unwrap_err(), IntakeError::MissingSubjectId);

        form.set_subject_id(" S42 ");
        let (file, subject_id) = form.check_submission().unwrap();
        assert_eq!(file.format(), FileFormat::Npy);
        assert_eq!(file.size_bytes(), 16);
        assert_eq!(subject_id, " S42 ");
    }

    #[test]
    fn test_clear() {
        let mut form = UploadForm::new();
        form.select_file("sample.edf", vec![1]).unwrap();
        form.set_subject_id("S1");
        form.set_loading(true);

        form.clear();
        assert!(form.file().is_none());
        assert_eq!(form.subject_id(), "");
        assert!(!form.is_loading());
    }
}
