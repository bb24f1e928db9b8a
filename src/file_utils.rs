use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::{debug, warn};

use crate::errors::FileLoadError;

// @module: File and directory utilities

/// Extensions read as plain text
const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "csv", "log"];

/// Extensions recognised but needing an external extractor
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const DOCUMENT_EXTENSIONS: &[&str] = &["docx", "doc", "odt", "rtf"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

/// Enum representing different input file types
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Readable text
    PlainText,
    /// PDF document
    Pdf,
    /// Word processor document
    Document,
    /// Image, which would need OCR
    Image,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FileType::PlainText => "plain text",
            FileType::Pdf => "PDF",
            FileType::Document => "document",
            FileType::Image => "image",
            FileType::Unknown => "unknown",
        }
    }
}

/// A file whose text was appended to the input
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Path the text was read from
    pub path: PathBuf,
    /// Number of chars read
    pub chars: usize,
}

/// A file that was skipped
#[derive(Debug)]
pub struct FileLoadFailure {
    /// Offending path
    pub path: PathBuf,
    /// Reason it was skipped
    pub error: FileLoadError,
}

/// Result of loading a batch of input paths
#[derive(Debug, Default)]
pub struct LoadedInputs {
    /// Concatenated text, one `\n\n[name]\n<text>` block per file
    pub text: String,
    /// Files that were read
    pub loaded: Vec<LoadedFile>,
    /// Files that were skipped
    pub failures: Vec<FileLoadFailure>,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a file by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = match path.as_ref().extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return FileType::Unknown,
        };

        if PLAIN_TEXT_EXTENSIONS.contains(&ext.as_str()) {
            FileType::PlainText
        } else if PDF_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Pdf
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Document
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Image
        } else {
            FileType::Unknown
        }
    }

    /// Expand files and directories into a sorted list of files
    fn expand_paths(paths: &[PathBuf], failures: &mut Vec<FileLoadFailure>) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if Self::file_exists(path) {
                files.push(path.clone());
            } else if Self::dir_exists(path) {
                for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
                    match entry {
                        Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                        Ok(_) => {}
                        Err(e) => {
                            let failed_path = e.path().map(Path::to_path_buf).unwrap_or_else(|| path.clone());
                            let io_error = e
                                .into_io_error()
                                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                            failures.push(FileLoadFailure {
                                path: failed_path,
                                error: FileLoadError::Io(io_error),
                            });
                        }
                    }
                }
            } else {
                failures.push(FileLoadFailure {
                    path: path.clone(),
                    error: FileLoadError::NotFound,
                });
            }
        }

        files
    }

    /// Read one input file as text
    pub fn load_text_file<P: AsRef<Path>>(path: P) -> Result<String, FileLoadError> {
        let path = path.as_ref();
        match Self::detect_file_type(path) {
            FileType::PlainText => Ok(fs::read_to_string(path)?),
            other => Err(FileLoadError::Unsupported(other.label().to_string())),
        }
    }

    /// Load every readable file under `paths`
    ///
    /// Unsupported or unreadable files are reported in `failures` and do not
    /// stop the batch.
    pub fn load_inputs(paths: &[PathBuf]) -> LoadedInputs {
        let mut inputs = LoadedInputs::default();
        let files = Self::expand_paths(paths, &mut inputs.failures);

        for file in files {
            match Self::load_text_file(&file) {
                Ok(text) => {
                    let name = file
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| file.display().to_string());
                    debug!("Loaded {} ({} chars)", file.display(), text.chars().count());

                    inputs.text.push_str(&format!("\n\n[{}]\n{}", name, text));
                    inputs.loaded.push(LoadedFile {
                        chars: text.chars().count(),
                        path: file,
                    });
                }
                Err(error) => {
                    warn!("Skipping {}: {}", file.display(), error);
                    inputs.failures.push(FileLoadFailure { path: file, error });
                }
            }
        }

        inputs
    }
}
