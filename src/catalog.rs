use crate::errors::ApiError;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Read-only view over the report directory tree: one level of category
/// directories, each holding PDF files.
pub struct ReportCatalog {
    root: PathBuf,
    public_prefix: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub name: String,
    pub file: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("category resolves outside the reports root")]
    OutsideRoot,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::OutsideRoot => ApiError::BadRequest("Invalid category.".into()),
            CatalogError::Io(err) => {
                log::error!("error listing files in category: {err}");
                ApiError::Internal("Unable to list files for the specified category".into())
            }
        }
    }
}

impl ReportCatalog {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    /// Immediate subdirectories of the root, sorted case-insensitively
    /// (byte order breaks ties). Plain files are skipped.
    pub fn list_categories(&self) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        Ok(names)
    }

    /// PDF files within one category, in filesystem enumeration order.
    /// The display name drops the `.pdf` suffix and turns underscores into
    /// spaces; the file field is the public download URL.
    pub fn list_reports(&self, category: &str) -> Result<Vec<Report>, CatalogError> {
        let dir = self.resolve_category(category)?;
        let mut reports = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.to_lowercase().ends_with(".pdf") {
                continue;
            }
            let display = file_name[..file_name.len() - 4].replace('_', " ");
            let file = format!(
                "{}/{}/{}",
                self.public_prefix,
                urlencoding::encode(category),
                urlencoding::encode(&file_name)
            );
            reports.push(Report {
                name: display,
                file,
            });
        }
        Ok(reports)
    }

    // Category names come straight from the query string, so the joined
    // path must still sit under the root after canonicalization.
    fn resolve_category(&self, category: &str) -> Result<PathBuf, CatalogError> {
        let dir = self.root.join(category).canonicalize()?;
        let root = self.root.canonicalize()?;
        if !dir.starts_with(&root) {
            return Err(CatalogError::OutsideRoot);
        }
        Ok(dir)
    }
}
