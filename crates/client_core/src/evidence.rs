use std::path::Path;

use shared::{assessment::EvidenceFile, domain::EvidenceCategory};

/// Coverage needed before the core trust form can be submitted; also the cap.
pub const REQUIRED_COVERAGE_MONTHS: u32 = 6;

/// Every uploaded document is assumed to cover a single month.
pub const MONTHS_PER_FILE: u32 = 1;

/// A file the applicant picked. Only its name and type are ever looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mime_type = guess_mime(Path::new(&name));
        Self { name, mime_type }
    }

    /// Takes name and type from the path without opening the file.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime_type: guess_mime(path),
        }
    }
}

fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// One evidence record per input file. No de-duplication, no content checks.
pub fn record_upload<I>(files: I, category: EvidenceCategory) -> Vec<EvidenceFile>
where
    I: IntoIterator<Item = UploadedFile>,
{
    files
        .into_iter()
        .map(|file| EvidenceFile {
            name: file.name,
            category,
            mime_type: file.mime_type,
            months_covered: MONTHS_PER_FILE,
        })
        .collect()
}

pub fn coverage_months(evidence: &[EvidenceFile]) -> u32 {
    evidence
        .iter()
        .fold(0u32, |total, file| total.saturating_add(file.months_covered))
        .min(REQUIRED_COVERAGE_MONTHS)
}

pub fn coverage_complete(evidence: &[EvidenceFile]) -> bool {
    coverage_months(evidence) >= REQUIRED_COVERAGE_MONTHS
}
