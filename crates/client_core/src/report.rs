use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use shared::{
    assessment::{AssessmentDraft, AssessmentResult},
    domain::{Purpose, TrustBand},
};

use crate::evidence::{coverage_months, REQUIRED_COVERAGE_MONTHS};

/// Visual emphasis for a band, from the most to the least cautious.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandTone {
    Limited,
    Caution,
    Developing,
    Strong,
    Excellent,
}

impl From<TrustBand> for BandTone {
    fn from(band: TrustBand) -> Self {
        match band {
            TrustBand::T1 => BandTone::Limited,
            TrustBand::T2 => BandTone::Caution,
            TrustBand::T3 => BandTone::Developing,
            TrustBand::T4 => BandTone::Strong,
            TrustBand::T5 => BandTone::Excellent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportView<'a> {
    result: &'a AssessmentResult,
    purpose: Option<Purpose>,
    evidence_files: usize,
    coverage: u32,
    generated_at: DateTime<Utc>,
}

impl<'a> ReportView<'a> {
    pub fn new(result: &'a AssessmentResult, draft: &AssessmentDraft) -> Self {
        Self {
            result,
            purpose: draft.purpose,
            evidence_files: draft.evidence.len(),
            coverage: coverage_months(&draft.evidence),
            generated_at: Utc::now(),
        }
    }

    pub fn band_code(&self) -> &'static str {
        self.result.trust_band().code()
    }

    pub fn band_title(&self) -> &'static str {
        self.result.trust_band().title()
    }

    pub fn tone(&self) -> BandTone {
        self.result.trust_band().into()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Your Trust Profile");
        let _ = writeln!(
            out,
            "Generated using behavioral, financial, and evidence-based analysis"
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}  {}", self.band_code(), self.band_title());
        let _ = writeln!(out, "  {}", self.result.interpretation());
        let _ = writeln!(out);
        if let Some(purpose) = self.purpose {
            let _ = writeln!(out, "Credit purpose: {}", purpose.label());
        }
        let _ = writeln!(
            out,
            "Evidence: {} file(s), {} of {} months",
            self.evidence_files, self.coverage, REQUIRED_COVERAGE_MONTHS
        );
        let _ = writeln!(
            out,
            "Traditional credit alignment: {}",
            self.result.traditional_alignment()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Why this band:");
        for reason in self.result.reasoning() {
            let _ = writeln!(out, "  - {reason}");
        }
        let _ = writeln!(out);
        let _ = write!(
            out,
            "Generated {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        out
    }
}
