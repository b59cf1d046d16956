use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use histolab_types::{
    Case, DesignId, InsurerSnapshot, LabIdentity, PatientRef, ProviderRef, ReportLine, StudyType,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DesignConfig;
use crate::design::DesignRegistry;
use crate::error::ComposeError;

/// One section of a composed document: heading plus its ordered text lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub code: String,
    pub heading: String,
    pub lines: Vec<String>,
}

/// A render-agnostic document, ready for an external PDF/HTML renderer.
///
/// Carries the ordered content and the effective layout configuration; no
/// pixel or markup decisions are made here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderableDocument {
    pub case_number: String,
    pub study: StudyType,
    pub title: String,
    pub subtitle: String,
    pub intake_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub patient_ref: PatientRef,
    pub provider_ref: Option<ProviderRef>,
    pub insurer: Option<InsurerSnapshot>,
    pub clinical_notes: String,
    pub sections: Vec<RenderedSection>,
    pub config: DesignConfig,
    pub lab: LabIdentity,
}

/// Assembles documents from a case's fragment selections and a design.
///
/// The laboratory identity is injected at construction - the composer never
/// reads ambient global state.
pub struct Composer {
    lab: LabIdentity,
    designs: Arc<DesignRegistry>,
}

impl Composer {
    pub fn new(lab: LabIdentity, designs: Arc<DesignRegistry>) -> Self {
        Self { lab, designs }
    }

    pub fn lab(&self) -> &LabIdentity {
        &self.lab
    }

    /// Compose from the case's persisted fragment selections.
    pub fn compose(
        &self,
        case: &Case,
        design: Option<DesignId>,
    ) -> Result<RenderableDocument, ComposeError> {
        self.compose_with_lines(case, &case.report_lines, design)
    }

    /// Compose with an explicit line set (unsaved editor state), bypassing the
    /// case's persisted selections.
    pub fn compose_with_lines(
        &self,
        case: &Case,
        lines: &[ReportLine],
        design: Option<DesignId>,
    ) -> Result<RenderableDocument, ComposeError> {
        let sections = group_sections(case.study, lines);
        let config = self.effective_config(case.study, design)?;

        let title = config
            .header
            .title
            .clone()
            .unwrap_or_else(|| case.study.report_title().to_string());
        let subtitle = config
            .header
            .subtitle
            .clone()
            .unwrap_or_else(|| case.study.report_subtitle().to_string());

        debug!(case = %case.number, sections = sections.len(), "composed document");

        Ok(RenderableDocument {
            case_number: case.number.to_string(),
            study: case.study,
            title,
            subtitle,
            intake_date: case.intake_date,
            completion_date: case.completion_date,
            patient_ref: case.patient_ref.clone(),
            provider_ref: case.provider_ref.clone(),
            insurer: case.insurer_snapshot.clone(),
            clinical_notes: case.clinical_notes.clone(),
            sections,
            config,
            lab: self.lab.clone(),
        })
    }

    /// Resolve the effective configuration: the requested design if present,
    /// else the study's default design, else the built-in defaults.
    fn effective_config(
        &self,
        study: StudyType,
        design: Option<DesignId>,
    ) -> Result<DesignConfig, ComposeError> {
        if let Some(id) = design {
            match self.designs.get(id)? {
                Some(design) => return Ok(design.effective_config()),
                None => {
                    warn!(design = %id, "requested design not found; falling back to default");
                }
            }
        }
        Ok(match self.designs.default_for(study)? {
            Some(design) => design.effective_config(),
            None => DesignConfig::default(),
        })
    }
}

/// Group fragment selections by section, canonical order first.
///
/// Sections outside the canonical list are appended in storage order; a
/// section with zero non-blank lines is omitted entirely.
fn group_sections(study: StudyType, lines: &[ReportLine]) -> Vec<RenderedSection> {
    let mut by_section: HashMap<&str, Vec<&ReportLine>> = HashMap::new();
    let mut storage_order: Vec<&str> = Vec::new();

    for line in lines {
        if line.text.trim().is_empty() {
            continue;
        }
        let entry = by_section.entry(line.section.as_str()).or_default();
        if entry.is_empty() {
            storage_order.push(line.section.as_str());
        }
        entry.push(line);
    }

    let canonical = study.section_order();
    let mut ordered: Vec<&str> = canonical
        .iter()
        .copied()
        .filter(|code| by_section.contains_key(code))
        .collect();
    for code in storage_order {
        if !canonical.iter().any(|c| *c == code) {
            ordered.push(code);
        }
    }

    ordered
        .into_iter()
        .map(|code| {
            let mut selected = by_section.remove(code).unwrap_or_default();
            selected.sort_by_key(|line| line.position);
            RenderedSection {
                code: code.to_string(),
                heading: heading_for(study, code),
                lines: selected.into_iter().map(|line| line.text.clone()).collect(),
            }
        })
        .collect()
}

fn heading_for(study: StudyType, code: &str) -> String {
    match study.section_heading(code) {
        Some(heading) => heading.to_string(),
        None => code.replace('_', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use histolab_types::{CaseId, CaseNumber, CaseStatus};

    fn case(study: StudyType, lines: Vec<ReportLine>) -> Case {
        let now = Utc::now();
        Case {
            id: CaseId::new(),
            number: CaseNumber::assigned(study, 2025, 7),
            study,
            status: CaseStatus::InProgress,
            is_draft: false,
            patient_ref: PatientRef("patient-9".into()),
            provider_ref: Some(ProviderRef("dr-suarez".into())),
            insurer_ref: None,
            insurer_snapshot: None,
            clinical_notes: "routine control".into(),
            admission_kind: Default::default(),
            with_order: false,
            intake_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            completion_date: None,
            completing_actor: None,
            report_lines: lines,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(section: &str, text: &str, position: u32) -> ReportLine {
        ReportLine {
            section: section.into(),
            text: text.into(),
            position,
        }
    }

    fn composer() -> (Composer, Arc<DesignRegistry>) {
        let designs = Arc::new(DesignRegistry::new());
        (
            Composer::new(LabIdentity::default(), Arc::clone(&designs)),
            designs,
        )
    }

    #[test]
    fn sections_follow_canonical_order() {
        let (composer, _) = composer();
        let case = case(
            StudyType::CervicalCytology,
            vec![
                line("DIAGNOSIS", "Negative for intraepithelial lesion.", 0),
                line("SMEAR", "Adequate smear.", 0),
                line("CLINICAL_DATA", "Routine control.", 0),
            ],
        );

        let document = composer.compose(&case, None).unwrap();
        let codes: Vec<_> = document.sections.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["CLINICAL_DATA", "SMEAR", "DIAGNOSIS"]);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let (composer, _) = composer();
        let case = case(
            StudyType::TissueBiopsy,
            vec![
                line("DIAGNOSIS", "Chronic gastritis.", 0),
                line("MACROSCOPIC_DESCRIPTION", "   ", 0),
            ],
        );

        let document = composer.compose(&case, None).unwrap();
        let codes: Vec<_> = document.sections.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["DIAGNOSIS"]);
    }

    #[test]
    fn unknown_sections_append_in_storage_order() {
        let (composer, _) = composer();
        let case = case(
            StudyType::TissueBiopsy,
            vec![
                line("ADDENDUM", "Immunohistochemistry pending.", 0),
                line("DIAGNOSIS", "Adenocarcinoma.", 0),
                line("SPECIAL_STAINS", "PAS positive.", 0),
            ],
        );

        let document = composer.compose(&case, None).unwrap();
        let codes: Vec<_> = document.sections.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["DIAGNOSIS", "ADDENDUM", "SPECIAL_STAINS"]);
        assert_eq!(document.sections[1].heading, "ADDENDUM");
        assert_eq!(document.sections[2].heading, "SPECIAL STAINS");
    }

    #[test]
    fn lines_within_a_section_sort_by_position() {
        let (composer, _) = composer();
        let case = case(
            StudyType::TissueBiopsy,
            vec![
                line("DIAGNOSIS", "second", 2),
                line("DIAGNOSIS", "first", 1),
            ],
        );

        let document = composer.compose(&case, None).unwrap();
        assert_eq!(document.sections[0].lines, vec!["first", "second"]);
    }

    #[test]
    fn headings_come_from_the_study_mapping() {
        let (composer, _) = composer();
        let case = case(
            StudyType::CervicalCytology,
            vec![line("CELL_MORPHOLOGY", "Superficial cells.", 0)],
        );
        let document = composer.compose(&case, None).unwrap();
        assert_eq!(document.sections[0].heading, "CYTOLOGIC DESCRIPTION");
    }

    #[test]
    fn default_title_comes_from_study() {
        let (composer, _) = composer();
        let document = composer
            .compose(&case(StudyType::TissueBiopsy, vec![]), None)
            .unwrap();
        assert_eq!(document.title, "ANATOMIC PATHOLOGY REPORT");
        assert_eq!(document.config, DesignConfig::default());
    }

    #[test]
    fn design_header_overrides_title() {
        let (composer, designs) = composer();
        let design = designs
            .create(
                "Letterhead",
                StudyType::TissueBiopsy,
                r#"{ "header": { "title": "SURGICAL PATHOLOGY" } }"#,
            )
            .unwrap();

        let document = composer
            .compose(&case(StudyType::TissueBiopsy, vec![]), Some(design.id))
            .unwrap();
        assert_eq!(document.title, "SURGICAL PATHOLOGY");
        // Untouched header keys keep their defaults.
        assert_eq!(document.config.header.lab_name_size, 24);
    }

    #[test]
    fn study_default_design_applies_when_none_requested() {
        let (composer, designs) = composer();
        let design = designs
            .create(
                "House style",
                StudyType::TissueBiopsy,
                r#"{ "margins": { "top": 42 } }"#,
            )
            .unwrap();
        designs.set_default(design.id).unwrap();

        let document = composer
            .compose(&case(StudyType::TissueBiopsy, vec![]), None)
            .unwrap();
        assert_eq!(document.config.margins.top, 42);
    }

    #[test]
    fn missing_requested_design_falls_back() {
        let (composer, _) = composer();
        let document = composer
            .compose(&case(StudyType::TissueBiopsy, vec![]), Some(DesignId::new()))
            .unwrap();
        assert_eq!(document.config, DesignConfig::default());
    }

    #[test]
    fn malformed_design_never_fails_composition() {
        let (composer, designs) = composer();
        let design = designs
            .create("Broken", StudyType::TissueBiopsy, "{ oops")
            .unwrap();

        let document = composer
            .compose(
                &case(
                    StudyType::TissueBiopsy,
                    vec![line("DIAGNOSIS", "Benign.", 0)],
                ),
                Some(design.id),
            )
            .unwrap();
        assert_eq!(document.config, DesignConfig::default());
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn editor_lines_override_persisted_selections() {
        let (composer, _) = composer();
        let case = case(
            StudyType::TissueBiopsy,
            vec![line("DIAGNOSIS", "persisted", 0)],
        );

        let preview = vec![line("DIAGNOSIS", "unsaved edit", 0)];
        let document = composer.compose_with_lines(&case, &preview, None).unwrap();
        assert_eq!(document.sections[0].lines, vec!["unsaved edit"]);
    }
}
