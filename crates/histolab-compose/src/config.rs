use serde::{Deserialize, Serialize};

/// Effective layout configuration of a composed document.
///
/// Stored designs hold only overrides of this tree; the composer fills the
/// rest from [`DesignConfig::default`]. Every block is `#[serde(default)]` so
/// a partial blob deserializes, and the recursive merge guarantees keys added
/// after a design was saved come back with their built-in values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub margins: Margins,
    /// Vertical space reserved for pre-printed letterhead, in mm. Zero for
    /// plain paper.
    pub letterhead_space: u32,
    pub header: HeaderConfig,
    pub case_data: CaseDataConfig,
    pub custom_texts: CustomTexts,
    pub sections: SectionStyle,
    pub print: PrintConfig,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            letterhead_space: 0,
            header: HeaderConfig::default(),
            case_data: CaseDataConfig::default(),
            custom_texts: CustomTexts::default(),
            sections: SectionStyle::default(),
            print: PrintConfig::default(),
        }
    }
}

/// Page margins in mm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20,
            bottom: 20,
            left: 20,
            right: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub show_logo: bool,
    pub logo_width: u32,
    pub logo_height: u32,
    pub logo_position: String,
    pub logo_margin_right: u32,
    /// Overrides the study's default report title when set.
    pub title: Option<String>,
    /// Overrides the study's default report subtitle when set.
    pub subtitle: Option<String>,
    pub lab_name_font: String,
    pub lab_name_size: u32,
    pub lab_name_color: String,
    pub title_font: String,
    pub title_size: u32,
    pub title_color: String,
    pub subtitle_font: String,
    pub subtitle_size: u32,
    pub subtitle_color: String,
    pub title_alignment: String,
    pub bottom_padding: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            show_logo: true,
            logo_width: 240,
            logo_height: 240,
            logo_position: "left".into(),
            logo_margin_right: 20,
            title: None,
            subtitle: None,
            lab_name_font: "Arial".into(),
            lab_name_size: 24,
            lab_name_color: "#007bff".into(),
            title_font: "Arial".into(),
            title_size: 18,
            title_color: "#333".into(),
            subtitle_font: "Arial".into(),
            subtitle_size: 14,
            subtitle_color: "#666".into(),
            title_alignment: "center".into(),
            bottom_padding: 5,
        }
    }
}

/// The block of case data (number, dates, patient, physician) under the
/// header, including its editable labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseDataConfig {
    pub show: bool,
    pub columns: u32,
    pub spacing: u32,
    pub padding: u32,
    pub background: String,
    pub bottom_margin: u32,
    pub case_label: String,
    pub date_label: String,
    pub patient_label: String,
    pub id_label: String,
    pub age_label: String,
    pub insurer_label: String,
    pub physician_label: String,
    pub specialty_label: String,
    pub case_group_title: String,
    pub patient_group_title: String,
    pub physician_group_title: String,
}

impl Default for CaseDataConfig {
    fn default() -> Self {
        Self {
            show: true,
            columns: 3,
            spacing: 20,
            padding: 15,
            background: "#f8f9fa".into(),
            bottom_margin: 30,
            case_label: "Case:".into(),
            date_label: "Date:".into(),
            patient_label: "Patient:".into(),
            id_label: "ID:".into(),
            age_label: "Age:".into(),
            insurer_label: "Insurer:".into(),
            physician_label: "Physician:".into(),
            specialty_label: "Specialty:".into(),
            case_group_title: "CASE AND DATE".into(),
            patient_group_title: "PATIENT DATA".into(),
            physician_group_title: "PHYSICIAN DATA".into(),
        }
    }
}

/// Where an extra free text is placed on the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Header,
    Footer,
    AfterCaseData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraText {
    pub text: String,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTexts {
    pub signature_text: String,
    pub show_signature: bool,
    /// Footer line; when empty, renderers fall back to the lab identity.
    pub footer_text: String,
    pub show_footer: bool,
    pub extra_texts: Vec<ExtraText>,
}

impl Default for CustomTexts {
    fn default() -> Self {
        Self {
            signature_text: "Dr. [Physician Name]\nPathologist\nLicense: [Number]".into(),
            show_signature: true,
            footer_text: String::new(),
            show_footer: true,
            extra_texts: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionStyle {
    pub spacing_between: u32,
    pub title_font: String,
    pub title_size: u32,
    pub title_bold: bool,
    pub title_color: String,
    pub title_background: String,
    pub content_font: String,
    pub content_size: u32,
    pub content_color: String,
    pub line_height: f64,
    pub section_padding: String,
    pub bottom_margin: u32,
    pub indentation: u32,
    pub show_bullets: bool,
    pub bullet_color: String,
    pub content_alignment: String,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            spacing_between: 20,
            title_font: "Arial".into(),
            title_size: 12,
            title_bold: true,
            title_color: "#007bff".into(),
            title_background: "#e3f2fd".into(),
            content_font: "Arial".into(),
            content_size: 12,
            content_color: "#333".into(),
            line_height: 1.4,
            section_padding: "8px 12px".into(),
            bottom_margin: 15,
            indentation: 15,
            show_bullets: true,
            bullet_color: "#007bff".into(),
            content_alignment: "left".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub paper_size: String,
    pub orientation: String,
    pub scale: u32,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            paper_size: "A4".into(),
            orientation: "portrait".into(),
            scale: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_blob_deserializes_with_defaults() {
        let config: DesignConfig =
            serde_json::from_str(r#"{ "margins": { "top": 35 } }"#).unwrap();
        assert_eq!(config.margins.top, 35);
        assert_eq!(config.margins.bottom, 20);
        assert_eq!(config.print.paper_size, "A4");
        assert!(config.header.title.is_none());
    }

    #[test]
    fn default_round_trips_through_json() {
        let config = DesignConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DesignConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn placement_uses_snake_case() {
        let text = ExtraText {
            text: "Reviewed".into(),
            placement: Placement::AfterCaseData,
        };
        let json = serde_json::to_string(&text).unwrap();
        assert!(json.contains("after_case_data"));
    }
}
