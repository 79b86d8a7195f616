use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The full career card document, stored as one JSON blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerCardData {
    pub profile: Profile,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<ProjectItem>,
    pub certifications: Vec<CertificationItem>,
    pub greatest_impacts: Vec<ImpactItem>,
    pub styles_of_work: Vec<WorkStyleAnswer>,
    pub frameworks: Vec<FrameworkItem>,
    pub pastimes: Vec<PastimeItem>,
    pub code_showcase: Vec<CodeSnippet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<CardTheme>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub image_url: String,
    pub portfolio_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    /// Comma-separated.
    pub technologies: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub context: String,
    pub outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkStyleAnswer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub selected_answer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    /// Maps free-form labels ("advanced", " EXPERT ") onto a level.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" | "novice" | "basic" => Some(Proficiency::Beginner),
            "intermediate" | "proficient" | "familiar" => Some(Proficiency::Intermediate),
            "advanced" => Some(Proficiency::Advanced),
            "expert" => Some(Proficiency::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub proficiency: Proficiency,
    pub projects_built: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PastimeItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub activity: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeSnippet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub file_name: String,
    pub language: String,
    pub repo: String,
    pub url: String,
    pub caption: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    Blue,
    Purple,
    Green,
    Orange,
    Pink,
    Slate,
}

// ────────────────────────────────────────────────────────────────────────────
// List-item reshaping for LLM output
// ────────────────────────────────────────────────────────────────────────────

/// A card list entry that can be produced by an AI parser.
pub trait CardItem {
    fn set_id(&mut self, id: String);
    /// Trims surrounding whitespace from every text field.
    fn tidy(&mut self);
    /// True when the entry carries nothing worth showing.
    fn is_blank(&self) -> bool;
}

fn trim_in_place(field: &mut String) {
    let trimmed = field.trim();
    if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}

impl CardItem for ExperienceItem {
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn tidy(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.company);
        trim_in_place(&mut self.period);
        trim_in_place(&mut self.description);
    }

    fn is_blank(&self) -> bool {
        self.title.is_empty() && self.company.is_empty()
    }
}

impl CardItem for ProjectItem {
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn tidy(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.description);
        trim_in_place(&mut self.technologies);
        trim_in_place(&mut self.url);
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

impl CardItem for CertificationItem {
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn tidy(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.issuer);
        trim_in_place(&mut self.date);
        trim_in_place(&mut self.url);
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

impl CardItem for FrameworkItem {
    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn tidy(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.projects_built);
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

/// Tidies parsed entries, drops blank ones and attaches fresh ids.
/// Any id the model invented is overwritten.
pub fn reshape_items<T: CardItem>(items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|mut item| {
            item.tidy();
            if item.is_blank() {
                return None;
            }
            item.set_id(Uuid::new_v4().to_string());
            Some(item)
        })
        .collect()
}
