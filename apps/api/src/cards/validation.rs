//! Size limits for a career card document.
//!
//! Every violation is collected so the client can fix them in one pass.

use crate::cards::models::CareerCardData;
use crate::errors::AppError;
use crate::validation::{check_max_length, validate_url};

pub const SHORT_TEXT: usize = 100;
pub const MEDIUM_TEXT: usize = 500;
pub const LONG_TEXT: usize = 2_000;
pub const URL_TEXT: usize = 500;
pub const CODE_TEXT: usize = 50_000;

pub const MAX_EXPERIENCE: usize = 20;
pub const MAX_PROJECTS: usize = 20;
pub const MAX_CERTIFICATIONS: usize = 20;
pub const MAX_IMPACTS: usize = 10;
pub const MAX_WORK_STYLES: usize = 20;
pub const MAX_FRAMEWORKS: usize = 30;
pub const MAX_PASTIMES: usize = 10;
pub const MAX_CODE_SNIPPETS: usize = 10;

#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn text(&mut self, value: &str, max: usize, field: impl AsRef<str>) {
        if let Err(AppError::Validation(msg)) = check_max_length(value, max, field.as_ref()) {
            self.0.push(msg);
        }
    }

    /// Empty is allowed; anything else must be a short http(s) URL.
    fn url(&mut self, value: &str, field: impl AsRef<str>) {
        if value.trim().is_empty() {
            return;
        }
        let field = field.as_ref();
        self.text(value, URL_TEXT, field);
        if let Err(AppError::Validation(msg)) = validate_url(value, &[], field) {
            self.0.push(msg);
        }
    }

    fn count(&mut self, len: usize, max: usize, section: &str) {
        if len > max {
            self.0.push(format!("Maximum {max} {section} entries allowed"));
        }
    }
}

/// Validates every field limit of a card.
pub fn validate_card(card: &CareerCardData) -> Result<(), AppError> {
    let mut v = Violations::default();

    let p = &card.profile;
    v.text(&p.name, SHORT_TEXT, "profile.name");
    v.text(&p.title, SHORT_TEXT, "profile.title");
    v.text(&p.location, SHORT_TEXT, "profile.location");
    v.url(&p.image_url, "profile.imageUrl");
    v.url(&p.portfolio_url, "profile.portfolioUrl");

    v.count(card.experience.len(), MAX_EXPERIENCE, "experience");
    for (i, e) in card.experience.iter().enumerate() {
        v.text(&e.title, SHORT_TEXT, format!("experience[{i}].title"));
        v.text(&e.company, SHORT_TEXT, format!("experience[{i}].company"));
        v.text(&e.period, SHORT_TEXT, format!("experience[{i}].period"));
        v.text(&e.description, LONG_TEXT, format!("experience[{i}].description"));
    }

    v.count(card.projects.len(), MAX_PROJECTS, "project");
    for (i, p) in card.projects.iter().enumerate() {
        v.text(&p.name, SHORT_TEXT, format!("projects[{i}].name"));
        v.text(&p.description, LONG_TEXT, format!("projects[{i}].description"));
        v.text(&p.technologies, MEDIUM_TEXT, format!("projects[{i}].technologies"));
        v.url(&p.url, format!("projects[{i}].url"));
    }

    v.count(card.certifications.len(), MAX_CERTIFICATIONS, "certification");
    for (i, c) in card.certifications.iter().enumerate() {
        v.text(&c.name, SHORT_TEXT, format!("certifications[{i}].name"));
        v.text(&c.issuer, SHORT_TEXT, format!("certifications[{i}].issuer"));
        v.text(&c.date, SHORT_TEXT, format!("certifications[{i}].date"));
        v.url(&c.url, format!("certifications[{i}].url"));
    }

    v.count(card.greatest_impacts.len(), MAX_IMPACTS, "impact");
    for (i, g) in card.greatest_impacts.iter().enumerate() {
        v.text(&g.title, SHORT_TEXT, format!("greatestImpacts[{i}].title"));
        v.text(&g.context, LONG_TEXT, format!("greatestImpacts[{i}].context"));
        v.text(&g.outcome, LONG_TEXT, format!("greatestImpacts[{i}].outcome"));
    }

    v.count(card.styles_of_work.len(), MAX_WORK_STYLES, "work style");
    for (i, s) in card.styles_of_work.iter().enumerate() {
        v.text(&s.question, MEDIUM_TEXT, format!("stylesOfWork[{i}].question"));
        v.text(
            &s.selected_answer,
            MEDIUM_TEXT,
            format!("stylesOfWork[{i}].selectedAnswer"),
        );
    }

    v.count(card.frameworks.len(), MAX_FRAMEWORKS, "framework");
    for (i, f) in card.frameworks.iter().enumerate() {
        v.text(&f.name, SHORT_TEXT, format!("frameworks[{i}].name"));
        v.text(&f.projects_built, SHORT_TEXT, format!("frameworks[{i}].projectsBuilt"));
    }

    v.count(card.pastimes.len(), MAX_PASTIMES, "pastime");
    for (i, p) in card.pastimes.iter().enumerate() {
        v.text(&p.activity, SHORT_TEXT, format!("pastimes[{i}].activity"));
        v.text(&p.description, LONG_TEXT, format!("pastimes[{i}].description"));
    }

    v.count(card.code_showcase.len(), MAX_CODE_SNIPPETS, "code snippet");
    for (i, c) in card.code_showcase.iter().enumerate() {
        v.text(&c.file_name, SHORT_TEXT, format!("codeShowcase[{i}].fileName"));
        v.text(&c.language, SHORT_TEXT, format!("codeShowcase[{i}].language"));
        v.text(&c.repo, SHORT_TEXT, format!("codeShowcase[{i}].repo"));
        v.url(&c.url, format!("codeShowcase[{i}].url"));
        v.text(&c.caption, MEDIUM_TEXT, format!("codeShowcase[{i}].caption"));
        v.text(&c.code, CODE_TEXT, format!("codeShowcase[{i}].code"));
    }

    if v.0.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(v.0.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::models::{CodeSnippet, ExperienceItem, PastimeItem, Profile, ProjectItem};

    fn valid_card() -> CareerCardData {
        CareerCardData {
            profile: Profile {
                name: "Jane Doe".to_string(),
                title: "Staff Engineer".to_string(),
                location: "Lisbon".to_string(),
                image_url: String::new(),
                portfolio_url: "https://jane.dev".to_string(),
            },
            experience: vec![ExperienceItem {
                id: Some("e1".to_string()),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                period: "2020 - Present".to_string(),
                description: "Built the billing pipeline.".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_card_passes() {
        assert!(validate_card(&valid_card()).is_ok());
    }

    #[test]
    fn test_empty_card_passes() {
        assert!(validate_card(&CareerCardData::default()).is_ok());
    }

    #[test]
    fn test_long_name_rejected() {
        let mut card = valid_card();
        card.profile.name = "x".repeat(SHORT_TEXT + 1);
        let err = validate_card(&card).unwrap_err();
        assert!(err.to_string().contains("profile.name"));
    }

    #[test]
    fn test_too_many_pastimes_rejected() {
        let mut card = valid_card();
        card.pastimes = vec![PastimeItem::default(); MAX_PASTIMES + 1];
        let err = validate_card(&card).unwrap_err();
        assert!(err.to_string().contains("Maximum 10 pastime entries"));
    }

    #[test]
    fn test_bad_project_url_rejected() {
        let mut card = valid_card();
        card.projects.push(ProjectItem {
            name: "Site".to_string(),
            url: "ftp://files.example.com".to_string(),
            ..Default::default()
        });
        let err = validate_card(&card).unwrap_err();
        assert!(err.to_string().contains("projects[0].url"));
    }

    #[test]
    fn test_code_snippet_limit() {
        let mut card = valid_card();
        card.code_showcase.push(CodeSnippet {
            file_name: "main.rs".to_string(),
            language: "rust".to_string(),
            code: "a".repeat(CODE_TEXT),
            ..Default::default()
        });
        assert!(validate_card(&card).is_ok());
        card.code_showcase[0].code.push('a');
        assert!(validate_card(&card).is_err());
    }

    #[test]
    fn test_all_violations_reported() {
        let mut card = valid_card();
        card.profile.title = "t".repeat(SHORT_TEXT + 1);
        card.experience[0].description = "d".repeat(LONG_TEXT + 1);
        let msg = validate_card(&card).unwrap_err().to_string();
        assert!(msg.contains("profile.title"));
        assert!(msg.contains("experience[0].description"));
    }
}
