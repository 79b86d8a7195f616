//! Resume / profile import: one multimodal call that turns a resume file
//! and profile links into profile, experience and certifications.

use serde::{Deserialize, Serialize};

use crate::autofill::prompts::{resume_tool, RESUME_PROMPT_HEADER, RESUME_SYSTEM};
use crate::cards::models::{reshape_items, CertificationItem, ExperienceItem};
use crate::errors::AppError;
use crate::llm_client::prompts::EXTRACTION_RULES;
use crate::llm_client::{ChatMessage, ContentPart, ImageUrl, LlmClient};
use crate::validation::{check_max_length, validate_url};

/// A 20 MB file, base64-encoded into a data URL.
pub const MAX_FILE_DATA_CHARS: usize = 28 * 1024 * 1024;
pub const MAX_FILE_NAME_CHARS: usize = 255;
pub const MAX_PROFILE_URL_CHARS: usize = 500;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub name: String,
    pub title: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeImport {
    pub profile: ResumeProfile,
    pub experience: Vec<ExperienceItem>,
    pub certifications: Vec<CertificationItem>,
}

/// Request inputs after validation. Blank strings are treated as absent.
#[derive(Debug, PartialEq)]
pub struct ResumeSources {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ParseResumeRequest {
    pub fn validate(self) -> Result<ResumeSources, AppError> {
        let sources = ResumeSources {
            file_data: non_blank(self.file_data),
            file_name: non_blank(self.file_name),
            linkedin_url: non_blank(self.linkedin_url),
            github_url: non_blank(self.github_url),
        };

        if sources.file_data.is_none()
            && sources.linkedin_url.is_none()
            && sources.github_url.is_none()
        {
            return Err(AppError::Validation(
                "Provide a resume file, a LinkedIn URL, or a GitHub URL".to_string(),
            ));
        }

        if let Some(data) = &sources.file_data {
            check_max_length(data, MAX_FILE_DATA_CHARS, "fileData")?;
            if !data.starts_with("data:") {
                return Err(AppError::Validation(
                    "fileData must be a data URL".to_string(),
                ));
            }
        }
        if let Some(name) = &sources.file_name {
            check_max_length(name, MAX_FILE_NAME_CHARS, "fileName")?;
        }
        if let Some(url) = &sources.linkedin_url {
            check_max_length(url, MAX_PROFILE_URL_CHARS, "linkedinUrl")?;
            validate_url(url, &["linkedin.com"], "linkedinUrl")?;
        }
        if let Some(url) = &sources.github_url {
            check_max_length(url, MAX_PROFILE_URL_CHARS, "githubUrl")?;
            validate_url(url, &["github.com"], "githubUrl")?;
        }

        Ok(sources)
    }
}

pub fn build_resume_messages(sources: &ResumeSources) -> Vec<ChatMessage> {
    let mut text = format!("{RESUME_PROMPT_HEADER}\n\n");
    if let Some(url) = &sources.linkedin_url {
        text.push_str(&format!("LinkedIn URL: {url}\n"));
    }
    if let Some(url) = &sources.github_url {
        text.push_str(&format!("GitHub URL: {url}\n"));
    }
    if let Some(name) = &sources.file_name {
        text.push_str(&format!("Attached file: {name}\n"));
    }

    let mut parts = vec![ContentPart::Text { text }];
    if let Some(data) = &sources.file_data {
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl { url: data.clone() },
        });
    }

    vec![
        ChatMessage::system(format!("{RESUME_SYSTEM}\n\n{EXTRACTION_RULES}")),
        ChatMessage::user_parts(parts),
    ]
}

/// Runs the import. An unparseable reply is an error: there is no sensible
/// empty profile to fall back to.
pub async fn parse_resume(
    sources: &ResumeSources,
    llm: &LlmClient,
) -> Result<ResumeImport, AppError> {
    let messages = build_resume_messages(sources);
    let parsed: ResumeImport = llm
        .call_tool(&messages, &resume_tool())
        .await
        .map_err(AppError::from)?;
    Ok(reshape_resume(parsed))
}

pub fn reshape_resume(parsed: ResumeImport) -> ResumeImport {
    ResumeImport {
        profile: ResumeProfile {
            name: parsed.profile.name.trim().to_string(),
            title: parsed.profile.title.trim().to_string(),
            location: parsed.profile.location.trim().to_string(),
        },
        experience: reshape_items(parsed.experience),
        certifications: reshape_items(parsed.certifications),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MessageContent;

    fn request() -> ParseResumeRequest {
        ParseResumeRequest::default()
    }

    #[test]
    fn test_requires_at_least_one_source() {
        let err = request().validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_blank_sources_count_as_missing() {
        let req = ParseResumeRequest {
            linkedin_url: Some("   ".to_string()),
            github_url: Some(String::new()),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_linkedin_must_be_linkedin() {
        let req = ParseResumeRequest {
            linkedin_url: Some("https://example.com/in/jane".to_string()),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_file_data_must_be_data_url() {
        let req = ParseResumeRequest {
            file_data: Some("JVBERi0xLjQK".to_string()),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_sources_pass() {
        let req = ParseResumeRequest {
            file_data: Some("data:application/pdf;base64,JVBERi0xLjQK".to_string()),
            file_name: Some("cv.pdf".to_string()),
            github_url: Some("https://github.com/jane".to_string()),
            ..request()
        };
        let sources = req.validate().unwrap();
        assert_eq!(sources.file_name.as_deref(), Some("cv.pdf"));
        assert!(sources.linkedin_url.is_none());
    }

    #[test]
    fn test_messages_attach_file_as_image_part() {
        let sources = ResumeSources {
            file_data: Some("data:application/pdf;base64,AAAA".to_string()),
            file_name: None,
            linkedin_url: Some("https://linkedin.com/in/jane".to_string()),
            github_url: None,
        };
        let messages = build_resume_messages(&sources);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");

        let MessageContent::Parts(parts) = &messages[1].content else {
            panic!("user message should be multimodal");
        };
        assert_eq!(parts.len(), 2);
        match &parts[0] {
            ContentPart::Text { text } => assert!(text.contains("LinkedIn URL: https://linkedin.com/in/jane")),
            other => panic!("unexpected part {other:?}"),
        }
        assert!(matches!(&parts[1], ContentPart::ImageUrl { image_url } if image_url.url.starts_with("data:")));
    }

    #[test]
    fn test_reshape_resume_assigns_ids() {
        let parsed = ResumeImport {
            profile: ResumeProfile {
                name: " Jane Doe ".to_string(),
                ..Default::default()
            },
            experience: vec![ExperienceItem {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            }],
            certifications: vec![CertificationItem {
                name: "CKA".to_string(),
                issuer: "CNCF".to_string(),
                ..Default::default()
            }],
        };
        let out = reshape_resume(parsed);
        assert_eq!(out.profile.name, "Jane Doe");
        assert!(out.experience[0].id.is_some());
        assert!(out.certifications[0].id.is_some());
    }
}
