//! Input validators shared by every handler.
//!
//! Lengths are counted in characters, not bytes, so multi-byte names are not
//! penalised.

use url::Url;

use crate::errors::AppError;

/// Rejects text that is empty after trimming or longer than `max_chars`.
pub fn validate_text_length(text: &str, max_chars: usize, field: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    check_max_length(text, max_chars, field)
}

/// Rejects text longer than `max_chars`. Empty text is allowed.
pub fn check_max_length(text: &str, max_chars: usize, field: &str) -> Result<(), AppError> {
    if text.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{field} exceeds maximum length of {max_chars} characters"
        )));
    }
    Ok(())
}

/// Parses an http(s) URL. When `allowed_domains` is non-empty the host must be
/// one of them or a subdomain of one.
pub fn validate_url(raw: &str, allowed_domains: &[&str], field: &str) -> Result<Url, AppError> {
    let invalid = || AppError::Validation(format!("{field} is not a valid URL"));

    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();

    if !allowed_domains.is_empty() {
        let allowed = allowed_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")));
        if !allowed {
            return Err(AppError::Validation(format!(
                "{field} domain must be one of: {}",
                allowed_domains.join(", ")
            )));
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_within_limit_passes() {
        assert!(validate_text_length("Senior engineer", 100, "title").is_ok());
    }

    #[test]
    fn test_blank_text_is_required() {
        let err = validate_text_length("   \n", 100, "resumeText").unwrap_err();
        assert!(err.to_string().contains("resumeText is required"));
    }

    #[test]
    fn test_text_over_limit_rejected() {
        let text = "a".repeat(101);
        let err = validate_text_length(&text, 100, "title").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("maximum length of 100"));
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let text = "é".repeat(100);
        assert!(check_max_length(&text, 100, "name").is_ok());
    }

    #[test]
    fn test_check_max_length_allows_empty() {
        assert!(check_max_length("", 10, "caption").is_ok());
    }

    #[test]
    fn test_url_accepts_https() {
        let url = validate_url("https://jane.dev/work", &[], "portfolioUrl").unwrap();
        assert_eq!(url.host_str(), Some("jane.dev"));
    }

    #[test]
    fn test_url_rejects_other_schemes() {
        assert!(validate_url("file:///etc/passwd", &[], "portfolioUrl").is_err());
        assert!(validate_url("javascript:alert(1)", &[], "portfolioUrl").is_err());
    }

    #[test]
    fn test_url_rejects_garbage() {
        assert!(validate_url("not a url", &[], "portfolioUrl").is_err());
    }

    #[test]
    fn test_url_domain_allow_list() {
        assert!(validate_url("https://www.linkedin.com/in/jane", &["linkedin.com"], "linkedinUrl").is_ok());
        assert!(validate_url("https://linkedin.com/in/jane", &["linkedin.com"], "linkedinUrl").is_ok());
        let err = validate_url("https://evil-linkedin.com/in/jane", &["linkedin.com"], "linkedinUrl")
            .unwrap_err();
        assert!(err.to_string().contains("domain must be one of"));
    }
}
