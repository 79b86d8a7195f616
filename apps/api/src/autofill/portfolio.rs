//! Portfolio import: fetch a public page, reduce it to text, and let the
//! model pull out profile, projects and frameworks.

use std::net::IpAddr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::{Host, Url};

use crate::autofill::prompts::{portfolio_tool, PORTFOLIO_PROMPT_HEADER};
use crate::cards::models::{reshape_items, FrameworkItem, Proficiency, ProjectItem};
use crate::errors::AppError;
use crate::llm_client::prompts::{fenced_input, EXTRACTION_RULES, UNTRUSTED_INPUT_NOTICE};
use crate::llm_client::{ChatMessage, ChatResponse, LlmClient, LlmError};
use crate::validation::{validate_text_length, validate_url};

pub const MAX_PORTFOLIO_URL_CHARS: usize = 500;
/// Page text beyond this is not sent to the model.
pub const MAX_PAGE_TEXT_CHARS: usize = 15_000;
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Bytes read from the page before the rest is discarded.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_REDIRECTS: usize = 5;
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; PortfolioParser/1.0)";

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsePortfolioRequest {
    pub portfolio_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioProfile {
    pub name: String,
    pub title: String,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioData {
    pub profile: PortfolioProfile,
    pub projects: Vec<ProjectItem>,
    pub frameworks: Vec<FrameworkItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub success: bool,
    pub data: PortfolioData,
    pub source_url: String,
}

/// Model output before proficiency labels are normalised.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPortfolio {
    profile: PortfolioProfile,
    projects: Vec<ProjectItem>,
    frameworks: Vec<RawFramework>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFramework {
    name: String,
    proficiency: String,
}

/// Validates the URL and refuses hosts that point back into private networks.
pub fn validate_portfolio_url(raw: &str) -> Result<Url, AppError> {
    validate_text_length(raw, MAX_PORTFOLIO_URL_CHARS, "portfolioUrl")?;
    let url = validate_url(raw, &[], "portfolioUrl")?;
    if is_private_host(&url) {
        return Err(AppError::Validation(
            "portfolioUrl must point to a public website".to_string(),
        ));
    }
    Ok(url)
}

fn is_private_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(v4)) => is_private_ip(IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => is_private_ip(IpAddr::V6(v6)),
        None => true,
    }
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local
                || (first & 0xfe00) == 0xfc00
                // fe80::/10 link local
                || (first & 0xffc0) == 0xfe80
        }
    }
}

/// Client for portfolio fetches. Every redirect hop is checked against the
/// same private-host rules as the submitted URL.
pub fn portfolio_http_client() -> Result<reqwest::Client, reqwest::Error> {
    let policy = reqwest::redirect::Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_private_host(attempt.url()) {
            attempt.error("redirect to a private address")
        } else {
            attempt.follow()
        }
    });
    reqwest::Client::builder().redirect(policy).build()
}

/// Fetches the page body, keeping at most `MAX_PAGE_BYTES`. Any transport
/// failure or non-2xx is an upstream error.
pub async fn fetch_portfolio_html(http: &reqwest::Client, url: &Url) -> Result<String, AppError> {
    let mut response = http
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to fetch portfolio: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Failed to fetch portfolio: {}",
            status.as_u16()
        )));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to read portfolio: {e}")))?
    {
        let room = MAX_PAGE_BYTES - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            warn!("Portfolio page exceeds {MAX_PAGE_BYTES} bytes, truncating");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Reduces HTML to visible text: drops scripts, styles, comments and tags,
/// decodes common entities, collapses whitespace and truncates.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = COMMENT_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().chars().take(MAX_PAGE_TEXT_CHARS).collect()
}

pub fn build_portfolio_messages(url: &Url, page_text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(format!(
        "{PORTFOLIO_PROMPT_HEADER}\n{EXTRACTION_RULES}\n{UNTRUSTED_INPUT_NOTICE}\n\n\
         Website URL: {url}\n\n{}",
        fenced_input("PAGE CONTENT", page_text)
    ))]
}

pub async fn parse_portfolio(
    url: &Url,
    http: &reqwest::Client,
    llm: &LlmClient,
) -> Result<PortfolioData, AppError> {
    let html = fetch_portfolio_html(http, url).await?;
    let page_text = html_to_text(&html);
    info!(
        "Fetched portfolio {} ({} bytes html, {} chars text)",
        url.host_str().unwrap_or_default(),
        html.len(),
        page_text.chars().count()
    );

    let messages = build_portfolio_messages(url, &page_text);
    let response = match llm.call(&messages, &portfolio_tool()).await {
        Ok(response) => response,
        Err(LlmError::Parse(e)) => {
            warn!("Undecodable portfolio reply, returning empty data: {e}");
            return Ok(PortfolioData::default());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(reshape_portfolio(&response))
}

/// Unparseable replies become an empty result rather than an error.
pub fn reshape_portfolio(response: &ChatResponse) -> PortfolioData {
    let raw = response
        .parse_payload::<RawPortfolio>()
        .unwrap_or_else(|e| {
            warn!("Unparseable portfolio reply, returning empty data: {e}");
            RawPortfolio::default()
        });

    let frameworks = raw
        .frameworks
        .into_iter()
        .map(|f| FrameworkItem {
            id: None,
            name: f.name,
            proficiency: Proficiency::from_label(&f.proficiency).unwrap_or_default(),
            projects_built: String::new(),
        })
        .collect();

    PortfolioData {
        profile: PortfolioProfile {
            name: raw.profile.name.trim().to_string(),
            title: raw.profile.title.trim().to_string(),
            bio: raw.profile.bio.trim().to_string(),
        },
        projects: reshape_items(raw.projects),
        frameworks: reshape_items(frameworks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_html_to_text_strips_scripts_styles_and_tags() {
        let html = r#"
            <html><head><style>body { color: red; }</style>
            <script type="text/javascript">var secret = "<b>x</b>";</script></head>
            <body><!-- hidden --><h1>Jane&nbsp;Doe</h1>
            <p>Rust &amp; Go    engineer</p></body></html>"#;
        assert_eq!(html_to_text(html), "Jane Doe Rust & Go engineer");
    }

    #[test]
    fn test_html_to_text_truncates() {
        let html = format!("<p>{}</p>", "a".repeat(MAX_PAGE_TEXT_CHARS + 500));
        assert_eq!(html_to_text(&html).chars().count(), MAX_PAGE_TEXT_CHARS);
    }

    #[test]
    fn test_portfolio_url_must_be_public() {
        assert!(validate_portfolio_url("https://jane.dev").is_ok());
        assert!(validate_portfolio_url("http://localhost:3000").is_err());
        assert!(validate_portfolio_url("http://127.0.0.1/admin").is_err());
        assert!(validate_portfolio_url("http://10.0.0.5").is_err());
        assert!(validate_portfolio_url("http://169.254.169.254/latest/meta-data").is_err());
        assert!(validate_portfolio_url("http://[::1]/").is_err());
    }

    #[test]
    fn test_portfolio_url_rejects_private_ipv6_forms() {
        assert!(validate_portfolio_url("http://[::ffff:169.254.169.254]/latest").is_err());
        assert!(validate_portfolio_url("http://[::ffff:10.0.0.1]/").is_err());
        assert!(validate_portfolio_url("http://[fd00::1]/").is_err());
        assert!(validate_portfolio_url("http://[fc12:3456::1]/").is_err());
        assert!(validate_portfolio_url("http://[fe80::1]/").is_err());
        assert!(validate_portfolio_url("http://[2606:4700::1111]/").is_ok());
        assert!(validate_portfolio_url("http://[::ffff:1.1.1.1]/").is_ok());
    }

    #[test]
    fn test_portfolio_url_required() {
        assert!(validate_portfolio_url("").is_err());
    }

    #[test]
    fn test_reshape_normalises_proficiency_and_assigns_ids() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"tool_calls": [{"function": {
                "name": "extract_portfolio_data",
                "arguments": serde_json::to_string(&json!({
                    "profile": {"name": "Jane", "title": null, "bio": "Builds things."},
                    "projects": [{"name": "Ray tracer", "description": "Toy renderer", "technologies": "Rust"}],
                    "frameworks": [
                        {"name": "Axum", "proficiency": "advanced"},
                        {"name": "React", "proficiency": "guru"},
                        {"name": "  "}
                    ]
                })).unwrap()
            }}]}}]
        }))
        .unwrap();

        let data = reshape_portfolio(&response);
        assert_eq!(data.profile.name, "Jane");
        assert_eq!(data.profile.title, "");
        assert_eq!(data.projects.len(), 1);
        assert!(data.projects[0].id.is_some());
        assert_eq!(data.frameworks.len(), 2);
        assert_eq!(data.frameworks[0].proficiency, Proficiency::Advanced);
        assert_eq!(data.frameworks[1].proficiency, Proficiency::Intermediate);
    }

    #[test]
    fn test_reshape_malformed_reply_is_empty() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "<html>not json</html>"}}]
        }))
        .unwrap();
        assert_eq!(reshape_portfolio(&response), PortfolioData::default());
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/").header("user-agent", USER_AGENT);
                then.status(200).body("<h1>Hello</h1>");
            })
            .await;

        let url = Url::parse(&server.url("/")).unwrap();
        let html = fetch_portfolio_html(&reqwest::Client::new(), &url)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(html, "<h1>Hello</h1>");
    }

    #[tokio::test]
    async fn test_fetch_refuses_redirect_into_private_network() {
        let server = MockServer::start_async().await;
        let internal = server
            .mock_async(|when, then| {
                when.method(GET).path("/internal-secret");
                then.status(200).body("SECRET");
            })
            .await;
        let target = server.url("/internal-secret");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/public");
                then.status(302).header("location", target.as_str());
            })
            .await;

        let client = portfolio_http_client().unwrap();
        let url = Url::parse(&server.url("/public")).unwrap();
        let err = fetch_portfolio_html(&client, &url).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
        internal.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_fetch_caps_body_size() {
        let server = MockServer::start_async().await;
        let page = format!("<p>{}</p>", "a".repeat(MAX_PAGE_BYTES + 4096));
        server
            .mock_async(|when, then| {
                when.method(GET).path("/huge");
                then.status(200).body(page);
            })
            .await;

        let url = Url::parse(&server.url("/huge")).unwrap();
        let html = fetch_portfolio_html(&reqwest::Client::new(), &url)
            .await
            .unwrap();
        assert_eq!(html.len(), MAX_PAGE_BYTES);
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone");
                then.status(404);
            })
            .await;

        let url = Url::parse(&server.url("/gone")).unwrap();
        let err = fetch_portfolio_html(&reqwest::Client::new(), &url)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m.contains("404")));
    }
}
