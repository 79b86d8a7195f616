// Autofill LLM prompts and tool schemas.
// All prompts for the autofill module are defined here.

use serde_json::json;

use crate::llm_client::Tool;

pub const RESUME_SYSTEM: &str = "\
You are a career data extraction expert. \
Extract and structure career information from resumes and professional profiles. \
Call the extract_resume_data function with what you find. \
For certifications, include the URL of the credential whenever the source provides one.";

pub const RESUME_PROMPT_HEADER: &str =
    "Parse the following career information and extract structured data:";

pub const EXPERIENCE_SYSTEM: &str = "\
You are a resume parser. Extract every work experience entry from the resume text. \
Each entry has a job title, a company name, a time period (e.g. \"Jan 2020 - Dec 2022\" \
or \"2020 - Present\") and a description of responsibilities and achievements. \
Call the extract_experience function. If no experience is found, return an empty list.";

pub const EXPERIENCE_PROMPT_HEADER: &str = "Parse this resume text and extract work experience:";

pub const PORTFOLIO_PROMPT_HEADER: &str = "\
Analyze this portfolio website content and extract structured information about \
projects, skills, and experience.";

fn experience_entry_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "Job title or position" },
            "company": { "type": "string", "description": "Company name" },
            "period": { "type": "string", "description": "Start date - end date" },
            "description": { "type": "string", "description": "Responsibilities and achievements" }
        },
        "required": ["title", "company", "period", "description"]
    })
}

pub fn resume_tool() -> Tool {
    Tool {
        name: "extract_resume_data",
        description: "Extract profile, work experience and certifications from a resume or profile",
        parameters: json!({
            "type": "object",
            "properties": {
                "profile": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Full name" },
                        "title": { "type": "string", "description": "Professional title" },
                        "location": { "type": "string", "description": "City, Country" }
                    }
                },
                "experience": { "type": "array", "items": experience_entry_schema() },
                "certifications": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Certification name" },
                            "issuer": { "type": "string", "description": "Issuing organization" },
                            "date": { "type": "string", "description": "Date obtained" },
                            "url": { "type": "string", "description": "Credential URL, if available" }
                        },
                        "required": ["name"]
                    }
                }
            },
            "required": ["profile", "experience", "certifications"]
        }),
    }
}

pub fn experience_tool() -> Tool {
    Tool {
        name: "extract_experience",
        description: "Extract the work experience entries found in a resume",
        parameters: json!({
            "type": "object",
            "properties": {
                "experiences": { "type": "array", "items": experience_entry_schema() }
            },
            "required": ["experiences"]
        }),
    }
}

pub fn portfolio_tool() -> Tool {
    Tool {
        name: "extract_portfolio_data",
        description: "Extract structured portfolio data including projects and profile information",
        parameters: json!({
            "type": "object",
            "properties": {
                "profile": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Person's name if found" },
                        "title": { "type": "string", "description": "Professional title if found" },
                        "bio": { "type": "string", "description": "Short bio or description" }
                    }
                },
                "projects": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Project name" },
                            "description": { "type": "string", "description": "Project description" },
                            "technologies": { "type": "string", "description": "Technologies used (comma-separated)" }
                        },
                        "required": ["name", "description"]
                    }
                },
                "frameworks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Framework or technology name" },
                            "proficiency": {
                                "type": "string",
                                "enum": ["Beginner", "Intermediate", "Advanced", "Expert"]
                            }
                        },
                        "required": ["name"]
                    }
                }
            },
            "required": ["projects"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_schemas_are_objects_with_required_lists() {
        for tool in [resume_tool(), experience_tool(), portfolio_tool()] {
            assert_eq!(tool.parameters["type"], "object", "{}", tool.name);
            assert!(tool.parameters["required"].is_array(), "{}", tool.name);
        }
    }
}
