//! Prompt templates for LLM generation
//!
//! Templates are markdown files embedded at compile time, each with a
//! `# System` and a `# User` section. User sections contain
//! mustache-style `{{var}}` placeholders filled at call time.

use std::collections::HashMap;

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const GENERATE_ADVICE: &str = include_str!("../../../prompts/generate_advice.md");
    pub const GENERATE_REPORT: &str = include_str!("../../../prompts/generate_report.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Daily advice from budget deviation context
    GenerateAdvice,
    /// Long-form spending report from goal + budget + ledger context
    GenerateReport,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateAdvice => "generate_advice",
            Self::GenerateReport => "generate_report",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::GenerateAdvice, Self::GenerateReport]
    }

    fn content(&self) -> &'static str {
        match self {
            Self::GenerateAdvice => defaults::GENERATE_ADVICE,
            Self::GenerateReport => defaults::GENERATE_REPORT,
        }
    }
}

/// A loaded prompt template
#[derive(Debug, Clone)]
pub struct Prompt {
    content: &'static str,
}

impl Prompt {
    /// Load the embedded template for an ID
    pub fn get(id: PromptId) -> Self {
        Self {
            content: id.content(),
        }
    }

    /// The system section of the prompt
    pub fn system(&self) -> &str {
        extract_section(self.content, "# System").unwrap_or("")
    }

    /// Render the user section with `{{var}}` placeholders replaced
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        let user = extract_section(self.content, "# User").unwrap_or(self.content);
        let mut result = user.to_string();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

/// Extract the body of a `# Header` section (up to the next `# ` header)
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)? + header.len();
    let rest = &content[start..];
    let end = rest.find("\n# ").unwrap_or(rest.len());
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_section() {
        let content = "# System\nsystem text\n\n# User\nuser {{x}} text\n";
        assert_eq!(extract_section(content, "# System"), Some("system text"));
        assert_eq!(extract_section(content, "# User"), Some("user {{x}} text"));
        assert_eq!(extract_section(content, "# Missing"), None);
    }

    #[test]
    fn test_embedded_prompts_have_sections() {
        for &id in PromptId::all() {
            let prompt = Prompt::get(id);
            assert!(!prompt.system().is_empty(), "{} missing system", id.as_str());
            assert!(
                !prompt.render_user(&HashMap::new()).is_empty(),
                "{} missing user",
                id.as_str()
            );
        }
    }

    #[test]
    fn test_render_replaces_vars() {
        let prompt = Prompt::get(PromptId::GenerateAdvice);
        let vars = HashMap::from([
            ("mood", "NEGATIVE"),
            ("percentsJson", "{\"식비\":-25}"),
            ("spendsJson", "{\"식비\":125000}"),
            ("detailsJson", "[]"),
        ]);
        let rendered = prompt.render_user(&vars);
        assert!(rendered.contains("NEGATIVE"));
        assert!(rendered.contains("{\"식비\":-25}"));
        assert!(!rendered.contains("{{mood}}"));
    }
}
