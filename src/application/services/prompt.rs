use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::KnowledgeMatch;

pub const REGULAR_PROMPT: &str = include_str!("../../../prompts/regular.md");
pub const PORTFOLIO_REVIEWER_PROMPT: &str = include_str!("../../../prompts/portfolio_reviewer.md");

const POSTS_CONTEXT_HEADER: &str = "\n\nAdditional context from Reddit posts:\n";
const KNOWLEDGE_CONTEXT_HEADER: &str = "\n\nRelevant knowledge base excerpts:\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    #[default]
    Regular,
    PortfolioReviewer,
}

impl PromptKind {
    pub fn base_prompt(&self) -> &'static str {
        match self {
            PromptKind::Regular => REGULAR_PROMPT,
            PromptKind::PortfolioReviewer => PORTFOLIO_REVIEWER_PROMPT,
        }
    }
}

pub fn build_system_prompt(
    kind: PromptKind,
    posts_context: &[Value],
    knowledge: &[KnowledgeMatch],
) -> String {
    let mut prompt = kind.base_prompt().to_string();

    if !posts_context.is_empty() {
        prompt.push_str(POSTS_CONTEXT_HEADER);
        prompt.push_str(&Value::Array(posts_context.to_vec()).to_string());
    }

    if !knowledge.is_empty() {
        prompt.push_str(KNOWLEDGE_CONTEXT_HEADER);
        for (position, excerpt) in knowledge.iter().enumerate() {
            let source = excerpt.source.as_deref().unwrap_or("r/FIREPakistan KB");
            prompt.push_str(&format!(
                "[{}] (source: {}, similarity: {:.2})\n{}\n",
                position + 1,
                source,
                excerpt.similarity,
                excerpt.content.trim()
            ));
        }
    }

    prompt
}
