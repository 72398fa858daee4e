use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Gemini,
    OpenAi,
}

impl ModelProvider {
    pub fn for_identifier(api_identifier: &str) -> Self {
        if api_identifier.starts_with("gpt-") {
            ModelProvider::OpenAi
        } else {
            ModelProvider::Gemini
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatModel {
    pub id: &'static str,
    pub label: &'static str,
    pub api_identifier: &'static str,
    pub description: &'static str,
}

impl ChatModel {
    pub fn provider(&self) -> ModelProvider {
        ModelProvider::for_identifier(self.api_identifier)
    }
}

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";

pub const MODELS: [ChatModel; 4] = [
    ChatModel {
        id: "gemini-2.0-flash",
        label: "Gemini 2.0 Flash",
        api_identifier: "gemini-2.0-flash",
        description: "Fast and efficient model for quick responses",
    },
    ChatModel {
        id: "gemini-1.5-pro",
        label: "Gemini 1.5 Pro",
        api_identifier: "gemini-1.5-pro",
        description: "Advanced model with strong reasoning capabilities",
    },
    ChatModel {
        id: "gpt-4o-mini",
        label: "GPT 4o mini",
        api_identifier: "gpt-4o-mini",
        description: "Small model for fast, lightweight tasks",
    },
    ChatModel {
        id: "gpt-4o",
        label: "GPT 4o",
        api_identifier: "gpt-4o",
        description: "For complex, multi-step tasks",
    },
];

pub fn find_model(id: &str) -> Option<&'static ChatModel> {
    MODELS.iter().find(|model| model.id == id)
}

pub fn default_model() -> &'static ChatModel {
    // DEFAULT_MODEL_NAME is always the first catalog entry
    &MODELS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_model() {
        let model = find_model("gemini-1.5-pro").unwrap();
        assert_eq!(model.label, "Gemini 1.5 Pro");
        assert_eq!(model.provider(), ModelProvider::Gemini);
    }

    #[test]
    fn test_gpt_models_route_to_openai() {
        assert_eq!(find_model("gpt-4o").unwrap().provider(), ModelProvider::OpenAi);
        assert_eq!(find_model("gpt-4o-mini").unwrap().provider(), ModelProvider::OpenAi);
    }

    #[test]
    fn test_unknown_model() {
        assert!(find_model("claude").is_none());
    }

    #[test]
    fn test_default_model_matches_name() {
        assert_eq!(default_model().id, DEFAULT_MODEL_NAME);
    }

    #[test]
    fn test_model_serializes_camel_case() {
        let value = serde_json::to_value(default_model()).unwrap();
        assert_eq!(value["apiIdentifier"], "gemini-2.0-flash");
    }
}
