//! Built-in OpenRouter free-tier alias table.

use axis_core::llm::catalog::ModelCatalog;

pub const DEFAULT_ALIASES: [(&str, &str); 11] = [
    ("openai/gpt-120b", "openai/gpt-oss-120b:free"),
    ("llama-70b", "meta-llama/llama-3.3-70b-instruct:free"),
    ("nemotron-30b", "nvidia/nemotron-3-nano-30b-a3b:free"),
    ("nemotron-12b", "nvidia/nemotron-nano-12b-v2-vl:free"),
    ("qwen3", "qwen/qwen3-coder:free"),
    ("allenai-32b", "allenai/olmo-3.1-32b-think:free"),
    ("xiaomi-flash", "xiaomi/mimo-v2-flash:free"),
    ("mistralai", "mistralai/devstral-2512:free"),
    ("deepseek-nex", "nex-agi/deepseek-v3.1-nex-n1:free"),
    ("tngtech", "tngtech/tng-r1t-chimera:free"),
    ("kat-coder", "kwaipilot/kat-coder-pro:free"),
];

pub fn default_catalog() -> ModelCatalog {
    ModelCatalog::new(DEFAULT_ALIASES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::chat::DEFAULT_MODEL_ALIAS;

    #[test]
    fn test_fallback_alias_is_in_table() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), DEFAULT_ALIASES.len());
        assert_eq!(
            catalog.resolve(DEFAULT_MODEL_ALIAS),
            Some("meta-llama/llama-3.3-70b-instruct:free")
        );
    }
}
