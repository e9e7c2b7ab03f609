/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OpenAI-style `POST /chat/completions`
    ChatCompletions,
    /// Google `models/{model}:generateContent`
    Gemini,
}

pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Environment variable holding the API key; empty when none is needed.
    pub env_var: &'static str,
    pub backend: Backend,
    pub base_url: &'static str,
    pub primary_model: &'static str,
    pub fallback_model: &'static str,
}

impl ProviderInfo {
    pub fn requires_key(&self) -> bool {
        !self.env_var.is_empty()
    }
}

pub const DEFAULT_PROVIDER: &str = "groq";

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "groq",
        name: "Groq",
        env_var: "GROQ_API_KEY",
        backend: Backend::ChatCompletions,
        base_url: "https://api.groq.com/openai/v1",
        primary_model: "llama-3.3-70b-versatile",
        fallback_model: "llama-3.1-8b-instant",
    },
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        env_var: "OPENAI_API_KEY",
        backend: Backend::ChatCompletions,
        base_url: "https://api.openai.com/v1",
        primary_model: "gpt-4o",
        fallback_model: "gpt-4o-mini",
    },
    ProviderInfo {
        id: "openrouter",
        name: "OpenRouter",
        env_var: "OPENROUTER_API_KEY",
        backend: Backend::ChatCompletions,
        base_url: "https://openrouter.ai/api/v1",
        primary_model: "meta-llama/llama-3.3-70b-instruct",
        fallback_model: "meta-llama/llama-3.1-8b-instruct",
    },
    ProviderInfo {
        id: "gemini",
        name: "Google Gemini",
        env_var: "GEMINI_API_KEY",
        backend: Backend::Gemini,
        base_url: "https://generativelanguage.googleapis.com/v1beta",
        primary_model: "gemini-2.5-flash",
        fallback_model: "gemini-2.5-flash-lite",
    },
    ProviderInfo {
        id: "local",
        name: "Local / Ollama",
        env_var: "",
        backend: Backend::ChatCompletions,
        base_url: "http://localhost:11434/v1",
        primary_model: "qwen2.5:7b",
        fallback_model: "qwen2.5:1.5b",
    },
];

pub fn get_provider(id: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

pub fn provider_ids() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.id).collect()
}
