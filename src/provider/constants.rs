pub mod openrouter {
    pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";
    pub const API_BASE: &str = "https://openrouter.ai/api/v1";
    pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
    pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
    pub const DEFAULT_HTTP_REFERER: &str = "https://localhost:3000";
    pub const DEFAULT_X_TITLE: &str = "DeepSeek ChatBot";
}
