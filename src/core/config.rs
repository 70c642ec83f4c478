use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub app_referer: String,
    pub app_title: String,
    pub system_message: String,
    pub identity_api_hostname: String,
    pub identity_api_key: String,
}

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a medical assistant. When the user describes symptoms, respond with:\n\n1. A short 1-line diagnosis\n2. A list of 2–3 recommended tests under the heading 'Recommended Tests:'\n3. A list of 2–3 suggested medicines under the heading 'Suggested Medicines:'\nFormat everything as clean bullet points, no extra commentary or disclaimers.";

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("MEDGOD_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/medgod.db", storage_path.trim_end_matches('/'));
        let openai_api_hostname = env::var("MEDGOD_LLM_HOST")
            .unwrap_or_else(|_| "https://openrouter.ai/api".to_string());
        // OpenRouter speaks the OpenAI protocol so either key works
        let openai_api_key = env::var("OPENROUTER_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_else(|_| "thiswontworkforopenrouter".to_string());
        let openai_model = env::var("MEDGOD_LLM_MODEL")
            .unwrap_or_else(|_| "mistralai/mistral-7b-instruct".to_string());
        let app_referer = env::var("MEDGOD_APP_REFERER")
            .unwrap_or_else(|_| "https://hospital-ai-app.dev".to_string());
        let app_title =
            env::var("MEDGOD_APP_TITLE").unwrap_or_else(|_| "Hospital-AI-App".to_string());
        let system_message = env::var("MEDGOD_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_MESSAGE.to_string());
        let identity_api_hostname = env::var("MEDGOD_IDENTITY_HOST")
            .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string());
        let identity_api_key = env::var("MEDGOD_IDENTITY_API_KEY").unwrap_or_default();

        Self {
            storage_path,
            db_path,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            app_referer,
            app_title,
            system_message,
            identity_api_hostname,
            identity_api_key,
        }
    }
}
