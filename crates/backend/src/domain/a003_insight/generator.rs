use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::shared::config::InsightConfig;
use crate::shared::llm::{ChatMessage, LlmProvider, OpenAiProvider};

pub const INSIGHTS_UNAVAILABLE: &str =
    "AI insights are currently unavailable. Please configure the API key.";
pub const INSIGHTS_FAILED: &str = "Unable to load AI insights at this moment.";

/// Короткое описание компании. Никогда не возвращает ошибку:
/// при любом сбое отдаётся текст-заглушка.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, company_name: &str, industry: &str) -> String;
}

pub struct LlmInsightGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl LlmInsightGenerator {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        let provider = OpenAiProvider::from_config(config)
            .map(|p| Arc::new(p) as Arc<dyn LlmProvider>);
        if provider.is_none() {
            tracing::warn!("Insight API key is not configured, insights are disabled");
        }
        Self::new(provider, Duration::from_secs(config.timeout_secs))
    }

    fn prompt(company_name: &str, industry: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You are a business analyst."),
            ChatMessage::user(format!(
                "Write a short, professional 2-sentence description for a fictional company \
                 named \"{}\" in the \"{}\" industry.\n\
                 Focus on why a client should book a meeting.\n\
                 Do not use markdown.",
                company_name, industry
            )),
        ]
    }
}

#[async_trait]
impl InsightGenerator for LlmInsightGenerator {
    async fn generate(&self, company_name: &str, industry: &str) -> String {
        let Some(provider) = &self.provider else {
            return INSIGHTS_UNAVAILABLE.to_string();
        };

        let call = provider.chat_completion(Self::prompt(company_name, industry));
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => {
                let text = response.content.trim();
                if text.is_empty() {
                    tracing::warn!("{} returned an empty insight", provider.provider_name());
                    INSIGHTS_FAILED.to_string()
                } else {
                    text.to_string()
                }
            }
            Ok(Err(e)) => {
                tracing::error!("{} insight error: {}", provider.provider_name(), e);
                INSIGHTS_FAILED.to_string()
            }
            Err(_) => {
                tracing::error!("{} insight timed out", provider.provider_name());
                INSIGHTS_FAILED.to_string()
            }
        }
    }
}
