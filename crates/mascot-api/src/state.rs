//! Application state wiring all services together.
//!
//! AppState holds everything the handlers need: the persona and news data
//! loaded at startup, the session tracker, the two LLM providers, and the
//! tool registry. Everything is behind `Arc` so the state clones cheaply
//! per request.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{Instrument, info, info_span, warn};

use mascot_core::llm::BoxLlmProvider;
use mascot_core::prompt::SystemPromptBuilder;
use mascot_core::session::SessionTracker;
use mascot_core::tool::ToolRegistry;
use mascot_infra::config::ApiCredentials;
use mascot_infra::data::{load_news, load_profile};
use mascot_infra::llm::{GeminiProvider, OpenAiCompatProvider};
use mascot_infra::search::GoogleSearchTool;
use mascot_types::config::AppConfig;
use mascot_types::llm::LlmError;
use mascot_types::news::NewsItem;
use mascot_types::persona::Persona;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub persona: Arc<Persona>,
    pub news: Arc<Vec<NewsItem>>,
    pub sessions: Arc<SessionTracker>,
    /// Function-calling provider behind the chat endpoint.
    pub chat_provider: Arc<BoxLlmProvider>,
    /// Provider for seasonal/narrative generations; absent when its key is
    /// not configured.
    pub utility_provider: Option<Arc<BoxLlmProvider>>,
    pub tools: Arc<ToolRegistry>,
    /// Seasonal one-liner, regenerated once per calendar day.
    seasonal_cache: Arc<Mutex<Option<(NaiveDate, String)>>>,
}

impl AppState {
    /// Initialize the application state: load data files, resolve
    /// credentials, wire providers and tools.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let credentials = ApiCredentials::from_env()?;
        Self::init_with(config, credentials)
    }

    /// Initialization with explicit credentials (tests inject fakes).
    pub fn init_with(config: AppConfig, credentials: ApiCredentials) -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(&config.data.dir);

        let personality = load_profile(&data_dir.join(&config.data.personality_file))?;
        let behavior = load_profile(&data_dir.join(&config.data.behavior_file))?;
        let persona = Persona {
            name: config.persona.name.clone(),
            nickname: config.persona.nickname.clone(),
            personality,
            behavior,
        };

        let news = Self::load_news_or_empty(&data_dir.join(&config.data.news_file));
        info!(items = news.len(), "news loaded");

        let chat_provider = BoxLlmProvider::new(GeminiProvider::new(
            credentials.chat_api_key,
            config.llm.chat_model.clone(),
        ));

        let utility_provider = credentials.utility_api_key.map(|key| {
            Arc::new(BoxLlmProvider::new(OpenAiCompatProvider::new(
                key,
                config.llm.utility_model.clone(),
            )))
        });
        if utility_provider.is_none() {
            warn!("utility model key not set; seasonal and narrative generation disabled");
        }

        let mut tools = ToolRegistry::new();
        match (credentials.search_api_key, credentials.search_engine_id) {
            (Some(key), Some(engine_id)) => {
                tools.register(Box::new(GoogleSearchTool::new(
                    key,
                    engine_id,
                    config.search.max_results,
                    config.search.timeout_secs,
                )));
            }
            _ => warn!("search credentials not set; web search tool disabled"),
        }

        Ok(Self {
            config: Arc::new(config),
            persona: Arc::new(persona),
            news: Arc::new(news),
            sessions: Arc::new(SessionTracker::new()),
            chat_provider: Arc::new(chat_provider),
            utility_provider,
            tools: Arc::new(tools),
            seasonal_cache: Arc::new(Mutex::new(None)),
        })
    }

    /// A missing or broken news file downgrades to "no news" instead of
    /// refusing to start.
    fn load_news_or_empty(path: &Path) -> Vec<NewsItem> {
        match load_news(path) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "news file unavailable, continuing without news");
                Vec::new()
            }
        }
    }

    /// The seasonal one-liner for `now`, cached per calendar day.
    ///
    /// Returns `None` when the utility provider is absent or the generation
    /// fails -- the chat prompt simply goes out without the line.
    pub async fn seasonal_line(&self, now: DateTime<Utc>) -> Option<String> {
        self.utility_provider.as_ref()?;

        let today = now.date_naive();
        {
            let cache = self.seasonal_cache.lock().unwrap();
            if let Some((date, line)) = cache.as_ref() {
                if *date == today {
                    return Some(line.clone());
                }
            }
        }

        match self.generate_seasonal(now).await {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(error = %e, "seasonal generation failed, omitting line");
                None
            }
        }
    }

    /// Generate the seasonal one-liner and refresh the day cache.
    pub async fn generate_seasonal(&self, now: DateTime<Utc>) -> Result<String, LlmError> {
        let provider = self.utility_provider.as_ref().ok_or_else(|| {
            LlmError::InvalidRequest("utility model is not configured".to_string())
        })?;

        let request = SystemPromptBuilder::seasonal_request(
            &self.persona,
            now,
            &self.config.llm.utility_model,
            self.config.llm.seasonal_temperature,
            128,
        );

        let span = info_span!(
            "gen_ai.seasonal_greeting",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = %request.model,
        );
        let response = provider.complete(&request).instrument(span).await?;

        let line = response.content;
        if !line.is_empty() {
            *self.seasonal_cache.lock().unwrap() = Some((now.date_naive(), line.clone()));
        }
        Ok(line)
    }

    /// Generate the persona's first-person narrative self-introduction.
    pub async fn generate_narrative(&self) -> Result<String, LlmError> {
        let provider = self.utility_provider.as_ref().ok_or_else(|| {
            LlmError::InvalidRequest("utility model is not configured".to_string())
        })?;

        let request = SystemPromptBuilder::narrative_request(
            &self.persona,
            &self.config.llm.utility_model,
            self.config.llm.narrative_temperature,
            self.config.llm.max_tokens,
        );

        let span = info_span!(
            "gen_ai.generate_narrative",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = %request.model,
        );
        let response = provider.complete(&request).instrument(span).await?;
        Ok(response.content)
    }
}
