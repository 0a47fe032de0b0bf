use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub api: ApiConfig,
    pub enhance: EnhanceConfig,
    pub wizard: WizardConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SIGNAL_PROFILE` env var. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SIGNAL_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            api: ApiConfig::from_env_profiled(p),
            enhance: EnhanceConfig::from_env_profiled(p),
            wizard: WizardConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  api:      base_url={}, timeout={}s", self.api.base_url, self.api.timeout_secs);
        tracing::info!("  enhance:  url={}", self.enhance.url.as_deref().unwrap_or("(llm)"));
        tracing::info!("  wizard:   debounce={}ms, max_depth={}", self.wizard.suggest_debounce_ms, self.wizard.max_query_depth);
        tracing::info!("  llm:      provider={}", self.llm.provider);
    }

    /// Return a redacted view safe for diagnostics (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "api": { "base_url": self.api.base_url, "timeout_secs": self.api.timeout_secs },
            "enhance": { "url": self.enhance.url },
            "wizard": {
                "suggest_debounce_ms": self.wizard.suggest_debounce_ms,
                "max_query_depth": self.wizard.max_query_depth,
            },
            "llm": {
                "provider": self.llm.provider,
                "model": self.llm.openai_model,
                "configured": self.llm.is_configured(),
            },
        })
    }
}

// ── Signal API ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub auth_token: Option<String>,
}

impl ApiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            base_url: profiled_env_or(p, "SIGNAL_API_URL", "http://localhost:8080/api"),
            timeout_secs: profiled_env_u64(p, "SIGNAL_API_TIMEOUT_SECS", 30),
            auth_token: profiled_env_opt(p, "SIGNAL_API_TOKEN"),
        }
    }
}

// ── Query enhancement ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Dedicated NLP conversion endpoint. When unset the LLM enhancer is used.
    pub url: Option<String>,
}

impl EnhanceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_opt(p, "ENHANCE_URL"),
        }
    }
}

// ── Wizard behaviour ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    pub suggest_debounce_ms: u64,
    pub max_query_depth: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            suggest_debounce_ms: 300,
            max_query_depth: 10,
        }
    }
}

impl WizardConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            suggest_debounce_ms: profiled_env_u64(p, "SUGGEST_DEBOUNCE_MS", defaults.suggest_debounce_ms),
            max_query_depth: profiled_env_u32(p, "MAX_QUERY_DEPTH", defaults.max_query_depth),
        }
    }

    pub fn suggest_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.suggest_debounce_ms)
    }
}

// ── LLM (OpenAI-compatible) ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" (any OpenAI-compatible chat completion endpoint)
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "openai"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.0")
                .parse()
                .unwrap_or(0.0),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 1024),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }
}
