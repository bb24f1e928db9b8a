use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto"
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Local persistence config
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Google translate_a/single
    #[default]
    Google,
    // @provider: MyMemory
    MyMemory,
    // @provider: Lingva Translate
    Lingva,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::MyMemory => "MyMemory",
            Self::Lingva => "Lingva",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::MyMemory => "mymemory".to_string(),
            Self::Lingva => "lingva".to_string(),
        }
    }

    // @returns: Public endpoint used when none is configured
    pub fn default_endpoint(&self) -> String {
        match self {
            Self::Google => crate::providers::google::DEFAULT_ENDPOINT.to_string(),
            Self::MyMemory => crate::providers::mymemory::DEFAULT_ENDPOINT.to_string(),
            Self::Lingva => crate::providers::lingva::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mymemory" => Ok(Self::MyMemory),
            "lingva" => Ok(Self::Lingva),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// One entry of the ordered provider list
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,

    // @field: Service URL, empty for the public default
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Whether this provider takes part in fallback
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        Self {
            provider_type,
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }

    /// Configured endpoint, or the provider's public default
    pub fn get_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            self.provider_type.default_endpoint()
        } else {
            self.endpoint.clone()
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Providers in fallback priority order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl TranslationConfig {
    /// Providers that take part in fallback, in order
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: ProviderKind) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.provider_type == provider_type)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            common: TranslationCommonConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// What happens to running sessions when a new translate call starts
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// A new call cancels every active session first
    #[default]
    ReplaceActive,
    /// Calls run side by side
    Independent,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Pause between consecutive chunks in milliseconds
    #[serde(default = "default_inter_chunk_delay_ms")]
    pub inter_chunk_delay_ms: u64,

    /// String placed between translated chunks
    #[serde(default = "default_chunk_separator")]
    pub chunk_separator: String,

    /// Session policy
    #[serde(default)]
    pub session_policy: SessionPolicy,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            inter_chunk_delay_ms: default_inter_chunk_delay_ms(),
            chunk_separator: default_chunk_separator(),
            session_policy: SessionPolicy::default(),
        }
    }
}

/// Response cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Whether translated chunks are cached for offline use
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached chunks
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,

    /// Entry lifetime in seconds
    #[serde(default = "default_cache_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_max_entries(),
            max_age_secs: default_cache_max_age_secs(),
        }
    }
}

/// History, glossary and cache persistence
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Database file; the platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Number of history entries kept and listed; older entries are pruned after each recorded translation
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Whether successful translations are recorded
    #[serde(default = "default_true")]
    pub record_history: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            history_limit: default_history_limit(),
            record_history: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "it".to_string()
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::Google),
        ProviderConfig::new(ProviderKind::MyMemory),
        ProviderConfig::new(ProviderKind::Lingva),
    ]
}

fn default_timeout_secs() -> u64 {
    7
}

fn default_max_chunk_chars() -> usize {
    1400
}

fn default_inter_chunk_delay_ms() -> u64 {
    400
}

fn default_chunk_separator() -> String {
    " ".to_string()
}

fn default_cache_max_entries() -> usize {
    60
}

fn default_cache_max_age_secs() -> u64 {
    24 * 60 * 60
}

fn default_history_limit() -> usize {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_source_language(&self.source_language)?;
        crate::language_utils::validate_target_language(&self.target_language)?;

        if self.translation.enabled_providers().next().is_none() {
            return Err(anyhow!("At least one translation provider must be enabled"));
        }

        for provider in self.translation.enabled_providers() {
            if provider.timeout_secs == 0 {
                return Err(anyhow!("Timeout for provider {} must be greater than zero", provider.provider_type));
            }
        }

        let common = &self.translation.common;
        if common.max_chunk_chars == 0 {
            return Err(anyhow!("max_chunk_chars must be greater than zero"));
        }

        if self.translation.cache.enabled && self.translation.cache.max_entries == 0 {
            return Err(anyhow!("Cache max_entries must be greater than zero when the cache is enabled"));
        }

        if self.storage.history_limit == 0 {
            return Err(anyhow!("history_limit must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
