use anyhow::{Result, Context};
use log::{warn, info, debug};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::database::{GlossaryEntry, HistoryEntry, Repository};
use crate::errors::AppError;
use crate::file_utils::{FileManager, LoadedInputs};
use crate::language_utils;
use crate::translation::{apply_glossary, ProgressReporter, TranslationRequest, TranslationService};

// @module: Application controller wiring config, providers, storage and glossary

/// Outcome of a successful translate call
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Final text, glossary applied
    pub text: String,
    /// Source language used
    pub source_language: String,
    /// Target language used
    pub target_language: String,
    /// Wall time of the call
    pub elapsed: std::time::Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared translation service
    service: Arc<TranslationService>,
    // @field: Local persistence, absent when running without a database
    repository: Option<Repository>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let repository = match &config.storage.database_path {
            Some(path) => Repository::new(crate::database::DatabaseConnection::new(path)?),
            None => Repository::new_default()?,
        };
        let service = TranslationService::from_config(&config.translation);

        Ok(Self::with_parts(config, Arc::new(service), Some(repository)))
    }

    /// Assemble a controller from prepared parts
    pub fn with_parts(config: Config, service: Arc<TranslationService>, repository: Option<Repository>) -> Self {
        Self { config, service, repository }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared translation service, for cancelling from a signal handler
    pub fn service(&self) -> Arc<TranslationService> {
        Arc::clone(&self.service)
    }

    fn repository(&self) -> Result<&Repository> {
        self.repository
            .as_ref()
            .ok_or_else(|| anyhow::Error::new(AppError::Config("No database is configured".to_string())))
    }

    /// Load persisted cache entries into the service cache
    pub async fn load_cache(&self) -> Result<usize> {
        let Some(repository) = &self.repository else { return Ok(0) };
        if !self.service.cache.is_enabled() {
            return Ok(0);
        }

        let entries = repository
            .load_cache_entries(self.service.cache.max_age())
            .await
            .context("Failed to load translation cache")?;
        Ok(self.service.cache.hydrate(entries))
    }

    /// Persist the service cache and prune the stored copy
    pub async fn persist_cache(&self) -> Result<usize> {
        let Some(repository) = &self.repository else { return Ok(0) };
        if !self.service.cache.is_enabled() {
            return Ok(0);
        }

        self.service.cache.prune_expired();
        let stored = repository
            .store_cache_entries(self.service.cache.snapshot())
            .await
            .context("Failed to store translation cache")?;
        repository
            .prune_cache(self.service.cache.max_entries(), self.service.cache.max_age())
            .await
            .context("Failed to prune translation cache")?;
        Ok(stored)
    }

    /// Append the text of `files` to `text`
    pub fn collect_input(text: Option<String>, files: &[PathBuf]) -> LoadedInputs {
        let mut inputs = FileManager::load_inputs(files);
        if let Some(text) = text {
            inputs.text = format!("{}{}", text, inputs.text);
        }
        inputs
    }

    /// Translate `text`, applying the glossary and recording history
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: Option<&str>,
        target_language: Option<&str>,
        show_progress: bool,
    ) -> Result<TranslationOutcome> {
        let start_time = Instant::now();

        let source_language = source_language.unwrap_or(&self.config.source_language);
        let target_language = target_language.unwrap_or(&self.config.target_language);
        language_utils::validate_source_language(source_language)?;
        language_utils::validate_target_language(target_language)?;
        let source_language = language_utils::normalize_to_part1_or_part2t(source_language)?;
        let target_language = language_utils::normalize_to_part1_or_part2t(target_language)?;

        info!(
            "Translating {} chars: {} -> {}",
            text.chars().count(),
            language_utils::get_language_name(&source_language)?,
            language_utils::get_language_name(&target_language)?
        );

        let request = TranslationRequest::new(text, source_language.clone(), target_language.clone())?;

        let progress_bar = if show_progress {
            let pb = ProgressBar::new(100);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
                .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {percent}%"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style.progress_chars("=>-"));
            pb
        } else {
            ProgressBar::hidden()
        };

        let pb = progress_bar.clone();
        let reporter = ProgressReporter::new(Arc::new(move |percentage: f64| {
            pb.set_position(percentage.round() as u64);
        }));

        let result = self.service.translate(request, &reporter).await;
        progress_bar.finish_and_clear();
        let translated = result?;

        let text_out = match &self.repository {
            Some(repository) => {
                let glossary = repository
                    .list_glossary(Some(&target_language))
                    .await
                    .context("Failed to load glossary")?;
                debug!("Applying {} glossary entries", glossary.len());
                apply_glossary(&translated, &glossary)
            }
            None => translated,
        };

        if self.config.storage.record_history && !text_out.is_empty() {
            if let Some(repository) = &self.repository {
                let entry = HistoryEntry::new(
                    text.to_string(),
                    text_out.clone(),
                    source_language.clone(),
                    target_language.clone(),
                );
                if let Err(e) = repository.add_history(&entry).await {
                    warn!("Failed to record history: {}", e);
                } else if let Err(e) = repository.prune_history(self.config.storage.history_limit).await {
                    warn!("Failed to prune history: {}", e);
                }
            }
        }

        let elapsed = start_time.elapsed();
        info!("Translation completed in {}", Self::format_duration(elapsed));

        Ok(TranslationOutcome {
            text: text_out,
            source_language,
            target_language,
            elapsed,
        })
    }

    /// Most recent history entries, up to `limit` or the configured limit
    pub async fn history(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let limit = limit.unwrap_or(self.config.storage.history_limit);
        self.repository()?.list_history(limit).await
    }

    /// Remove all history
    pub async fn clear_history(&self) -> Result<i64> {
        self.repository()?.clear_history().await
    }

    /// Glossary entries, optionally for one target language
    pub async fn glossary(&self, target_language: Option<&str>) -> Result<Vec<GlossaryEntry>> {
        self.repository()?.list_glossary(target_language).await
    }

    /// Add a glossary entry
    pub async fn add_glossary_entry(&self, term: &str, translation: &str, target_language: &str) -> Result<i64> {
        language_utils::validate_target_language(target_language)?;
        let target_language = language_utils::normalize_to_part1_or_part2t(target_language)?;
        let entry = GlossaryEntry::new(term.to_string(), translation.to_string(), target_language);
        self.repository()?.add_glossary_entry(&entry).await
    }

    /// Replace a glossary entry
    pub async fn update_glossary_entry(&self, id: i64, term: &str, translation: &str, target_language: &str) -> Result<bool> {
        language_utils::validate_target_language(target_language)?;
        let target_language = language_utils::normalize_to_part1_or_part2t(target_language)?;
        let mut entry = GlossaryEntry::new(term.to_string(), translation.to_string(), target_language);
        entry.id = id;
        self.repository()?.update_glossary_entry(&entry).await
    }

    /// Delete a glossary entry
    pub async fn delete_glossary_entry(&self, id: i64) -> Result<bool> {
        self.repository()?.delete_glossary_entry(id).await
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
