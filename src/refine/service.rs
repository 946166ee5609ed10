use reqwest::Client;
use tracing::{info, warn};

use super::llm_client::request_completion;
use super::prompts;
use crate::config::RefineConfig;

/// Result of one refinement attempt.
///
/// `text` always holds usable report text: the polished version on success,
/// the original on failure. `notice` carries the user-visible failure
/// message when the service could not be reached.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    pub text: String,
    pub refined: bool,
    pub notice: Option<String>,
}

/// Refinement orchestrator: one shared HTTP client plus the process-wide
/// configuration, passed in explicitly at startup.
pub struct Refiner {
    client: Client,
    config: RefineConfig,
}

impl Refiner {
    pub fn new(config: RefineConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Sends the assembled report for grammar polishing.
    ///
    /// Never fails the submission: any service error is logged, surfaced in
    /// the outcome's notice, and the original text is returned unchanged.
    pub async fn refine_report(&self, report: &str) -> RefineOutcome {
        info!(
            "🔄 Refinando o histórico com {} (modelo {})",
            self.config.provider, self.config.model
        );

        let result = request_completion(
            &self.client,
            &self.config.provider,
            &self.config.model,
            self.config.api_key.as_deref().unwrap_or_default(),
            prompts::refine_system_prompt(),
            &prompts::refine_user_prompt(report),
            self.config.endpoint.as_deref(),
            self.config.max_tokens,
            self.config.temperature,
        )
        .await;

        match result {
            Ok(text) if !text.is_empty() => {
                info!("✓ Histórico refinado com sucesso");
                RefineOutcome {
                    text,
                    refined: true,
                    notice: None,
                }
            }
            Ok(_) => {
                warn!("⚠️ O serviço de refinamento devolveu texto vazio; mantendo o original");
                RefineOutcome {
                    text: report.to_string(),
                    refined: false,
                    notice: Some("resposta do serviço de refinamento sem conteúdo".to_string()),
                }
            }
            Err(e) => {
                warn!("⚠️ Erro ao conectar com o serviço de refinamento: {}", e);
                RefineOutcome {
                    text: report.to_string(),
                    refined: false,
                    notice: Some(e.to_string()),
                }
            }
        }
    }
}
