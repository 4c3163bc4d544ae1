//! Short advisory text generated from the ledger totals.
//!
//! The prompt carries only aggregate numbers and per-card used/limit pairs.
//! Any failure of the generator is logged and replaced by [`FALLBACK_ADVICE`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{aggregate::Summary, config::Config, ledger::Ledger};

pub const FALLBACK_ADVICE: &str = "Finansal durumunuz şu an stabil görünüyor.";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("No API key configured")]
    MissingApiKey,
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Response contained no text")]
    EmptyResponse,
}

/// Anything that turns a prompt into a piece of text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AdvisorError>;
}

pub fn build_prompt(ledger: &Ledger, summary: &Summary) -> String {
    let cards = ledger
        .cards()
        .iter()
        .map(|c| {
            format!(
                "{}: {}/{}",
                c.card_name,
                c.used_amount.normalize(),
                c.total_limit.normalize()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Finansal analiz: Kart borcu {} TL, Firma borcu {} TL. Kartlar: {}. CFO gibi 15 kelimelik net strateji ver.",
        summary.total_used.normalize(),
        summary.total_firm_debt.normalize(),
        cards
    )
}

/// Asks the generator for advice. Returns `None` without calling it when
/// there are no cards to talk about.
pub fn advise(generator: &impl TextGenerator, ledger: &Ledger, summary: &Summary) -> Option<String> {
    if ledger.cards().is_empty() {
        return None;
    }
    let prompt = build_prompt(ledger, summary);
    match generator.generate(&prompt) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Advisory request failed: {e}");
            Some(FALLBACK_ADVICE.to_string())
        }
    }
}

/// As [`advise`], for a generator that may have failed to build. A missing
/// generator still yields the fallback once there are cards.
pub fn advise_with<G: TextGenerator>(
    generator: Result<G, AdvisorError>,
    ledger: &Ledger,
    summary: &Summary,
) -> Option<String> {
    match generator {
        Ok(generator) => advise(&generator, ledger, summary),
        Err(_) if ledger.cards().is_empty() => None,
        Err(e) => {
            warn!("Advisory client unavailable: {e}");
            Some(FALLBACK_ADVICE.to_string())
        }
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, AdvisorError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_key,
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AdvisorError> {
        Self::new(config.api_key.clone(), config.model.clone())
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AdvisorError::MissingApiKey)?;

        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        info!(model = %self.model, "Requesting advice");
        let response: GenerateResponse = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest {
                contents: [Content {
                    parts: [RequestPart { text: prompt }],
                }],
            })
            .send()?
            .error_for_status()?
            .json()?;

        response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text.filter(|text| !text.trim().is_empty()))
            .ok_or(AdvisorError::EmptyResponse)
    }
}
