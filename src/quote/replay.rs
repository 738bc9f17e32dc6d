//! Offline quote provider answering from recorded routing API responses.

use crate::cache::{load_from_file, save_to_file};
use crate::models::{QuoteMethod, QuoteRequest, Trade};
use crate::quote::wire::{QuoteRequestBody, QuoteResponse};
use crate::quote::QuoteProvider;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One recorded exchange. A missing response means the API found no route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedQuote {
    pub request: QuoteRequestBody,
    #[serde(default)]
    pub response: Option<QuoteResponse>,
}

#[derive(Debug, Default)]
pub struct ReplayQuoteProvider {
    recorded: Vec<RecordedQuote>,
    index: HashMap<String, usize>,
}

impl ReplayQuoteProvider {
    pub fn new(recorded: Vec<RecordedQuote>) -> Self {
        let index = recorded
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.request.cache_key(), i))
            .collect();
        Self { recorded, index }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let recorded: Vec<RecordedQuote> = load_from_file(path)?;
        Ok(Self::new(recorded))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_to_file(&self.recorded, path)
    }

    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

#[async_trait]
impl QuoteProvider for ReplayQuoteProvider {
    fn identifier(&self) -> &str {
        "replay"
    }

    async fn request_quote(&self, request: &QuoteRequest) -> Result<Option<Trade>, anyhow::Error> {
        let key = QuoteRequestBody::from_request(request).cache_key();
        let Some(&i) = self.index.get(&key) else {
            debug!("No recorded quote for {}", key);
            return Ok(None);
        };
        let response = self.recorded[i].response.clone();
        Ok(response.and_then(|r| r.into_trade(request, QuoteMethod::Replay)))
    }
}
