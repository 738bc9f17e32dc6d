//! Request eligibility and per-resolver request tracking.
//!
//! A resolver decides up front whether an asset needs a quote at all
//! ([`PricePlan`]), then tracks at most one outstanding request by key.
//! Results that arrive for a key the resolver no longer wants are dropped.

use crate::models::{Price, QuoteRequest, QuoteState, RequestKey, Trade};
use crate::pricing::stability::StablePrice;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a resolver has to do to price an asset.
#[derive(Debug, Clone)]
pub enum PricePlan {
    /// The chain or asset is not configured; nothing can be priced.
    Unsupported,
    /// The answer is known without asking the quote service.
    Identity(Price),
    /// A probe quote is required.
    Quote(QuoteRequest),
}

#[derive(Debug)]
pub struct QuoteTracker {
    current: Option<RequestKey>,
    state: QuoteState,
    /// Last valid trade and the key it answered.
    last_valid: Option<(RequestKey, Trade)>,
}

impl Default for QuoteTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteTracker {
    pub fn new() -> Self {
        Self {
            current: None,
            state: QuoteState::Idle,
            last_valid: None,
        }
    }

    pub fn state(&self) -> QuoteState {
        self.state
    }

    pub fn current_key(&self) -> Option<&RequestKey> {
        self.current.as_ref()
    }

    /// Start tracking `key`. Returns `false` when a request for the same key
    /// is already in flight and no new request should be sent.
    pub fn begin(&mut self, key: RequestKey) -> bool {
        if self.state.is_pending() && self.current.as_ref() == Some(&key) {
            return false;
        }
        self.state = if self.last_valid.is_some() {
            QuoteState::Syncing
        } else {
            QuoteState::Loading
        };
        debug!("Quote request {} -> {:?}", key, self.state);
        self.current = Some(key);
        true
    }

    /// Record the outcome of the request sent for `key`. Returns `false` if
    /// the result is stale and was discarded.
    pub fn complete(&mut self, key: &RequestKey, outcome: Result<Option<Trade>, anyhow::Error>) -> bool {
        if self.current.as_ref() != Some(key) {
            debug!("Discarding stale quote for {}", key);
            return false;
        }
        match outcome {
            Ok(Some(trade)) => {
                self.state = QuoteState::Valid;
                self.last_valid = Some((key.clone(), trade));
            }
            Ok(None) => {
                self.state = QuoteState::NoRoute;
                self.last_valid = None;
            }
            Err(e) => {
                warn!("Quote request {} failed: {:#}", key, e);
                self.state = QuoteState::Invalid;
                self.last_valid = None;
            }
        }
        true
    }

    /// Forget the current request, e.g. when the asset becomes ineligible.
    pub fn reset(&mut self) {
        self.current = None;
        self.state = QuoteState::Idle;
        self.last_valid = None;
    }

    /// The retained trade, only if it answered the current key.
    pub fn trade(&self) -> Option<&Trade> {
        match (&self.current, &self.last_valid) {
            (Some(current), Some((key, trade))) if current == key => Some(trade),
            _ => None,
        }
    }
}

/// Mid price of the first route of a classic trade. Offchain orders carry
/// no route and price nothing.
pub fn classic_mid_price(trade: &Trade) -> Option<&Price> {
    trade.as_classic()?.routes.first().map(|route| &route.mid_price)
}

/// The part shared by the probe-quote resolvers: which plan is active, the
/// request tracker and the stability slot.
#[derive(Debug, Default)]
pub(crate) struct ProbeQuote {
    tracker: QuoteTracker,
    stable: StablePrice,
    identity: Option<Price>,
    request: Option<QuoteRequest>,
}

impl ProbeQuote {
    /// Switch to `plan`. Returns the request to send, if one is needed.
    pub(crate) fn prepare(&mut self, plan: PricePlan) -> Option<QuoteRequest> {
        match plan {
            PricePlan::Unsupported => {
                self.tracker.reset();
                self.identity = None;
                self.request = None;
                None
            }
            PricePlan::Identity(price) => {
                self.tracker.reset();
                self.identity = Some(price);
                self.request = None;
                None
            }
            PricePlan::Quote(request) => {
                self.identity = None;
                let send = self.tracker.begin(request.key());
                self.request = Some(request.clone());
                send.then_some(request)
            }
        }
    }

    pub(crate) fn apply(&mut self, key: &RequestKey, outcome: Result<Option<Trade>, anyhow::Error>) -> bool {
        self.tracker.complete(key, outcome)
    }

    pub(crate) fn is_identity(&self) -> bool {
        self.identity.is_some()
    }

    pub(crate) fn state(&self) -> QuoteState {
        self.tracker.state()
    }

    /// Current price, passed through the stability slot.
    pub(crate) fn price(&mut self) -> Option<Arc<Price>> {
        let candidate = match (&self.identity, &self.request) {
            (Some(identity), _) => Some(identity.clone()),
            (None, Some(request)) => self
                .tracker
                .trade()
                .and_then(classic_mid_price)
                .map(|mid| Price::new(request.input.clone(), request.output.clone(), mid.raw().clone())),
            (None, None) => None,
        };
        self.stable.update(candidate)
    }
}
