use crate::models::Price;
use std::sync::Arc;

/// Keep `previous` when `candidate` carries the same rate between the same
/// base and quote assets; otherwise take `candidate`.
///
/// Consumers compare prices by pointer, so an unchanged rate must come back
/// as the very same `Arc`.
pub fn stabilize(candidate: Option<Arc<Price>>, previous: Option<&Arc<Price>>) -> Option<Arc<Price>> {
    match (candidate, previous) {
        (Some(candidate), Some(previous))
            if candidate.equal_to(previous)
                && candidate.base == previous.base
                && candidate.quote == previous.quote =>
        {
            Some(Arc::clone(previous))
        }
        (candidate, _) => candidate,
    }
}

/// Single-slot memo owned by one resolver instance.
#[derive(Debug, Default)]
pub struct StablePrice {
    last: Option<Arc<Price>>,
}

impl StablePrice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, candidate: Option<Price>) -> Option<Arc<Price>> {
        let stable = stabilize(candidate.map(Arc::new), self.last.as_ref());
        self.last = stable.clone();
        stable
    }

    pub fn get(&self) -> Option<&Arc<Price>> {
        self.last.as_ref()
    }
}
