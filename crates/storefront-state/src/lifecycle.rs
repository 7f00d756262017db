//! Add-to-cart mutation lifecycle.
//!
//! Tracks one submission at a time for the product the modal shows and
//! decides when the modal should close itself: on the first successful
//! settlement, once, and only for the product still being viewed.

use crate::ids::{ActionId, ProductId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Terminal result of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    Success,
    /// The backend (or the channel) reported these errors.
    Failure(Vec<String>),
}

impl MutationOutcome {
    /// Success when the error payload is empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            MutationOutcome::Success
        } else {
            MutationOutcome::Failure(errors)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success)
    }
}

/// Where the tracked mutation is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Idle,
    Submitting(ActionId),
    Settled(MutationOutcome),
}

/// Lifecycle of the add-to-cart mutation for the viewed product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationLifecycle {
    product_id: Option<ProductId>,
    state: LifecycleState,
    has_fired: bool,
}

impl MutationLifecycle {
    pub fn new() -> Self {
        Self {
            product_id: None,
            state: LifecycleState::Idle,
            has_fired: false,
        }
    }

    /// Follow the product on screen.
    ///
    /// A different product gets a fresh lifecycle: any in-flight submission
    /// stops being tracked (its network call is unaffected) and the fired
    /// flag clears. Returns `true` if the product changed.
    pub fn track(&mut self, product_id: Option<&ProductId>) -> bool {
        if self.product_id.as_ref() == product_id {
            return false;
        }
        if let LifecycleState::Submitting(action) = &self.state {
            debug!(%action, "viewed product changed, dropping interest in in-flight mutation");
        }
        self.product_id = product_id.cloned();
        self.state = LifecycleState::Idle;
        self.has_fired = false;
        true
    }

    /// Idle -> Submitting. Settled counts as idle for the next action.
    ///
    /// Returns `false` (and changes nothing) while a submission is in flight.
    pub fn submit(&mut self, action: ActionId) -> bool {
        if matches!(self.state, LifecycleState::Submitting(_)) {
            return false;
        }
        self.state = LifecycleState::Submitting(action);
        true
    }

    /// Submitting -> Settled for the tracked action.
    ///
    /// Returns `true` exactly when the caller should run the close side
    /// effect: the first successful settlement for this product. Settling an
    /// action that is not the tracked one, or settling it again, returns
    /// `false` and changes nothing.
    pub fn settle(&mut self, action: ActionId, outcome: MutationOutcome) -> bool {
        if self.state != LifecycleState::Submitting(action) {
            return false;
        }
        let fire = outcome.is_success() && !self.has_fired;
        self.state = LifecycleState::Settled(outcome);
        if fire {
            self.has_fired = true;
            info!(%action, product = ?self.product_id, "first successful add, closing modal");
        }
        fire
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    /// Ready for a new submission.
    pub fn is_idle(&self) -> bool {
        !matches!(self.state, LifecycleState::Submitting(_))
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Errors of the last settlement, if it failed.
    pub fn last_errors(&self) -> &[String] {
        match &self.state {
            LifecycleState::Settled(MutationOutcome::Failure(errors)) => errors,
            _ => &[],
        }
    }
}

impl Default for MutationLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
