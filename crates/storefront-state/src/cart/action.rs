//! Pending (unconfirmed) cart actions.

use crate::cart::{LineTarget, Merchandise, MAX_QUANTITY_PER_LINE};
use crate::error::StorefrontError;
use crate::ids::{ActionId, ActionIdGenerator};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A cart-changing request the user has submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CartAction {
    /// Add quantity of a merchandise, creating a line if needed.
    AddLine {
        merchandise: Merchandise,
        quantity: i64,
        /// Unit price shown on a provisional line until the server prices it.
        unit_price: Option<Money>,
    },
    /// Set a line's absolute quantity.
    UpdateLine { target: LineTarget, quantity: i64 },
    /// Delete a line.
    RemoveLine { target: LineTarget },
}

impl CartAction {
    pub fn add(merchandise: Merchandise, quantity: i64) -> Self {
        CartAction::AddLine {
            merchandise,
            quantity,
            unit_price: None,
        }
    }

    pub fn update(target: impl Into<LineTarget>, quantity: i64) -> Self {
        CartAction::UpdateLine {
            target: target.into(),
            quantity,
        }
    }

    pub fn remove(target: impl Into<LineTarget>) -> Self {
        CartAction::RemoveLine {
            target: target.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CartAction::AddLine { .. } => "add_line",
            CartAction::UpdateLine { .. } => "update_line",
            CartAction::RemoveLine { .. } => "remove_line",
        }
    }

    /// Reject actions the backend could never accept.
    ///
    /// Updates may carry zero (which removes the line); adds must be positive.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        let quantity = match self {
            CartAction::AddLine { quantity, .. } => {
                if *quantity <= 0 {
                    return Err(StorefrontError::InvalidQuantity(*quantity));
                }
                *quantity
            }
            CartAction::UpdateLine { quantity, .. } => {
                if *quantity < 0 {
                    return Err(StorefrontError::InvalidQuantity(*quantity));
                }
                *quantity
            }
            CartAction::RemoveLine { .. } => return Ok(()),
        };
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(StorefrontError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }
        Ok(())
    }
}

/// A submitted action that has not settled yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingAction {
    /// Identity used to settle exactly this action.
    pub id: ActionId,
    pub action: CartAction,
}

/// Submission-ordered queue of pending actions owned by one session.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    ids: ActionIdGenerator,
    actions: Vec<PendingAction>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action behind everything already pending.
    pub fn submit(&mut self, action: CartAction) -> Result<PendingAction, StorefrontError> {
        action.validate()?;
        let pending = PendingAction {
            id: self.ids.next_id(),
            action,
        };
        self.actions.push(pending.clone());
        Ok(pending)
    }

    /// Remove the action with the given identity.
    ///
    /// Completions can arrive in any order; only the matching action leaves
    /// the queue and the relative order of the rest is untouched.
    pub fn settle(&mut self, id: ActionId) -> Option<PendingAction> {
        let index = self.actions.iter().position(|a| a.id == id)?;
        Some(self.actions.remove(index))
    }

    pub fn as_slice(&self) -> &[PendingAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.actions.iter().any(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MerchandiseId;

    #[test]
    fn test_submit_assigns_increasing_ids() {
        let mut queue = PendingQueue::new();
        let a = queue.submit(CartAction::add(Merchandise::new("m-1"), 1)).unwrap();
        let b = queue.submit(CartAction::add(Merchandise::new("m-2"), 1)).unwrap();
        assert!(a.id < b.id);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_settle_removes_only_matching_action() {
        let mut queue = PendingQueue::new();
        let a = queue.submit(CartAction::add(Merchandise::new("m-1"), 1)).unwrap();
        let b = queue.submit(CartAction::add(Merchandise::new("m-2"), 1)).unwrap();
        let c = queue.submit(CartAction::add(Merchandise::new("m-3"), 1)).unwrap();

        let settled = queue.settle(b.id).unwrap();
        assert_eq!(settled.id, b.id);
        let remaining: Vec<_> = queue.as_slice().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![a.id, c.id]);

        assert!(queue.settle(b.id).is_none());
    }

    #[test]
    fn test_submit_rejects_invalid_quantities() {
        let mut queue = PendingQueue::new();
        assert!(matches!(
            queue.submit(CartAction::add(Merchandise::new("m-1"), 0)),
            Err(StorefrontError::InvalidQuantity(0))
        ));
        assert!(matches!(
            queue.submit(CartAction::update(MerchandiseId::new("m-1"), -2)),
            Err(StorefrontError::InvalidQuantity(-2))
        ));
        assert!(matches!(
            queue.submit(CartAction::add(Merchandise::new("m-1"), MAX_QUANTITY_PER_LINE + 1)),
            Err(StorefrontError::QuantityExceedsLimit(_, _))
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_update_to_zero_is_valid() {
        let action = CartAction::update(MerchandiseId::new("m-1"), 0);
        assert!(action.validate().is_ok());
    }
}
