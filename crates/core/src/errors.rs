use thiserror::Error;

use crate::domain::order::OrderStatus;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid order transition from {from:?} to {to:?}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no active outlet can deliver to the requested location")]
    NoOutletAvailable,
    #[error("product `{0}` is not available")]
    ProductUnavailable(String),
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),
    #[error("order items creation failed: {0}")]
    OrderItemsCreationFailed(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApplicationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::InvalidOrderTransition { .. }) => {
                "The order is no longer in a state that allows this action."
            }
            Self::Domain(DomainError::InvariantViolation(_)) => {
                "An unexpected internal error occurred."
            }
            Self::InvalidInput(_) => "The request could not be processed. Check inputs and try again.",
            Self::NoOutletAvailable => "No outlets are currently available in your area.",
            Self::ProductUnavailable(_) => "One of the requested products is not available right now.",
            Self::OrderCreationFailed(_) | Self::OrderItemsCreationFailed(_) => {
                "The order could not be created. Please try again."
            }
            Self::StoreUnavailable(_) => "The service is temporarily unavailable. Please retry shortly.",
        }
    }
}
