use thiserror::Error;

pub const LOAD_FALLBACK: &str = "An error occurred while loading data.";
pub const FILTER_FALLBACK: &str = "Error while searching/filtering.";
pub const CREATE_FALLBACK: &str = "Failed to create line items.";
pub const ASSIGN_FALLBACK: &str = "Failed to assign price list.";
pub const NO_VALID_ITEMS: &str = "Please select at least one valid product with quantity > 0.";
pub const NO_PRICE_LIST: &str = "Please select a price list.";

/// The remote operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Filter,
    Create,
    AssignPriceList,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Filter => "filter",
            Operation::Create => "create",
            Operation::AssignPriceList => "assign_price_list",
        }
    }

    /// Message shown when the failure payload carried none.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Load => LOAD_FALLBACK,
            Operation::Filter => FILTER_FALLBACK,
            Operation::Create => CREATE_FALLBACK,
            Operation::AssignPriceList => ASSIGN_FALLBACK,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one workflow attempt. The same message is also written
/// to the state store's error field; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{operation} failed: {message}")]
    Remote {
        operation: Operation,
        message: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl WorkflowError {
    pub fn remote(operation: Operation, failure: &shared::error::ApiError) -> Self {
        Self::Remote {
            operation,
            message: failure.message_or(operation.fallback_message()).to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text intended for inline display.
    pub fn user_message(&self) -> &str {
        match self {
            WorkflowError::Remote { message, .. } => message,
            WorkflowError::Validation(message) => message,
        }
    }
}
