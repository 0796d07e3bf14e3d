use thiserror::Error;

/// Detail passed to the token provider when the backend rejects a token.
pub const TOKEN_REJECTED_DETAIL: &str =
    "Your Pulumi access token was rejected. Please re-authenticate.";

/// Errors surfaced to the user as a failed turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopilotError {
    #[error("Please login to Pulumi Cloud to use this feature.")]
    Unauthenticated,

    #[error("{detail}")]
    AuthenticationRejected { detail: String },

    #[error("Pulumi REST API is unavailable: {0}.")]
    Connectivity(String),

    #[error("The request was cancelled.")]
    Cancelled,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("You must select an organization to proceed.")]
    SelectionDismissed,

    #[error("Unexpected response from Pulumi Cloud: {0}")]
    InvalidResponse(String),

    #[error("credential store error: {0}")]
    Credential(String),
}

impl CopilotError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CopilotError::Cancelled)
    }

    pub fn rejected() -> Self {
        CopilotError::AuthenticationRejected {
            detail: TOKEN_REJECTED_DETAIL.to_string(),
        }
    }
}

/// Input the core refuses before doing any work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,

    #[error("Unknown organization '{0}'.")]
    UnknownOrganization(String),

    #[error("You are not a member of any Pulumi organization.")]
    NoOrganizations,
}
