use serde::{Deserialize, Serialize};

pub mod calculate;

pub use calculate::{FundClient, FundService, FundServiceError};

/// Body posted to the calculation endpoint.
#[derive(Serialize, Debug)]
pub struct FundRequest<'a> {
    pub message: &'a str,
}

/// Response from the calculation endpoint. Only `reply` is read; anything
/// else the service sends along is ignored.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FundReply {
    #[serde(default)]
    pub reply: Option<String>,
}

impl FundReply {
    pub fn with_text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }

    /// The reply text, if the service sent a non-empty one.
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|reply| !reply.is_empty())
    }
}
