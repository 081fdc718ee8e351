//! Policy checks on proposed actions.

use super::models::{ActionKind, ActionProposal};
use serde::Serialize;

/// Outcome of a compliance review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceVerdict {
    pub compliant: bool,
    pub action: ActionProposal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_from: Option<ActionKind>,
}

impl ComplianceVerdict {
    fn accepted(action: ActionProposal) -> Self {
        Self {
            compliant: true,
            action,
            adjusted_from: None,
        }
    }

    fn adjusted(original: &ActionProposal, action: ActionKind, message: &str) -> Self {
        Self {
            compliant: false,
            action: ActionProposal {
                action,
                message: message.to_string(),
                transaction_id: original.transaction_id.clone(),
                customer_id: original.customer_id.clone(),
            },
            adjusted_from: Some(original.action),
        }
    }
}

/// A block must name the fraud risk that justifies it.
pub fn is_block_justified(proposal: &ActionProposal) -> bool {
    let message = proposal.message.trim().to_lowercase();
    !message.is_empty() && message.contains("fraud risk")
}

/// Review a proposal.
///
/// `otp_available` is the caller's answer to whether the customer still has
/// OTP quota; it is only consulted for `request_otp` proposals.
pub fn review(proposal: Option<&ActionProposal>, otp_available: bool) -> ComplianceVerdict {
    let Some(proposal) = proposal else {
        return ComplianceVerdict {
            compliant: false,
            action: ActionProposal {
                action: ActionKind::BlockTransaction,
                message: "No action proposed - defaulting to block".to_string(),
                transaction_id: None,
                customer_id: None,
            },
            adjusted_from: None,
        };
    };

    match proposal.action {
        ActionKind::BlockTransaction if !is_block_justified(proposal) => ComplianceVerdict::adjusted(
            proposal,
            ActionKind::FlagForReview,
            "Blocking requires manual review",
        ),
        ActionKind::RequestOtp if !otp_available => ComplianceVerdict::adjusted(
            proposal,
            ActionKind::FlagForReview,
            "OTP limit exceeded - requires review",
        ),
        _ => ComplianceVerdict::accepted(proposal.clone()),
    }
}
