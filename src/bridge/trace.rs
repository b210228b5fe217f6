use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterFault};
use crate::events::BridgeEvent;
use crate::ledger::{Transfer, TransferId};

/// Result of a router deposit, as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOutcome {
    Completed,
    /// The router refused the deposit with a reason.
    Failed(String),
    /// The router failed without describing why, or lied about success.
    Fault(String),
}

impl RouterOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Attributes a failed outcome to `transfer_id`.
    pub fn into_fault(self, transfer_id: TransferId) -> Option<RouterFault> {
        match self {
            Self::Completed => None,
            Self::Failed(reason) => Some(RouterFault::Rejected {
                transfer_id,
                reason,
            }),
            Self::Fault(reason) => Some(RouterFault::Fault {
                transfer_id,
                reason,
            }),
        }
    }
}

impl From<Result<(), RouterError>> for RouterOutcome {
    fn from(result: Result<(), RouterError>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(RouterError::Rejected(reason)) => Self::Failed(reason),
            Err(RouterError::Fault(reason)) => Self::Fault(reason),
        }
    }
}

/// The FAILED record and signals of a rolled-back bridge attempt.
///
/// None of this is part of the committed ledger; it only exists so the
/// failure can be observed after the state was restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertTrace {
    /// The transfer as it stood when rolled back, with status FAILED.
    pub transfer: Transfer,
    /// Signals emitted during the attempt, in order.
    pub events: Vec<BridgeEvent>,
    pub reason: String,
}

impl RevertTrace {
    pub fn transfer_id(&self) -> TransferId {
        self.transfer.id
    }
}
