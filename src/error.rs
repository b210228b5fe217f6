use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::ledger::{TransferId, TransferStatus};

/// Input rejected before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Recipient cannot be the zero address")]
    ZeroRecipient,

    #[error("Token {token} has no contract code")]
    NotAContract { token: Address },

    #[error("Destination chain {chain_id} is the source chain")]
    SameChain { chain_id: u64 },
}

/// Failure moving tokens in or out of custody.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient balance of {token} for {account}: have {available}, need {required}")]
    InsufficientBalance {
        token: Address,
        account: Address,
        available: U256,
        required: U256,
    },

    #[error("Insufficient allowance of {token} from {account}: have {available}, need {required}")]
    InsufficientAllowance {
        token: Address,
        account: Address,
        available: U256,
        required: U256,
    },

    #[error("Short transfer of {token}: expected {expected}, received {received}")]
    ShortTransfer {
        token: Address,
        expected: U256,
        received: U256,
    },

    #[error("Transfer of {token} rejected: {reason}")]
    TransferRejected { token: Address, reason: String },

    #[error("Approval of {token} for {spender} rejected: {reason}")]
    ApprovalRejected {
        token: Address,
        spender: Address,
        reason: String,
    },
}

/// Transfer ledger consistency violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Transfer {0} already exists")]
    DuplicateId(TransferId),

    #[error("Transfer {0} not found")]
    NotFound(TransferId),

    #[error("Illegal transition for transfer {id}: {from} -> {to}")]
    IllegalTransition {
        id: TransferId,
        from: TransferStatus,
        to: TransferStatus,
    },
}

/// Failure signalled by the router capability itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The router explicitly refused the call, with a reason.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The router failed in a way it did not describe.
    #[error("fault: {0}")]
    Fault(String),
}

impl RouterError {
    pub fn reason(&self) -> &str {
        match self {
            Self::Rejected(reason) | Self::Fault(reason) => reason,
        }
    }
}

/// Router failure attributed to a specific transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterFault {
    #[error("Router rejected transfer {transfer_id}: {reason}")]
    Rejected {
        transfer_id: TransferId,
        reason: String,
    },

    #[error("Router faulted on transfer {transfer_id}: {reason}")]
    Fault {
        transfer_id: TransferId,
        reason: String,
    },
}

impl RouterFault {
    pub fn transfer_id(&self) -> TransferId {
        match self {
            Self::Rejected { transfer_id, .. } | Self::Fault { transfer_id, .. } => *transfer_id,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Rejected { reason, .. } | Self::Fault { reason, .. } => reason,
        }
    }
}

/// Failure reported by a token capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct TokenError {
    pub reason: String,
}

impl TokenError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("{field} cannot be the zero address")]
    ZeroAddress { field: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiquidityError {
    #[error("Provider {provider} is not authorized")]
    NotAuthorized { provider: Address },

    #[error("Provider {provider} is already authorized")]
    AlreadyAuthorized { provider: Address },

    #[error("Insufficient liquidity position of {provider} in {token}: have {available}, requested {requested}")]
    InsufficientPosition {
        provider: Address,
        token: Address,
        available: U256,
        requested: U256,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("Fee of {bps} bps exceeds maximum of {max} bps")]
    AboveMaximum { bps: u16, max: u16 },
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Custody failed: {0}")]
    Custody(#[from] CustodyError),

    #[error("Ledger fault: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Router(#[from] RouterFault),

    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    #[error("Liquidity error: {0}")]
    Liquidity(#[from] LiquidityError),

    #[error("Fee error: {0}")]
    Fee(#[from] FeeError),

    #[error("Reentrant call rejected")]
    Reentrancy,

    /// Another thread is inside a guarded operation; the call may be retried.
    #[error("Contract busy with another caller")]
    Busy,

    #[error("Fee quote failed: {reason}")]
    FeeQuote { reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: &'static str },

    /// Funds stayed in custody because the compensating refund failed.
    #[error("{original}; refund failed: {refund}")]
    RefundFailed {
        original: Box<BridgeError>,
        refund: CustodyError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
