// Path: crates/types/src/error/mod.rs
//! Core error types for the Ballot client.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// A JSON-RPC style error returned by the injected wallet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Wallet provider error {code}: {message}")]
pub struct ProviderError {
    /// The numeric EIP-1193 error code.
    pub code: i64,
    /// The provider's message.
    pub message: String,
}

impl ProviderError {
    /// The user dismissed the wallet prompt.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    /// Builds an error from a raw provider code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the user dismissed the prompt (code 4001).
    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }

    /// Whether the wallet does not know the requested chain (code 4902).
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}

/// Failures reported by the voting contract boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The call was rejected by the contract. `reason` carries the decoded
    /// revert string when the node returned one.
    #[error("Execution reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted {
        /// The decoded revert reason.
        reason: Option<String>,
    },
    /// The node or wallet rejected the request.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// The JSON-RPC error code.
        code: i64,
        /// The RPC error message.
        message: String,
    },
    /// The return data could not be decoded into the expected shape.
    #[error("Failed to decode contract return data: {0}")]
    Decode(String),
    /// No reader or signer was available for the call.
    #[error("Contract unavailable: {0}")]
    Unavailable(String),
}

impl ContractError {
    /// The structured revert reason, if any.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::Reverted { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// The most specific message available: the revert reason if present,
    /// otherwise the full error text.
    pub fn best_message(&self) -> String {
        self.revert_reason()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    /// Whether the wallet reported that the user declined to sign.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code, .. } if *code == ProviderError::USER_REJECTED)
    }
}

impl ErrorCode for ContractError {
    fn code(&self) -> &'static str {
        match self {
            Self::Reverted { .. } => "CONTRACT_REVERTED",
            Self::Rpc { .. } => "CONTRACT_RPC_ERROR",
            Self::Decode(_) => "CONTRACT_DECODE_ERROR",
            Self::Unavailable(_) => "CONTRACT_UNAVAILABLE",
        }
    }
}

/// Errors raised while establishing or maintaining the wallet binding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No injected wallet is present.
    #[error("No wallet provider is installed")]
    WalletUnavailable,
    /// The user dismissed the access prompt.
    #[error("Wallet access request was rejected")]
    UserRejected,
    /// The wallet granted access but returned no accounts.
    #[error("Wallet returned no accounts")]
    NoAccounts,
    /// Any other provider failure.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            Self::UserRejected
        } else {
            Self::Provider(err)
        }
    }
}

impl ErrorCode for WalletError {
    fn code(&self) -> &'static str {
        match self {
            Self::WalletUnavailable => "WALLET_UNAVAILABLE",
            Self::UserRejected => "WALLET_USER_REJECTED",
            Self::NoAccounts => "WALLET_NO_ACCOUNTS",
            Self::Provider(_) => "WALLET_PROVIDER_ERROR",
        }
    }
}

/// Errors raised by the contract gateway. These are never returned to
/// callers of write operations; they are recorded in `OperationState`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No injected wallet is present to sign with.
    #[error("No wallet detected. Please install MetaMask to continue.")]
    WalletUnavailable,
    /// The user declined to sign the transaction.
    #[error("Transaction was rejected in the wallet")]
    UserRejected,
    /// A wallet is present but no account is connected.
    #[error("Wallet not connected")]
    NotConnected,
    /// The connected wallet is on another chain.
    #[error("Please switch to {network} to continue")]
    WrongNetwork {
        /// Display name of the required network.
        network: String,
        /// The required chain id.
        expected: u64,
        /// The chain the wallet is on, if known.
        actual: Option<u64>,
    },
    /// The caller is not on the contract's voter allow-list.
    #[error("You must be registered as a voter first. Please contact an admin.")]
    NotRegistered,
    /// The caller already has a vote recorded on the proposal.
    #[error("You have already voted on this proposal.")]
    AlreadyVoted,
    /// The proposal's voting window has closed.
    #[error("This proposal has already ended.")]
    ProposalEnded,
    /// The contract has no proposal with this id.
    #[error("Proposal {0} not found")]
    ProposalNotFound(u64),
    /// The transaction was mined with a failure status.
    #[error("{}", .reason.as_deref().unwrap_or("Transaction failed"))]
    TransactionFailed {
        /// The revert reason when the node exposed one.
        reason: Option<String>,
    },
    /// A read-only query could not complete.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// The call was rejected before or during submission.
    #[error("{0}")]
    Submission(String),
}

impl GatewayError {
    /// Builds a submission-stage error, preferring the contract's revert reason.
    pub fn from_submission(err: ContractError) -> Self {
        if err.is_user_rejection() {
            return Self::UserRejected;
        }
        Self::Submission(err.best_message())
    }
}

impl ErrorCode for GatewayError {
    fn code(&self) -> &'static str {
        match self {
            Self::WalletUnavailable => "GATEWAY_WALLET_UNAVAILABLE",
            Self::UserRejected => "GATEWAY_USER_REJECTED",
            Self::NotConnected => "GATEWAY_NOT_CONNECTED",
            Self::WrongNetwork { .. } => "GATEWAY_WRONG_NETWORK",
            Self::NotRegistered => "GATEWAY_NOT_REGISTERED",
            Self::AlreadyVoted => "GATEWAY_ALREADY_VOTED",
            Self::ProposalEnded => "GATEWAY_PROPOSAL_ENDED",
            Self::ProposalNotFound(_) => "GATEWAY_PROPOSAL_NOT_FOUND",
            Self::TransactionFailed { .. } => "GATEWAY_TRANSACTION_FAILED",
            Self::QueryFailed(_) => "GATEWAY_QUERY_FAILED",
            Self::Submission(_) => "GATEWAY_SUBMISSION_FAILED",
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for `BallotConfig`.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but failed validation.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO_ERROR",
            Self::Parse(_) => "CONFIG_PARSE_ERROR",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_reason_preferred_over_wrapper_text() {
        let reverted = ContractError::Reverted {
            reason: Some("Voting period has ended".into()),
        };
        assert_eq!(reverted.best_message(), "Voting period has ended");

        let rpc = ContractError::Rpc {
            code: -32000,
            message: "insufficient funds".into(),
        };
        assert_eq!(rpc.best_message(), "RPC error -32000: insufficient funds");
    }

    #[test]
    fn provider_rejection_maps_to_user_rejected() {
        let err: WalletError = ProviderError::new(ProviderError::USER_REJECTED, "denied").into();
        assert_eq!(err, WalletError::UserRejected);

        let err: WalletError = ProviderError::new(-32002, "pending").into();
        assert_eq!(err.code(), "WALLET_PROVIDER_ERROR");
    }

    #[test]
    fn submission_rejection_in_wallet_is_user_rejected() {
        let err = GatewayError::from_submission(ContractError::Rpc {
            code: ProviderError::USER_REJECTED,
            message: "User denied transaction signature".into(),
        });
        assert_eq!(err, GatewayError::UserRejected);
    }

    #[test]
    fn wrong_network_names_the_required_network() {
        let err = GatewayError::WrongNetwork {
            network: "Sepolia Test Network".into(),
            expected: 11_155_111,
            actual: Some(1),
        };
        assert_eq!(err.to_string(), "Please switch to Sepolia Test Network to continue");
        assert_eq!(err.code(), "GATEWAY_WRONG_NETWORK");
    }

    #[test]
    fn transaction_failed_message() {
        assert_eq!(
            GatewayError::TransactionFailed { reason: None }.to_string(),
            "Transaction failed"
        );
        assert_eq!(
            GatewayError::TransactionFailed {
                reason: Some("Already voted".into())
            }
            .to_string(),
            "Already voted"
        );
    }
}
