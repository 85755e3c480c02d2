use thiserror::Error;

use crate::backend::BackendError;
use crate::chain::ChainError;
use crate::polling::PollError;
use crate::store::StoreError;

/// Failures of a wallet operation, classified for the HTTP boundary.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Missing or malformed caller input.
    #[error("{0}")]
    InvalidInput(String),

    /// The balance never became positive within the polling budget.
    #[error("{0}")]
    FundsNotReceived(String),

    /// A receipt or signature never confirmed within the polling budget.
    #[error("{0}")]
    NotConfirmed(String),

    /// A balance check produced something that is not a number.
    #[error("{0}")]
    InvalidBalance(String),

    #[error(transparent)]
    Backend(BackendError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WalletError {
    pub fn invalid(message: impl Into<String>) -> Self {
        WalletError::InvalidInput(message.into())
    }
}

impl From<ChainError> for WalletError {
    fn from(e: ChainError) -> Self {
        BackendError::Chain(e).into()
    }
}

impl From<BackendError> for WalletError {
    fn from(e: BackendError) -> Self {
        if e.is_invalid_input() {
            WalletError::InvalidInput(e.to_string())
        } else {
            WalletError::Backend(e)
        }
    }
}

impl From<PollError<BackendError>> for WalletError {
    fn from(e: PollError<BackendError>) -> Self {
        match e {
            PollError::Check(inner) => inner.into(),
            PollError::FundsNotReceived { .. } => WalletError::FundsNotReceived(e.to_string()),
            PollError::NotConfirmed { .. } => WalletError::NotConfirmed(e.to_string()),
            PollError::InvalidBalance(_) => WalletError::InvalidBalance(e.to_string()),
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err: WalletError = ChainError::UnknownNetwork("mainnet".into()).into();
        assert!(matches!(err, WalletError::InvalidInput(ref m) if m == "Unknown network: mainnet"));

        let err: WalletError = ChainError::Rpc("connection refused".into()).into();
        assert!(matches!(err, WalletError::Backend(_)));

        let err: WalletError = PollError::<BackendError>::FundsNotReceived { attempts: 3 }.into();
        assert_eq!(err.to_string(), "No funds received after 3 attempts");

        let err: WalletError =
            PollError::Check(BackendError::Chain(ChainError::InvalidAddress("x".into()))).into();
        assert!(matches!(err, WalletError::InvalidInput(_)));
    }
}
