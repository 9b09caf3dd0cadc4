use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchpadError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Insufficient funds: {required} lamports required, wallet holds {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Signing declined: {0}")]
    SigningDeclined(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type LaunchpadResult<T> = Result<T, LaunchpadError>;

impl From<solana_client::client_error::ClientError> for LaunchpadError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        LaunchpadError::Rpc(err.to_string())
    }
}

impl From<solana_sdk::program_error::ProgramError> for LaunchpadError {
    fn from(err: solana_sdk::program_error::ProgramError) -> Self {
        LaunchpadError::Serialization(err.to_string())
    }
}
