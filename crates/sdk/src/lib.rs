/// Token Launchpad SDK
///
/// A client SDK for minting Token-2022 tokens on Solana with metadata
/// embedded on the mint through the metadata-pointer extension.
/// Provides high-level abstractions for:
/// - Metadata upload (image + JSON document on durable object storage)
/// - Transaction assembly (account creation, extension and mint
///   initialization, minting, authority adjustments)
/// - Submission through a pluggable wallet boundary

pub mod authority;
pub mod builder;
pub mod config;
pub mod error;
pub mod metadata;
pub mod network;
pub mod submit;
pub mod types;
pub mod wallet;

pub use authority::{resolve_authority, ResolvedAuthority};
pub use builder::{base_unit_supply, build_token_plan};
pub use config::{explorer_url, SdkConfig};
pub use error::{LaunchpadError, LaunchpadResult};
pub use metadata::{detect_image_format, packed_metadata_len, HttpUploader, MetadataUploader};
pub use network::{NetworkReader, RpcNetworkReader};
pub use submit::Orchestrator;
pub use types::{
    InstructionGroup, MetadataDocument, SubmissionState, TokenCreationResult, TokenRequest,
    TransactionPlan,
};
pub use wallet::{LocalWallet, WalletAdapter};
