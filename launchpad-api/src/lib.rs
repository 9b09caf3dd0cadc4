//! Token Launchpad API service
//!
//! HTTP front for the launchpad workflow: a multipart upload relay that
//! places token images and metadata documents on durable object storage,
//! and a transaction-build endpoint that returns mint-co-signed,
//! base64-encoded transactions ready for an external wallet's signature.

pub mod api;
pub mod config;
pub mod storage;
