//! afinimaki-client - Client library for the AfiniMaki recommendation API.
//!
//! This crate provides a typed client for the AfiniMaki XML-RPC API:
//! recording ratings, estimating unknown ratings, fetching recommendation
//! lists, managing wishlist/blacklist exclusions, and computing
//! user-to-user affinity ("soul mates"). Every call is independently
//! authenticated with a time-windowed digest; there are no sessions, no
//! retries, and no caching.
//!
//! # Example
//!
//! ```ignore
//! use afinimaki_client::{AfinimakiClient, ClientConfig};
//!
//! let config = ClientConfig::new(api_key, api_secret)?;
//! let client = AfinimakiClient::new(config);
//!
//! // Record a rating
//! client.record_rating(5, 10, 4).await?;
//!
//! // Fetch recommendations
//! let recs = client.get_recommendations(5).await?;
//! ```

mod auth;
mod client;
mod transport;
mod xmlrpc;

pub use client::AfinimakiClient;
pub use transport::{Transport, XmlRpcTransport};
pub use xmlrpc::Value;

pub use afinimaki_core::{
    AfiniError, AfiniResult, ClientConfig, ErrorCode, EstimatedRate, Rating, Recommendation,
    SoulMate, DEFAULT_ENDPOINT,
};
