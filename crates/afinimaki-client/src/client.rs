//! Recommendation client implementation for the AfiniMaki API.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use afinimaki_core::error::{AfiniError, AfiniResult};
use afinimaki_core::types::{Recommendation, SoulMate};
use afinimaki_core::ClientConfig;

use crate::auth;
use crate::transport::{Transport, XmlRpcTransport};
use crate::xmlrpc::Value;

/// Remote method names. Wire contract, must match exactly.
mod wire {
    pub const SET_RATE: &str = "set_rate";
    pub const ESTIMATE_RATE: &str = "estimate_rate";
    pub const ESTIMATE_MULTIPLE_RATES: &str = "estimate_multiple_rates";
    pub const GET_RECOMMENDATIONS: &str = "get_recommendations";
    pub const ADD_TO_WISHLIST: &str = "add_to_wishlist";
    pub const ADD_TO_BLACKLIST: &str = "add_to_blacklist";
    pub const USER_USER_AFINIMAKI: &str = "user_user_afinimaki";
    pub const GET_SOUL_MATES: &str = "get_soul_mates";
}

/// Client for the AfiniMaki recommendation service.
///
/// Holds only immutable configuration and a transport handle, so a single
/// instance can be shared across tasks.
pub struct AfinimakiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl AfinimakiClient {
    /// Create a client over the standard XML-RPC transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(XmlRpcTransport::new(config.endpoint.clone()));
        Self { config, transport }
    }

    /// Create a client over a caller-supplied transport. Used by tests to
    /// inject a recording double.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sign and dispatch one remote call.
    ///
    /// The wire argument order is always `(api_key, auth_token, ...params)`.
    async fn dispatch(&self, method: &str, params: Vec<Value>) -> AfiniResult<Value> {
        let first_value = params
            .first()
            .map(Value::scalar_string)
            .unwrap_or_default();
        let token = auth::auth_token(
            &self.config.api_secret,
            method,
            &first_value,
            auth::current_window(),
        );

        debug!(method, ?params, "dispatching remote call");
        if self.config.debug {
            eprintln!("afinimaki: calling {} with {:?}", method, params);
        }

        let mut wire_params = Vec::with_capacity(params.len() + 2);
        wire_params.push(Value::String(self.config.api_key.clone()));
        wire_params.push(Value::String(token));
        wire_params.extend(params);

        self.transport.call(method, &wire_params).await
    }

    /// Soft-validation short-circuit: return `empty` without touching the
    /// transport, or a validation error in strict mode.
    fn missing_argument<T>(&self, what: &str, empty: T) -> AfiniResult<T> {
        if self.config.strict {
            Err(AfiniError::validation(format!(
                "missing required argument: {}",
                what
            )))
        } else {
            Ok(empty)
        }
    }

    /// Record a user's rating of an item.
    pub async fn record_rating(&self, user_id: i64, item_id: i64, rate: i32) -> AfiniResult<()> {
        if user_id == 0 || item_id == 0 || rate == 0 {
            return self.missing_argument("user_id, item_id, and rate", ());
        }
        self.dispatch(
            wire::SET_RATE,
            vec![
                Value::Int64(user_id),
                Value::Int64(item_id),
                Value::Int(rate),
                Value::Bool(true),
            ],
        )
        .await?;
        Ok(())
    }

    /// Estimate a user's rating of an item. Returns `None` when the server
    /// cannot produce an estimate.
    pub async fn estimate_rate(&self, user_id: i64, item_id: i64) -> AfiniResult<Option<f64>> {
        if user_id == 0 || item_id == 0 {
            return self.missing_argument("user_id and item_id", None);
        }
        let raw = self
            .dispatch(
                wire::ESTIMATE_RATE,
                vec![Value::Int64(user_id), Value::Int64(item_id)],
            )
            .await?;
        Ok(raw.as_f64())
    }

    /// Estimate a user's rating of several items in one call.
    ///
    /// The server returns one entry per requested item, in request order;
    /// the result pairs them back up by position. A response of any other
    /// length is a [`AfiniError::ResponseShape`] error. Items the server
    /// cannot estimate map to `None`.
    pub async fn estimate_multiple_rates(
        &self,
        user_id: i64,
        item_ids: &[i64],
    ) -> AfiniResult<HashMap<i64, Option<f64>>> {
        if user_id == 0 || item_ids.is_empty() {
            return self.missing_argument("user_id and item_ids", HashMap::new());
        }
        let items = Value::Array(item_ids.iter().map(|&id| Value::Int64(id)).collect());
        let raw = self
            .dispatch(
                wire::ESTIMATE_MULTIPLE_RATES,
                vec![Value::Int64(user_id), items],
            )
            .await?;

        let rates = raw
            .into_array()
            .ok_or_else(|| AfiniError::unexpected_type("expected an array of rates"))?;
        if rates.len() != item_ids.len() {
            return Err(AfiniError::response_shape(item_ids.len(), rates.len()));
        }

        Ok(item_ids
            .iter()
            .copied()
            .zip(rates.iter().map(Value::as_f64))
            .collect())
    }

    /// Fetch the ranked recommendation list for a user. Order is
    /// server-determined and preserved.
    pub async fn get_recommendations(&self, user_id: i64) -> AfiniResult<Vec<Recommendation>> {
        if user_id == 0 {
            return self.missing_argument("user_id", Vec::new());
        }
        let raw = self
            .dispatch(
                wire::GET_RECOMMENDATIONS,
                vec![Value::Int64(user_id), Value::Bool(false)],
            )
            .await?;

        let pairs = decode_pairs(raw, "recommendation")?;
        Ok(pairs
            .into_iter()
            .map(|(item_id, estimated_rate)| Recommendation::new(item_id, estimated_rate))
            .collect())
    }

    /// Add an item to a user's wishlist, excluding it from future
    /// recommendation lists.
    pub async fn add_to_wishlist(&self, user_id: i64, item_id: i64) -> AfiniResult<()> {
        if user_id == 0 || item_id == 0 {
            return self.missing_argument("user_id and item_id", ());
        }
        self.dispatch(
            wire::ADD_TO_WISHLIST,
            vec![Value::Int64(user_id), Value::Int64(item_id)],
        )
        .await?;
        Ok(())
    }

    /// Add an item to a user's blacklist, excluding it from future
    /// recommendation lists.
    pub async fn add_to_blacklist(&self, user_id: i64, item_id: i64) -> AfiniResult<()> {
        if user_id == 0 || item_id == 0 {
            return self.missing_argument("user_id and item_id", ());
        }
        self.dispatch(
            wire::ADD_TO_BLACKLIST,
            vec![Value::Int64(user_id), Value::Int64(item_id)],
        )
        .await?;
        Ok(())
    }

    /// Compute the affinity score between two users, in `[0.0, 1.0]`.
    pub async fn user_user_affinity(
        &self,
        user_id_1: i64,
        user_id_2: i64,
    ) -> AfiniResult<Option<f64>> {
        if user_id_1 == 0 || user_id_2 == 0 {
            return self.missing_argument("user_id_1 and user_id_2", None);
        }
        let raw = self
            .dispatch(
                wire::USER_USER_AFINIMAKI,
                vec![Value::Int64(user_id_1), Value::Int64(user_id_2)],
            )
            .await?;
        Ok(raw.as_f64())
    }

    /// Fetch the list of users most similar to `user_id`, with their
    /// affinity scores. Order is server-determined and preserved.
    pub async fn get_soul_mates(&self, user_id: i64) -> AfiniResult<Vec<SoulMate>> {
        if user_id == 0 {
            return self.missing_argument("user_id", Vec::new());
        }
        let raw = self
            .dispatch(wire::GET_SOUL_MATES, vec![Value::Int64(user_id)])
            .await?;

        let pairs = decode_pairs(raw, "soul mate")?;
        Ok(pairs
            .into_iter()
            .map(|(user_id, afinimaki)| SoulMate::new(user_id, afinimaki))
            .collect())
    }
}

/// Decode a list of `(id, score)` two-element tuples, preserving order.
fn decode_pairs(raw: Value, what: &str) -> AfiniResult<Vec<(i64, f64)>> {
    let rows = raw
        .into_array()
        .ok_or_else(|| AfiniError::unexpected_type(format!("expected an array of {}s", what)))?;

    rows.into_iter()
        .map(|row| {
            let pair = row.into_array().ok_or_else(|| {
                AfiniError::unexpected_type(format!("expected a {} entry to be a pair", what))
            })?;
            if pair.len() != 2 {
                return Err(AfiniError::unexpected_type(format!(
                    "expected a 2-element {} entry, got {} elements",
                    what,
                    pair.len()
                )));
            }
            let mut fields = pair.into_iter();
            let id = fields.next().and_then(|v| v.as_i64()).ok_or_else(|| {
                AfiniError::unexpected_type(format!("{} entry has a non-integer id", what))
            })?;
            let score = fields.next().and_then(|v| v.as_f64()).ok_or_else(|| {
                AfiniError::unexpected_type(format!("{} entry has a non-numeric score", what))
            })?;
            Ok((id, score))
        })
        .collect()
}
