//! Data types exchanged with the AfiniMaki service.
//!
//! All values are transient: created for one call and handed straight to the
//! caller. Nothing here has a storage lifecycle.

use serde::{Deserialize, Serialize};

/// A user's rating of an item. Written via `record_rating`, never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// User identifier.
    pub user_id: i64,
    /// Item identifier.
    pub item_id: i64,
    /// The rating value.
    pub rate: i32,
}

impl Rating {
    /// Create a new rating.
    pub fn new(user_id: i64, item_id: i64, rate: i32) -> Self {
        Self {
            user_id,
            item_id,
            rate,
        }
    }
}

/// A server-estimated rating for one item.
///
/// `estimated_rate` is `None` when the server could not estimate a value for
/// the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedRate {
    /// Item identifier.
    pub item_id: i64,
    /// The estimated rating, absent when not estimable.
    pub estimated_rate: Option<f64>,
}

impl EstimatedRate {
    /// Create a new estimated rate.
    pub fn new(item_id: i64, estimated_rate: Option<f64>) -> Self {
        Self {
            item_id,
            estimated_rate,
        }
    }

    /// Whether the server produced an estimate for this item.
    pub fn is_estimable(&self) -> bool {
        self.estimated_rate.is_some()
    }
}

/// One entry in a recommendation list, ordered by server-determined relevance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Item identifier.
    pub item_id: i64,
    /// The estimated rating for this item.
    pub estimated_rate: f64,
}

impl Recommendation {
    /// Create a new recommendation entry.
    pub fn new(item_id: i64, estimated_rate: f64) -> Self {
        Self {
            item_id,
            estimated_rate,
        }
    }
}

/// One entry in a list of similar users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoulMate {
    /// User identifier of the similar user.
    pub user_id: i64,
    /// Affinity score in `[0.0, 1.0]` quantifying taste similarity.
    pub afinimaki: f64,
}

impl SoulMate {
    /// Create a new soul mate entry.
    pub fn new(user_id: i64, afinimaki: f64) -> Self {
        Self { user_id, afinimaki }
    }
}
