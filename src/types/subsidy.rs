use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A funded balance scoped to an enterprise customer, from which
/// transactions draw value. Lifecycle is managed entirely server-side;
/// this client only reads it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Subsidy {
    pub uuid: Uuid,
    pub title: String,
    pub enterprise_customer_uuid: Uuid,
    pub active_datetime: Option<DateTime<Utc>>,
    pub expiration_datetime: Option<DateTime<Utc>>,
    /// Monetary unit, e.g. `usd_cents`.
    pub unit: String,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub current_balance: Option<serde_json::Value>,
}
