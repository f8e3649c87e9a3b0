use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states for a ledger transaction.
///
/// A transaction starts as `created`, may move to `pending`, and lands in
/// `committed` on success or `failed` on the terminal failure branch. The
/// client never transitions state itself; it only filters on it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Created,
    Pending,
    Committed,
    Failed,
}

impl TransactionState {
    /// States requested by default when listing admin transactions.
    pub const DEFAULT_LIST_FILTER: [TransactionState; 3] = [
        TransactionState::Committed,
        TransactionState::Pending,
        TransactionState::Created,
    ];

    /// Keeps only recognized state names, silently dropping everything else.
    pub fn filter_valid<S: AsRef<str>>(requested: &[S]) -> Vec<TransactionState> {
        requested
            .iter()
            .filter_map(|state| state.as_ref().parse().ok())
            .collect()
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionState::Created => "created",
                TransactionState::Pending => "pending",
                TransactionState::Committed => "committed",
                TransactionState::Failed => "failed",
            }
        )
    }
}

impl FromStr for TransactionState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(TransactionState::Created),
            "pending" => Ok(TransactionState::Pending),
            "committed" => Ok(TransactionState::Committed),
            "failed" => Ok(TransactionState::Failed),
            _ => Err(()),
        }
    }
}

/// A single redemption record against a subsidy, tied to a learner, piece
/// of content, and access policy.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transaction {
    pub uuid: Uuid,
    pub state: TransactionState,
    pub subsidy_uuid: Option<Uuid>,
    pub lms_user_id: Option<i64>,
    pub content_key: Option<String>,
    pub subsidy_access_policy_uuid: Option<Uuid>,
    pub quantity: Option<i64>,
    pub metadata: Option<serde_json::Value>,
    pub idempotency_key: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// Transaction list envelope. `aggregates` is present when the listing was
/// requested with `include_aggregates`.
#[derive(Serialize, Deserialize, Debug)]
pub struct TransactionList {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Transaction>,
    pub aggregates: Option<serde_json::Value>,
}

/// Payload for creating a transaction. UUID-typed fields serialize to their
/// string form; `metadata` is always sent, null when absent.
#[derive(Serialize, Debug, Clone)]
pub struct CreateTransactionRequest {
    pub subsidy_uuid: Uuid,
    pub lms_user_id: i64,
    pub content_key: String,
    pub subsidy_access_policy_uuid: Uuid,
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    /// Only accepted by the v2 admin endpoint; the v1 client rejects it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_price_cents: Option<i64>,
}

impl CreateTransactionRequest {
    pub fn new(
        subsidy_uuid: Uuid,
        lms_user_id: i64,
        content_key: &str,
        subsidy_access_policy_uuid: Uuid,
    ) -> Self {
        Self {
            subsidy_uuid,
            lms_user_id,
            content_key: content_key.to_string(),
            subsidy_access_policy_uuid,
            metadata: None,
            idempotency_key: None,
            requested_price_cents: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_idempotency_key(mut self, idempotency_key: &str) -> Self {
        self.idempotency_key = Some(idempotency_key.to_string());
        self
    }

    pub fn with_requested_price_cents(mut self, requested_price_cents: i64) -> Self {
        self.requested_price_cents = Some(requested_price_cents);
        self
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{CreateTransactionRequest, TransactionState};

    #[test]
    fn state_round_trips_through_strings() {
        for state in [
            TransactionState::Created,
            TransactionState::Pending,
            TransactionState::Committed,
            TransactionState::Failed,
        ] {
            assert_eq!(state.to_string().parse(), Ok(state));
        }
    }

    #[test]
    fn filter_valid_drops_unrecognized_states() {
        let requested = ["committed", "bogus", "pending", "", "REVERSED"];
        assert_eq!(
            TransactionState::filter_valid(&requested),
            vec![TransactionState::Committed, TransactionState::Pending],
        );
    }

    #[test]
    fn filter_valid_can_yield_nothing() {
        assert_eq!(TransactionState::filter_valid(&["nope"]), vec![]);
    }

    #[test]
    fn default_list_filter_is_committed_pending_created() {
        assert_eq!(
            TransactionState::DEFAULT_LIST_FILTER,
            [
                TransactionState::Committed,
                TransactionState::Pending,
                TransactionState::Created,
            ],
        );
    }

    #[test]
    fn create_request_serializes_uuids_as_strings() {
        let subsidy_uuid = Uuid::new_v4();
        let policy_uuid = Uuid::new_v4();
        let request = CreateTransactionRequest::new(subsidy_uuid, 13, "edX+DemoX", policy_uuid);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["subsidy_uuid"], subsidy_uuid.to_string().as_str());
        assert_eq!(
            body["subsidy_access_policy_uuid"],
            policy_uuid.to_string().as_str()
        );
        assert_eq!(body["metadata"], serde_json::Value::Null);
        // optional fields stay out of the payload entirely when unset
        assert!(body.get("idempotency_key").is_none());
        assert!(body.get("requested_price_cents").is_none());
    }

    #[test]
    fn create_request_carries_optional_fields_when_set() {
        let request =
            CreateTransactionRequest::new(Uuid::new_v4(), 13, "edX+DemoX", Uuid::new_v4())
                .with_metadata(serde_json::json!({"source": "manual"}))
                .with_idempotency_key("retry-token-1")
                .with_requested_price_cents(14900);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["metadata"]["source"], "manual");
        assert_eq!(body["idempotency_key"], "retry-token-1");
        assert_eq!(body["requested_price_cents"], 14900);
    }
}
