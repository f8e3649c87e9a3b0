use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An addition of funds to a subsidy's balance, tied to a sales contract
/// reference. Only reachable through the v2 admin API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Deposit {
    pub uuid: Uuid,
    pub desired_deposit_quantity: i64,
    pub sales_contract_reference_id: Option<String>,
    pub sales_contract_reference_provider: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub idempotency_key: Option<String>,
}

/// Payload for creating a deposit through the v2 admin endpoint.
///
/// `metadata` is always sent, null when absent. A reused idempotency key is
/// rejected server-side with a 422, giving at-most-once creation.
#[derive(Serialize, Debug, Clone)]
pub struct CreateDepositRequest {
    pub desired_deposit_quantity: i64,
    pub sales_contract_reference_id: String,
    pub sales_contract_reference_provider: String,
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl CreateDepositRequest {
    pub fn new(
        desired_deposit_quantity: i64,
        sales_contract_reference_id: &str,
        sales_contract_reference_provider: &str,
    ) -> Self {
        Self {
            desired_deposit_quantity,
            sales_contract_reference_id: sales_contract_reference_id.to_string(),
            sales_contract_reference_provider: sales_contract_reference_provider.to_string(),
            metadata: None,
            idempotency_key: None,
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
}
