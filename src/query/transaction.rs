use url::Url;
use uuid::Uuid;

use super::common::Query;

/// Filters for the transaction list endpoints.
#[derive(Clone)]
pub struct TransactionListQuery {
    /// Ask the service to include aggregate figures alongside the results.
    /// Defaults to true; omitted from the query when false.
    pub include_aggregates: bool,
    pub lms_user_id: Option<i64>,
    pub content_key: Option<String>,
    pub subsidy_access_policy_uuid: Option<Uuid>,
    /// Explicit state filter. Only honored by the v2 admin listing, which
    /// drops unrecognized state names before the request is sent.
    pub transaction_states: Option<Vec<String>>,
    pub extra: Vec<(String, String)>,
}

impl Default for TransactionListQuery {
    fn default() -> Self {
        Self {
            include_aggregates: true,
            lms_user_id: None,
            content_key: None,
            subsidy_access_policy_uuid: None,
            transaction_states: None,
            extra: Vec::new(),
        }
    }
}

impl TransactionListQuery {
    pub fn without_aggregates(mut self) -> Self {
        self.include_aggregates = false;
        self
    }

    pub fn with_lms_user_id(mut self, lms_user_id: i64) -> Self {
        self.lms_user_id = Some(lms_user_id);
        self
    }

    pub fn with_content_key(mut self, content_key: &str) -> Self {
        self.content_key = Some(content_key.to_string());
        self
    }

    pub fn with_subsidy_access_policy_uuid(mut self, subsidy_access_policy_uuid: Uuid) -> Self {
        self.subsidy_access_policy_uuid = Some(subsidy_access_policy_uuid);
        self
    }

    pub fn with_transaction_state(mut self, state: &str) -> Self {
        self.transaction_states
            .get_or_insert_with(Vec::new)
            .push(state.to_string());
        self
    }

    pub fn with_transaction_states(mut self, states: &[String]) -> Self {
        self.transaction_states
            .get_or_insert_with(Vec::new)
            .extend_from_slice(states);
        self
    }

    /// Adds an arbitrary query parameter, passed through verbatim.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}

impl Query for TransactionListQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if self.include_aggregates {
            url.query_pairs_mut()
                .append_pair("include_aggregates", "true");
        }
        if let Some(lms_user_id) = self.lms_user_id {
            url.query_pairs_mut()
                .append_pair("lms_user_id", &lms_user_id.to_string());
        }
        if let Some(content_key) = &self.content_key {
            url.query_pairs_mut()
                .append_pair("content_key", content_key.as_str());
        }
        if let Some(policy_uuid) = &self.subsidy_access_policy_uuid {
            url.query_pairs_mut()
                .append_pair("subsidy_access_policy_uuid", &policy_uuid.to_string());
        }
        for (key, value) in self.extra.iter() {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }
}
