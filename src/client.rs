//! HTTP clients for the enterprise-subsidy service, v1 and v2.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::{
    auth::OAuth2Transport,
    config::ClientConfig,
    query::{Query, SubsidyListQuery, TransactionListQuery},
    types::{
        ContentMetadata, CreateDepositRequest, CreateTransactionRequest, Deposit, Page, Subsidy,
        Transaction, TransactionList, TransactionState,
    },
    Error,
};

/// API versions this crate can speak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVersion {
    V1 = 1,
    V2 = 2,
}

impl TryFrom<u8> for ApiVersion {
    type Error = Error;

    fn try_from(version: u8) -> Result<Self, Error> {
        match version {
            1 => Ok(ApiVersion::V1),
            2 => Ok(ApiVersion::V2),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }
}

/// Returns a client for the requested API version, or
/// [`Error::UnsupportedVersion`] for anything outside {1, 2}.
pub fn client_for_version(version: u8, config: &ClientConfig) -> Result<VersionedClient, Error> {
    match ApiVersion::try_from(version)? {
        ApiVersion::V1 => Ok(VersionedClient::V1(SubsidyClient::new(config)?)),
        ApiVersion::V2 => Ok(VersionedClient::V2(SubsidyClientV2::new(config)?)),
    }
}

/// Client for the v1 enterprise-subsidy API.
///
/// Each method maps to exactly one remote endpoint and issues exactly one
/// authenticated HTTP call. Non-2xx responses surface as
/// [`Error::HttpStatus`]; this layer never retries.
#[derive(Debug)]
pub struct SubsidyClient {
    base_url: String,
    transport: OAuth2Transport,
}

impl SubsidyClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            base_url: config.enterprise_subsidy_url.trim_end_matches('/').to_string(),
            transport: OAuth2Transport::new(config)?,
        })
    }

    fn api_url(&self, version: &str, path: &str) -> Result<Url, Error> {
        Url::parse(&format!("{}/api/{}/{}", self.base_url, version, path)).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(e)
        })
    }

    fn v1_url(&self, path: &str) -> Result<Url, Error> {
        self.api_url("v1", path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        tracing::debug!("GET {}", url);
        let resp = self.transport.get(url).await?;
        decode_response(resp).await
    }

    async fn post_json<T, B>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!("POST {}", url);
        let resp = self.transport.post_json(url, body).await?;
        decode_response(resp).await
    }

    /// Fetches enterprise-scoped price and source data for a piece of
    /// content, identified by content key or UUID.
    pub async fn get_subsidy_content_data(
        &self,
        enterprise_customer_uuid: &Uuid,
        content_identifier: &str,
    ) -> Result<ContentMetadata, Error> {
        let mut url = self.v1_url(&format!("content-metadata/{}", content_identifier))?;
        url.query_pairs_mut().append_pair(
            "enterprise_customer_uuid",
            &enterprise_customer_uuid.to_string(),
        );
        self.get_json(url).await.map_err(|err| {
            tracing::error!(
                "Failed to fetch content metadata for {} in customer {}",
                content_identifier,
                enterprise_customer_uuid
            );
            err
        })
    }

    /// Lists subsidy records for the given enterprise customer. Returns the
    /// service's pagination envelope.
    pub async fn list_subsidies(
        &self,
        enterprise_customer_uuid: &Uuid,
        query: &SubsidyListQuery,
    ) -> Result<Page<Subsidy>, Error> {
        let url = self.v1_url("subsidies/")?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut().append_pair(
            "enterprise_customer_uuid",
            &enterprise_customer_uuid.to_string(),
        );
        self.get_json(url).await
    }

    /// Fetches a single subsidy by UUID. An unknown UUID surfaces as a 404
    /// [`Error::HttpStatus`].
    pub async fn retrieve_subsidy(&self, subsidy_uuid: &Uuid) -> Result<Subsidy, Error> {
        let url = self.v1_url(&format!("subsidies/{}/", subsidy_uuid))?;
        self.get_json(url).await
    }

    /// Fetches per-learner aggregate figures for a subsidy, optionally
    /// restricted to one access policy.
    pub async fn list_learner_aggregates(
        &self,
        subsidy_uuid: &Uuid,
        subsidy_access_policy_uuid: Option<&Uuid>,
    ) -> Result<serde_json::Value, Error> {
        let mut url = self.v1_url(&format!("subsidies/{}/aggregates-by-learner", subsidy_uuid))?;
        if let Some(policy_uuid) = subsidy_access_policy_uuid {
            url.query_pairs_mut()
                .append_pair("subsidy_access_policy_uuid", &policy_uuid.to_string());
        }
        self.get_json(url).await
    }

    /// Lists transactions in a subsidy. The explicit state filter in `query`
    /// is an admin capability and is ignored at v1.
    pub async fn list_subsidy_transactions(
        &self,
        subsidy_uuid: &Uuid,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, Error> {
        let url = self.v1_url("transactions/")?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut()
            .append_pair("subsidy_uuid", &subsidy_uuid.to_string());
        self.get_json(url).await
    }

    /// Fetches a single transaction by UUID.
    pub async fn retrieve_subsidy_transaction(
        &self,
        transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        let url = self.v1_url(&format!("transactions/{}/", transaction_uuid))?;
        self.get_json(url).await
    }

    /// Creates a transaction. The server decides the initial state.
    /// `requested_price_cents` is an admin capability and is rejected here.
    pub async fn create_subsidy_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, Error> {
        if request.requested_price_cents.is_some() {
            return Err(Error::Unsupported(
                "requested_price_cents requires the v2 admin API",
            ));
        }
        let url = self.v1_url("transactions/")?;
        self.post_json(url, request).await
    }

    /// Reversal is a server-only capability; this client cannot perform it.
    pub async fn reverse_subsidy_transaction(
        &self,
        _subsidy_uuid: &Uuid,
        _transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        Err(Error::Unsupported("transaction reversal"))
    }

    /// Checks whether the given learner may redeem the given content from
    /// the subsidy.
    pub async fn can_redeem(
        &self,
        subsidy_uuid: &Uuid,
        lms_user_id: i64,
        content_key: &str,
    ) -> Result<serde_json::Value, Error> {
        let mut url = self.v1_url(&format!("subsidies/{}/can_redeem/", subsidy_uuid))?;
        url.query_pairs_mut()
            .append_pair("lms_user_id", &lms_user_id.to_string());
        url.query_pairs_mut().append_pair("content_key", content_key);
        self.get_json(url).await
    }
}

/// Client for the v2 enterprise-subsidy API.
///
/// Specializes transaction listing and creation to the admin-scoped
/// endpoints (subsidy UUID in the path, not the query string) and adds
/// deposit creation. Everything else forwards to the v1 surface.
#[derive(Debug)]
pub struct SubsidyClientV2 {
    inner: SubsidyClient,
}

impl SubsidyClientV2 {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            inner: SubsidyClient::new(config)?,
        })
    }

    fn admin_transactions_url(&self, subsidy_uuid: &Uuid) -> Result<Url, Error> {
        self.inner
            .api_url("v2", &format!("subsidies/{}/admin/transactions/", subsidy_uuid))
    }

    pub async fn get_subsidy_content_data(
        &self,
        enterprise_customer_uuid: &Uuid,
        content_identifier: &str,
    ) -> Result<ContentMetadata, Error> {
        self.inner
            .get_subsidy_content_data(enterprise_customer_uuid, content_identifier)
            .await
    }

    pub async fn list_subsidies(
        &self,
        enterprise_customer_uuid: &Uuid,
        query: &SubsidyListQuery,
    ) -> Result<Page<Subsidy>, Error> {
        self.inner.list_subsidies(enterprise_customer_uuid, query).await
    }

    pub async fn retrieve_subsidy(&self, subsidy_uuid: &Uuid) -> Result<Subsidy, Error> {
        self.inner.retrieve_subsidy(subsidy_uuid).await
    }

    pub async fn list_learner_aggregates(
        &self,
        subsidy_uuid: &Uuid,
        subsidy_access_policy_uuid: Option<&Uuid>,
    ) -> Result<serde_json::Value, Error> {
        self.inner
            .list_learner_aggregates(subsidy_uuid, subsidy_access_policy_uuid)
            .await
    }

    /// Lists transactions in a subsidy with admin- or operator-level
    /// permissions. When the caller supplies no explicit state list the
    /// filter defaults to committed, pending, and created; an explicit list
    /// is membership-checked and unrecognized names are dropped silently,
    /// possibly leaving no state filter at all.
    pub async fn list_subsidy_transactions(
        &self,
        subsidy_uuid: &Uuid,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, Error> {
        let url = self.admin_transactions_url(subsidy_uuid)?;
        let mut url = query.add_to_url(&url);
        let states = match &query.transaction_states {
            Some(requested) => TransactionState::filter_valid(requested),
            None => TransactionState::DEFAULT_LIST_FILTER.to_vec(),
        };
        for state in states {
            url.query_pairs_mut().append_pair("state", &state.to_string());
        }
        self.inner.get_json(url).await
    }

    pub async fn retrieve_subsidy_transaction(
        &self,
        transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        self.inner.retrieve_subsidy_transaction(transaction_uuid).await
    }

    /// Creates a transaction in the given subsidy; requires operator-level
    /// permissions. Honors `requested_price_cents` on the request.
    pub async fn create_subsidy_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, Error> {
        let url = self.admin_transactions_url(&request.subsidy_uuid)?;
        self.inner.post_json(url, request).await
    }

    pub async fn reverse_subsidy_transaction(
        &self,
        subsidy_uuid: &Uuid,
        transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        self.inner
            .reverse_subsidy_transaction(subsidy_uuid, transaction_uuid)
            .await
    }

    pub async fn can_redeem(
        &self,
        subsidy_uuid: &Uuid,
        lms_user_id: i64,
        content_key: &str,
    ) -> Result<serde_json::Value, Error> {
        self.inner.can_redeem(subsidy_uuid, lms_user_id, content_key).await
    }

    /// Creates a deposit into the given subsidy. A reused idempotency key is
    /// rejected server-side with a 422, surfaced as [`Error::HttpStatus`].
    pub async fn create_subsidy_deposit(
        &self,
        subsidy_uuid: &Uuid,
        request: &CreateDepositRequest,
    ) -> Result<Deposit, Error> {
        let url = self
            .inner
            .api_url("v2", &format!("subsidies/{}/admin/deposits/", subsidy_uuid))?;
        self.inner.post_json(url, request).await
    }
}

/// A versioned subsidy client, as returned by [`client_for_version`].
///
/// Dispatches the shared surface to whichever concrete client it wraps;
/// operations the wrapped version cannot perform fail immediately with
/// [`Error::Unsupported`].
#[derive(Debug)]
pub enum VersionedClient {
    V1(SubsidyClient),
    V2(SubsidyClientV2),
}

impl VersionedClient {
    pub fn version(&self) -> ApiVersion {
        match self {
            Self::V1(_) => ApiVersion::V1,
            Self::V2(_) => ApiVersion::V2,
        }
    }

    pub async fn get_subsidy_content_data(
        &self,
        enterprise_customer_uuid: &Uuid,
        content_identifier: &str,
    ) -> Result<ContentMetadata, Error> {
        match self {
            Self::V1(client) => {
                client
                    .get_subsidy_content_data(enterprise_customer_uuid, content_identifier)
                    .await
            }
            Self::V2(client) => {
                client
                    .get_subsidy_content_data(enterprise_customer_uuid, content_identifier)
                    .await
            }
        }
    }

    pub async fn list_subsidies(
        &self,
        enterprise_customer_uuid: &Uuid,
        query: &SubsidyListQuery,
    ) -> Result<Page<Subsidy>, Error> {
        match self {
            Self::V1(client) => client.list_subsidies(enterprise_customer_uuid, query).await,
            Self::V2(client) => client.list_subsidies(enterprise_customer_uuid, query).await,
        }
    }

    pub async fn retrieve_subsidy(&self, subsidy_uuid: &Uuid) -> Result<Subsidy, Error> {
        match self {
            Self::V1(client) => client.retrieve_subsidy(subsidy_uuid).await,
            Self::V2(client) => client.retrieve_subsidy(subsidy_uuid).await,
        }
    }

    pub async fn list_learner_aggregates(
        &self,
        subsidy_uuid: &Uuid,
        subsidy_access_policy_uuid: Option<&Uuid>,
    ) -> Result<serde_json::Value, Error> {
        match self {
            Self::V1(client) => {
                client
                    .list_learner_aggregates(subsidy_uuid, subsidy_access_policy_uuid)
                    .await
            }
            Self::V2(client) => {
                client
                    .list_learner_aggregates(subsidy_uuid, subsidy_access_policy_uuid)
                    .await
            }
        }
    }

    pub async fn list_subsidy_transactions(
        &self,
        subsidy_uuid: &Uuid,
        query: &TransactionListQuery,
    ) -> Result<TransactionList, Error> {
        match self {
            Self::V1(client) => client.list_subsidy_transactions(subsidy_uuid, query).await,
            Self::V2(client) => client.list_subsidy_transactions(subsidy_uuid, query).await,
        }
    }

    pub async fn retrieve_subsidy_transaction(
        &self,
        transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        match self {
            Self::V1(client) => client.retrieve_subsidy_transaction(transaction_uuid).await,
            Self::V2(client) => client.retrieve_subsidy_transaction(transaction_uuid).await,
        }
    }

    pub async fn create_subsidy_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<Transaction, Error> {
        match self {
            Self::V1(client) => client.create_subsidy_transaction(request).await,
            Self::V2(client) => client.create_subsidy_transaction(request).await,
        }
    }

    pub async fn reverse_subsidy_transaction(
        &self,
        subsidy_uuid: &Uuid,
        transaction_uuid: &Uuid,
    ) -> Result<Transaction, Error> {
        match self {
            Self::V1(client) => {
                client
                    .reverse_subsidy_transaction(subsidy_uuid, transaction_uuid)
                    .await
            }
            Self::V2(client) => {
                client
                    .reverse_subsidy_transaction(subsidy_uuid, transaction_uuid)
                    .await
            }
        }
    }

    pub async fn can_redeem(
        &self,
        subsidy_uuid: &Uuid,
        lms_user_id: i64,
        content_key: &str,
    ) -> Result<serde_json::Value, Error> {
        match self {
            Self::V1(client) => client.can_redeem(subsidy_uuid, lms_user_id, content_key).await,
            Self::V2(client) => client.can_redeem(subsidy_uuid, lms_user_id, content_key).await,
        }
    }

    /// Deposits exist only in the v2 API.
    pub async fn create_subsidy_deposit(
        &self,
        subsidy_uuid: &Uuid,
        request: &CreateDepositRequest,
    ) -> Result<Deposit, Error> {
        match self {
            Self::V1(_) => Err(Error::Unsupported(
                "create_subsidy_deposit requires the v2 API",
            )),
            Self::V2(client) => client.create_subsidy_deposit(subsidy_uuid, request).await,
        }
    }
}

async fn decode_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::Transport(e)
    })?;

    if !status.is_success() {
        tracing::error!(
            "Request failed with status {}: {}",
            status,
            truncate_body(&body)
        );
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        tracing::error!("Failed to parse response: {} | body: {}", e, truncate_body(&body));
        Error::Decode(e)
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    // back off to a char boundary so multibyte bodies cannot panic the slice
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::truncate_body;

    #[test]
    fn truncate_body_passes_short_bodies_through() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // byte 2000 lands inside the euro sign
        let body = format!("{}€", "a".repeat(1999));
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("...[truncated]"));
        assert_eq!(truncated.len(), 1999 + "...[truncated]".len());
    }

    #[test]
    fn truncate_body_cuts_oversized_ascii_at_limit() {
        let body = "a".repeat(4000);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 2000 + "...[truncated]".len());
    }
}
