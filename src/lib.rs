//! Async client for the enterprise-subsidy ledger service.
//!
//! Wraps the service's v1 and v2 REST APIs behind typed clients that build
//! URLs from an explicit [`ClientConfig`], authenticate through an OAuth2
//! client-credentials transport, and surface non-2xx responses as
//! [`Error::HttpStatus`] carrying the original status and body. No retries,
//! no caching; resilience is the caller's responsibility.

mod auth;
mod client;
mod config;
mod errors;
mod query;
pub mod types;

pub use self::client::{
    client_for_version, ApiVersion, SubsidyClient, SubsidyClientV2, VersionedClient,
};
pub use self::config::ClientConfig;
pub use self::errors::Error;
pub use self::query::{Query, SubsidyListQuery, TransactionListQuery};
