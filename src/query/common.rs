//! Shared query infrastructure: the [`Query`] trait.

use url::Url;

/// Trait implemented by all query builders.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the
    /// modified URL. Absent optional values are omitted entirely, never
    /// sent as empty parameters.
    fn add_to_url(&self, url: &Url) -> Url;
}
