use url::Url;

use super::common::Query;

/// Extra filters for the subsidy list endpoint. The required
/// `enterprise_customer_uuid` filter is supplied by the client method.
#[derive(Default, Clone)]
pub struct SubsidyListQuery {
    pub extra: Vec<(String, String)>,
}

impl SubsidyListQuery {
    /// Adds an arbitrary query parameter, passed through verbatim.
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}

impl Query for SubsidyListQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.extra.iter() {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }
}
