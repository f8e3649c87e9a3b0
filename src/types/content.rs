use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enterprise-scoped content metadata from the subsidy service, e.g.
///
/// ```json
/// {
///     "content_uuid": "484ad134-8004-43b3-ad56-b57c83e4ba24",
///     "content_key": "edX+DemoX",
///     "source": "edX",
///     "content_price": "149.00"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContentMetadata {
    pub content_uuid: Uuid,
    pub content_key: String,
    pub source: Option<String>,
    pub content_price: Option<String>,
}
