use serde::{Deserialize, Serialize};

/// Pagination envelope returned by the service's list endpoints.
#[derive(Serialize, Deserialize, Debug)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
