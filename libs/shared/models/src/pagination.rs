use serde::Deserialize;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 500;

/// `?skip=&limit=` query parameters shared by every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl Pagination {
    /// PostgREST `offset`/`limit` pair, with the limit clamped to `MAX_LIMIT`.
    pub fn to_query(&self) -> String {
        format!("offset={}&limit={}", self.skip, self.limit.clamp(1, MAX_LIMIT))
    }
}
