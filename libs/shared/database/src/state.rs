use std::sync::Arc;

use shared_config::AppConfig;

use crate::supabase::SupabaseClient;

/// Router state shared by every cell: configuration plus one pooled
/// PostgREST client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<SupabaseClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let db = Arc::new(SupabaseClient::new(&config));
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
