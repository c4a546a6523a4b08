use crate::services::visitor_store::VisitorStore;

pub struct AppState {
    pub store: VisitorStore,
    pub success_on_storage_failure: bool,
    pub function_key: Option<String>, // Trigger key, checked only when set
}
