// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::mapping_service::MappingService;

#[derive(Clone)]
pub struct AppState {
    pub mapping_service: MappingService,
    pub dashboard_service: DashboardService,
}
