// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::metrics_poller::MetricsPoller;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub poller: Arc<MetricsPoller>,
    pub dashboard_service: DashboardService,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(poller: Arc<MetricsPoller>, shutdown: CancellationToken) -> Self {
        let dashboard_service = DashboardService::new(Arc::clone(&poller));
        Self {
            poller,
            dashboard_service,
            shutdown,
        }
    }
}
