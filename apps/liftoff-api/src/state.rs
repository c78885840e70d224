use std::sync::Arc;

use liftoff_service::LiftoffService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LiftoffService>,
}
impl AppState {
	pub fn new(config: liftoff_config::Config) -> color_eyre::Result<Self> {
		let service = LiftoffService::new(config)?;

		Ok(Self::with_service(Arc::new(service)))
	}

	pub fn with_service(service: Arc<LiftoffService>) -> Self {
		Self { service }
	}
}
