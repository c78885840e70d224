pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid frame range: {message}")]
	InvalidRange { message: String },
	#[error("Frame source unavailable: {message}")]
	SourceUnavailable { message: String },
	#[error("No active search for user {user_id}.")]
	NoActiveSession { user_id: String },
	#[error("Another request for user {user_id} is still in flight.")]
	ConcurrentModification { user_id: String },
	#[error("Search for user {user_id} reached the limit of {step_limit} answers without settling.")]
	StepLimitExceeded { user_id: String, step_limit: u32 },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid config: {message}")]
	InvalidConfig { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<liftoff_storage::Error> for Error {
	fn from(err: liftoff_storage::Error) -> Self {
		match err {
			liftoff_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			liftoff_storage::Error::Backend(message) => Self::Storage { message },
		}
	}
}

impl From<liftoff_providers::Error> for Error {
	fn from(err: liftoff_providers::Error) -> Self {
		match err {
			liftoff_providers::Error::InvalidConfig { message } => Self::InvalidConfig { message },
			other => Self::SourceUnavailable { message: other.to_string() },
		}
	}
}
