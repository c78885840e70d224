use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Frame source answered {status} for {url}.")]
	Status { status: StatusCode, url: String },
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// Failures worth another attempt: the request never got a usable answer, or the server said
	/// it was overloaded or broken. Client errors and malformed payloads are final.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Reqwest(err) => err.is_timeout() || err.is_connect() || err.is_request(),
			Self::Status { status, .. } =>
				status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
			Self::InvalidConfig { .. } | Self::InvalidResponse { .. } => false,
		}
	}
}
