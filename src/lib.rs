//! gatepass — client for a cookie-session web backend.
//!
//! DESIGN
//! ======
//! [`config::ClientConfig`] is built once at startup; it resolves the API base
//! URL from the page hostname and an injected override (see [`endpoint`]).
//! The session gate and the login/signup submitters borrow that config and
//! talk to the backend through [`transport::ApiTransport`], driving a
//! [`page::Page`] from the replies.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod forms;
pub mod page;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use forms::{FormFields, FormKind, FormSubmitter, SubmitOutcome};
pub use session::{GateOutcome, SessionGate, SessionStatus};
pub use transport::{ApiResponse, ApiTransport, HttpTransport};
