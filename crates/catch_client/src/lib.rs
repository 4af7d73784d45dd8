pub mod ask;
pub mod backend;
pub mod dispatch;
pub mod session;
pub mod wake;

pub use backend::{BackendClient, BackendStatus, HealthProbe};
pub use dispatch::Dispatcher;
pub use session::Session;
