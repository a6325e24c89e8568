//! HTTP client for submitting queries and tasks.

mod druid;
pub mod response;
pub mod transport;

pub use druid::DruidClient;
pub use response::{QueryResponse, TaskState, TaskStatus};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
