pub mod lite;
pub mod orchestrator;
pub mod requester;
pub mod selector;

pub use crate::domain::model::{Fix, ProviderId};
pub use crate::domain::ports::{Clock, LocationApi, LocationProvider, SystemClock};
pub use crate::domain::response::Response;
pub use crate::utils::error::Result;
