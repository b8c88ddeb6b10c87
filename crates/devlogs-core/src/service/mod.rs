//! Domain services
//!
//! Request lifecycle, buffering, flushing and operator access, all on top
//! of the repository traits.

pub mod access_policy;
mod lifecycle;
mod log_admin_service;
mod log_buffer;
mod log_store;
mod request_context;
mod unit_of_work;

pub use access_policy::{
    evaluate, AccessPolicy, DecisionHook, EnvironmentSource, ProcessEnvironment,
};
pub use lifecycle::*;
pub use log_admin_service::*;
pub use log_buffer::*;
pub use log_store::*;
pub use request_context::*;
pub use unit_of_work::*;
