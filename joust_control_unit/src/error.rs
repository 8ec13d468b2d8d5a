//! Framework error types.
//!
//! A service reports a catastrophic internal condition by returning a
//! [`ServiceFault`] from `init` or `run`. The dispatcher wraps it into a
//! [`FrameworkError`] naming the service and stops the current drain; the
//! cycle runner is the top-level handler that logs it and halts.

use joust_common::event::ServiceId;
use thiserror::Error;

/// Fault raised by a service's `init` or `run`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceFault(pub String);

impl ServiceFault {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Errors surfaced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkError {
    /// A service's `run` returned a fault.
    #[error("internal fault in {} service: {detail}", .service.name())]
    InternalFault { service: ServiceId, detail: String },

    /// Two services registered under the same id.
    #[error("service {} registered twice", .0.name())]
    DuplicateService(ServiceId),

    /// A service's `init` returned a fault.
    #[error("{} service failed to initialize: {detail}", .service.name())]
    InitFailed { service: ServiceId, detail: String },
}

impl FrameworkError {
    /// Service that raised the error.
    pub fn service(&self) -> ServiceId {
        match self {
            Self::InternalFault { service, .. } | Self::InitFailed { service, .. } => *service,
            Self::DuplicateService(service) => *service,
        }
    }
}
