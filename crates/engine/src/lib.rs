//! Workflow orchestration for the invoice approval pipeline.
//!
//! Consumes the store seams from `apflow-store` and the pure domain logic
//! from `apflow-core`; consumed by the HTTP layer and by administrative
//! tooling alike.

pub mod audit;
pub mod hierarchy;
mod notify;
pub mod resolver;
pub mod workflow;

pub use audit::AuditRecorder;
pub use hierarchy::HierarchyAdmin;
pub use resolver::{HierarchyResolver, Resolution, ResolutionStrategy};
pub use workflow::{ActionOutcome, ActionRequest, RoutingOutcome, WorkflowEngine};
