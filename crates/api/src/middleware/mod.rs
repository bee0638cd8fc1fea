pub mod actor;
pub mod rbac;
