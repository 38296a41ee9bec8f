pub mod id;

pub use id::{AuditLogId, CompanyId, UserId};
