// Kernel - infrastructure traits and the dependency container

pub mod deps;
#[cfg(test)]
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, WhatsAppAdapter};
pub use traits::{BaseAuditRecorder, BaseNotificationService};
