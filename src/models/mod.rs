//! Data models for the library server

pub mod audit;
pub mod book;
pub mod copy;
pub mod mail;
pub mod reader;
pub mod rental;
pub mod user;

// Re-export commonly used types
pub use audit::{AuditEvent, NewRentalAudit, RentalAudit};
pub use book::Book;
pub use copy::{Copy, CopyStatus};
pub use reader::Reader;
pub use rental::Rental;
pub use user::{Principal, User, UserClaims};
