//! Domain models shared between the storage, broker, and API crates.

pub mod announcement;
pub mod exchange;

pub use announcement::{AnnouncementFormat, AnnouncementRecord};
pub use exchange::ExchangeKind;
