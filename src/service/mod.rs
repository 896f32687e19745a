//! Business operations over the record store.

pub mod error;
pub mod mail_items;
pub mod seed;

pub use error::ServiceError;
pub use mail_items::MailItemService;
pub use seed::{SeedPolicy, TestDataInitializer};
