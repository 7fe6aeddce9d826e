pub mod auth;
pub mod client;
pub mod error;
pub mod table;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, SheetsAuth};
pub use client::SheetsClient;
pub use error::SheetsError;
pub use table::{SheetTable, ORDER_NUMBER_COLUMN};
