//! External service integrations

pub mod accounting;

pub use accounting::{AccountingExporter, ExportReceipt, MockXeroExporter};
