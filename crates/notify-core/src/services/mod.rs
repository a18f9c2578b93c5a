//! Service modules for business logic

pub mod confirmation;
pub mod dates;
pub mod receipt;

// Re-export service types
pub use confirmation::{ConfirmationSender, SendOutcome};
pub use receipt::{NoopReceiptRenderer, PdfReceiptRenderer, ReceiptRender};
