//! Infinity8 notification core
//!
//! Business logic for sending booking-confirmation emails. Contains the
//! backing-store and email-provider clients, PDF receipt rendering, and
//! the confirmation workflow itself.

pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod services;

// Re-export main types for easy access
pub use config::NotifyConfig;
pub use error::{NotifyError, Result};

// Re-export client types and their capability seams
pub use clients::{BookingStore, EmailDispatch, ResendClient, SupabaseClient};

// Re-export service types
pub use services::{
    ConfirmationSender, NoopReceiptRenderer, PdfReceiptRenderer, ReceiptRender, SendOutcome,
};
