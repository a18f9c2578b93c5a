//! Client modules for external services

pub mod resend;
pub mod supabase;

// Re-export all client types
pub use resend::{EmailDispatch, ResendClient};
pub use supabase::{BookingStore, SupabaseClient};
