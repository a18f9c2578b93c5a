/// Workflow configuration constants

/// Marker stored in a payment's `receipt_url` once the confirmation email
/// for that booking has been delivered. A payment carrying this value is
/// never mailed again.
pub const RECEIPT_EMAIL_SENT: &str = "email_sent";

/// Location printed when a space has none on record
pub const DEFAULT_LOCATION: &str = "Kuala Lumpur";
