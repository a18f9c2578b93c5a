//! Shared types for the booking notification service

use serde::{Deserialize, Serialize};

/// Space details joined onto a booking row via the `spaces` relation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// A reservation loaded from the store. Read-only input to the
/// confirmation workflow; timestamps stay in their stored ISO 8601 form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub space: Option<Space>,
    pub start_time: String,
    pub end_time: String,
    pub attendees_count: Option<i64>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
}

impl Booking {
    /// Total amount as a display string, e.g. `RM150.50`. An absent
    /// amount renders as `RM0.00`.
    pub fn formatted_amount(&self) -> String {
        format!("RM{:.2}", self.total_amount.unwrap_or(0.0))
    }
}

/// Payment row for a booking. `receipt_url` usually holds a receipt URL
/// but is overloaded with the already-sent marker once the confirmation
/// email has gone out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub booking_id: String,
    pub payment_status: Option<String>,
    pub transaction_id: Option<String>,
    pub receipt_url: Option<String>,
}

/// User profile holding the preferred recipient address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Rendered PDF receipt. Lives only for the duration of one send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReceipt {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Structured send request handed to the email provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub attachment: Option<RenderedReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_amount() {
        let mut booking = Booking {
            id: "B1".to_string(),
            user_id: "U1".to_string(),
            space: None,
            start_time: String::new(),
            end_time: String::new(),
            attendees_count: None,
            total_amount: Some(150.5),
            status: None,
        };
        assert_eq!(booking.formatted_amount(), "RM150.50");

        booking.total_amount = Some(0.0);
        assert_eq!(booking.formatted_amount(), "RM0.00");

        booking.total_amount = None;
        assert_eq!(booking.formatted_amount(), "RM0.00");
    }

    #[test]
    fn test_booking_round_trip() {
        let booking = Booking {
            id: "B1".to_string(),
            user_id: "U1".to_string(),
            space: Some(Space {
                name: Some("Sky Loft".to_string()),
                location: Some("KL".to_string()),
            }),
            start_time: "2024-01-01T10:00:00Z".to_string(),
            end_time: "2024-01-01T12:00:00Z".to_string(),
            attendees_count: Some(4),
            total_amount: Some(150.5),
            status: Some("confirmed".to_string()),
        };

        let json = serde_json::to_string(&booking).unwrap();
        let parsed: Booking = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, "B1");
        assert_eq!(parsed.space.unwrap().name.as_deref(), Some("Sky Loft"));
        assert_eq!(parsed.total_amount, Some(150.5));
    }
}
