//! Supabase (PostgREST) client for booking, payment, and profile rows

use crate::config::SupabaseConfig;
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use log::debug;
use notify_types::{Booking, Payment, Space, UserProfile};
use reqwest::Client as HttpClient;
use serde_json::{json, Value};

/// Store operations the confirmation workflow depends on. Lookups return
/// `None` for missing rows instead of failing.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_booking_by_id(&self, booking_id: &str) -> Result<Option<Booking>>;

    async fn get_payment_by_booking(&self, booking_id: &str) -> Result<Option<Payment>>;

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn update_payment_status(
        &self,
        booking_id: &str,
        payment_status: &str,
        transaction_id: Option<&str>,
        receipt_url: &str,
    ) -> Result<()>;
}

pub struct SupabaseClient {
    config: SupabaseConfig,
    http_client: HttpClient,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    /// Fetch at most one row from `table` matching the given filter
    async fn fetch_single(
        &self,
        table: &str,
        select: &str,
        filter: (&str, &str),
    ) -> Result<Option<Value>> {
        let response = self
            .http_client
            .get(self.rest_url(table))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .query(&[("select", select), filter, ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::ServiceUnavailable(format!(
                "Supabase returned {} for {}: {}",
                status, table, error_text
            )));
        }

        let rows: Value = response.json().await?;
        Ok(rows.as_array().and_then(|rows| rows.first()).cloned())
    }

    /// Check that the REST endpoint is reachable with the configured key
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/rest/v1/", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false), // Connection failed
        }
    }
}

#[async_trait]
impl BookingStore for SupabaseClient {
    async fn get_booking_by_id(&self, booking_id: &str) -> Result<Option<Booking>> {
        let filter = format!("eq.{}", booking_id);
        let row = self
            .fetch_single("bookings", "*,spaces(name,location)", ("id", &filter))
            .await?;

        Ok(row.as_ref().map(parse_booking))
    }

    async fn get_payment_by_booking(&self, booking_id: &str) -> Result<Option<Payment>> {
        let filter = format!("eq.{}", booking_id);
        let row = self
            .fetch_single("payments", "*", ("booking_id", &filter))
            .await?;

        Ok(row.as_ref().map(parse_payment))
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let filter = format!("eq.{}", user_id);
        let row = self
            .fetch_single("profiles", "email,full_name", ("id", &filter))
            .await?;

        Ok(row.as_ref().map(parse_profile))
    }

    async fn update_payment_status(
        &self,
        booking_id: &str,
        payment_status: &str,
        transaction_id: Option<&str>,
        receipt_url: &str,
    ) -> Result<()> {
        let filter = format!("eq.{}", booking_id);

        debug!(
            "Updating payment for booking {} (status: {})",
            booking_id, payment_status
        );

        let response = self
            .http_client
            .patch(self.rest_url("payments"))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .header("Prefer", "return=minimal")
            .query(&[("booking_id", filter.as_str())])
            .json(&json!({
                "payment_status": payment_status,
                "transaction_id": transaction_id,
                "receipt_url": receipt_url,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::ServiceUnavailable(format!(
                "Supabase payment update returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

fn parse_booking(row: &Value) -> Booking {
    Booking {
        id: row["id"].as_str().unwrap_or("").to_string(),
        user_id: row["user_id"].as_str().unwrap_or("").to_string(),
        space: row
            .get("spaces")
            .filter(|space| space.is_object())
            .map(parse_space),
        start_time: row["start_time"].as_str().unwrap_or("").to_string(),
        end_time: row["end_time"].as_str().unwrap_or("").to_string(),
        attendees_count: row["attendees_count"].as_i64(),
        total_amount: parse_amount(&row["total_amount"]),
        status: row["status"].as_str().map(|s| s.to_string()),
    }
}

fn parse_space(value: &Value) -> Space {
    Space {
        name: value["name"].as_str().map(|s| s.to_string()),
        location: value["location"].as_str().map(|s| s.to_string()),
    }
}

fn parse_payment(row: &Value) -> Payment {
    Payment {
        booking_id: row["booking_id"].as_str().unwrap_or("").to_string(),
        payment_status: row["payment_status"].as_str().map(|s| s.to_string()),
        transaction_id: row["transaction_id"].as_str().map(|s| s.to_string()),
        receipt_url: row["receipt_url"].as_str().map(|s| s.to_string()),
    }
}

fn parse_profile(row: &Value) -> UserProfile {
    UserProfile {
        email: row["email"].as_str().map(|s| s.to_string()),
        full_name: row["full_name"].as_str().map(|s| s.to_string()),
    }
}

/// Amounts are numeric in current rows; rows imported from the old system
/// carry them as strings.
fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_booking_with_joined_space() {
        let row = json!({
            "id": "B1",
            "user_id": "U1",
            "spaces": {"name": "Sky Loft", "location": "KL"},
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T12:00:00Z",
            "attendees_count": 4,
            "total_amount": 150.5,
            "status": "confirmed"
        });

        let booking = parse_booking(&row);

        assert_eq!(booking.id, "B1");
        assert_eq!(booking.user_id, "U1");
        let space = booking.space.expect("space should be parsed");
        assert_eq!(space.name.as_deref(), Some("Sky Loft"));
        assert_eq!(space.location.as_deref(), Some("KL"));
        assert_eq!(booking.attendees_count, Some(4));
        assert_eq!(booking.total_amount, Some(150.5));
        assert_eq!(booking.status.as_deref(), Some("confirmed"));
    }

    #[test]
    fn test_parse_booking_without_space() {
        let row = json!({
            "id": "B2",
            "user_id": "U2",
            "spaces": null,
            "start_time": "2024-02-01T09:00:00Z",
            "end_time": "2024-02-01T11:00:00Z"
        });

        let booking = parse_booking(&row);

        assert!(booking.space.is_none());
        assert!(booking.attendees_count.is_none());
        assert!(booking.total_amount.is_none());
    }

    #[test]
    fn test_parse_amount_coercion() {
        assert_eq!(parse_amount(&json!(150.5)), Some(150.5));
        assert_eq!(parse_amount(&json!(0)), Some(0.0));
        assert_eq!(parse_amount(&json!("150.5")), Some(150.5));
        assert_eq!(parse_amount(&json!("0")), Some(0.0));
        assert_eq!(parse_amount(&json!(" 42 ")), Some(42.0));
        assert_eq!(parse_amount(&json!("not a number")), None);
        assert_eq!(parse_amount(&json!(null)), None);
    }

    #[test]
    fn test_parse_payment_with_missing_fields() {
        let row = json!({"booking_id": "B1"});

        let payment = parse_payment(&row);

        assert_eq!(payment.booking_id, "B1");
        assert!(payment.payment_status.is_none());
        assert!(payment.transaction_id.is_none());
        assert!(payment.receipt_url.is_none());
    }

    #[test]
    fn test_parse_profile() {
        let row = json!({"email": "a@x.com", "full_name": "Ann"});

        let profile = parse_profile(&row);

        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(profile.full_name.as_deref(), Some("Ann"));
    }
}
