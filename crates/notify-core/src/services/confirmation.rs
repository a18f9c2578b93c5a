//! Booking confirmation workflow
//!
//! Sends the paid-booking confirmation email with its PDF receipt.
//! Every collaborator is an injected capability so the workflow can be
//! exercised without a store, a provider, or a PDF library.

use crate::clients::{BookingStore, EmailDispatch};
use crate::constants::{DEFAULT_LOCATION, RECEIPT_EMAIL_SENT};
use crate::error::{NotifyError, Result};
use crate::services::dates::format_datetime;
use crate::services::receipt::ReceiptRender;
use notify_types::{Booking, EmailMessage, RenderedReceipt, UserProfile};
use std::sync::Arc;

/// How one invocation of the workflow ended. Every variant other than
/// `Sent` is a soft no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    AlreadySent,
    EmailNotConfigured,
    BookingNotFound,
    NoRecipient,
}

pub struct ConfirmationSender {
    store: Arc<dyn BookingStore>,
    email: Arc<dyn EmailDispatch>,
    renderer: Arc<dyn ReceiptRender>,
    sender_address: String,
}

impl ConfirmationSender {
    pub fn new(
        store: Arc<dyn BookingStore>,
        email: Arc<dyn EmailDispatch>,
        renderer: Arc<dyn ReceiptRender>,
        sender_address: String,
    ) -> Self {
        Self {
            store,
            email,
            renderer,
            sender_address,
        }
    }

    /// Send the confirmation email for a paid booking.
    ///
    /// Never returns an error: every failure path ends in a log line and a
    /// silent return, so callers may invoke this unconditionally after a
    /// payment is confirmed. At most one email goes out per booking.
    pub async fn send_booking_confirmation(&self, booking_id: &str, fallback_email: Option<&str>) {
        match self.try_send(booking_id, fallback_email).await {
            Ok(SendOutcome::Sent) => {
                log::info!("Booking confirmation email sent for {}", booking_id);
            }
            Ok(SendOutcome::AlreadySent) => {
                log::debug!("Confirmation for booking {} already sent; skipping", booking_id);
            }
            Ok(SendOutcome::EmailNotConfigured) => {
                log::info!(
                    "Email provider not configured; skipping confirmation for {}",
                    booking_id
                );
            }
            Ok(SendOutcome::BookingNotFound) => {
                log::warn!("Booking {} not found; cannot send confirmation email", booking_id);
            }
            Ok(SendOutcome::NoRecipient) => {
                log::warn!("No email available for booking {}; skipping send", booking_id);
            }
            Err(e) => {
                log::error!("Failed to send booking confirmation for {}: {}", booking_id, e);
            }
        }
    }

    async fn try_send(
        &self,
        booking_id: &str,
        fallback_email: Option<&str>,
    ) -> Result<SendOutcome> {
        // Step 1: provider credentials gate
        if !self.email.is_configured() {
            return Ok(SendOutcome::EmailNotConfigured);
        }

        // Step 2: load the booking
        let booking = match self.store.get_booking_by_id(booking_id).await? {
            Some(booking) => booking,
            None => return Ok(SendOutcome::BookingNotFound),
        };

        // Step 3: skip bookings whose confirmation already went out
        let payment = self.store.get_payment_by_booking(booking_id).await?;
        if payment.as_ref().and_then(|p| p.receipt_url.as_deref()) == Some(RECEIPT_EMAIL_SENT) {
            return Ok(SendOutcome::AlreadySent);
        }

        // Step 4: resolve the recipient
        let profile = self.store.get_user_profile(&booking.user_id).await?;
        let recipient = profile
            .as_ref()
            .and_then(|p| p.email.as_deref())
            .filter(|email| !email.is_empty())
            .or(fallback_email)
            .map(|email| email.to_string());
        let recipient = match recipient {
            Some(recipient) => recipient,
            None => return Ok(SendOutcome::NoRecipient),
        };

        // Steps 5-7: build content, render the receipt, dispatch
        let message = self.build_message(&booking, profile.as_ref(), &recipient);
        self.dispatch(booking, profile, message).await?;

        // Step 8: mark the payment so the confirmation is not sent twice.
        // A failure here is only a warning; the email is already out.
        if let Some(payment) = payment {
            let payment_status = payment.payment_status.as_deref().unwrap_or("completed");
            if let Err(e) = self
                .store
                .update_payment_status(
                    booking_id,
                    payment_status,
                    payment.transaction_id.as_deref(),
                    RECEIPT_EMAIL_SENT,
                )
                .await
            {
                log::warn!(
                    "Could not mark confirmation email as sent for {}: {}",
                    booking_id,
                    e
                );
            }
        }

        Ok(SendOutcome::Sent)
    }

    /// Render the receipt and perform the provider call on the blocking
    /// pool, so the synchronous network call cannot stall other tasks.
    async fn dispatch(
        &self,
        booking: Booking,
        profile: Option<UserProfile>,
        mut message: EmailMessage,
    ) -> Result<()> {
        let renderer = Arc::clone(&self.renderer);
        let email = Arc::clone(&self.email);

        tokio::task::spawn_blocking(move || {
            message.attachment = render_attachment(renderer.as_ref(), &booking, profile.as_ref());
            email.send(&message)
        })
        .await
        .map_err(|e| NotifyError::Workflow(format!("Email dispatch task failed: {}", e)))?
    }

    fn build_message(
        &self,
        booking: &Booking,
        profile: Option<&UserProfile>,
        recipient: &str,
    ) -> EmailMessage {
        let space = booking.space.clone().unwrap_or_default();
        let space_name = space
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Your space".to_string());
        let location = space
            .location
            .filter(|location| !location.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        let greeting_name = profile
            .and_then(|p| p.full_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("there");
        let date_label = format_datetime(&booking.start_time);

        let subject = format!("Booking confirmed: {} on {}", space_name, date_label);

        let body_lines = [
            format!("Hi {},", greeting_name),
            String::new(),
            "Your booking is confirmed. Details:".to_string(),
            format!("- Space: {}", space.name.unwrap_or_default()),
            format!("- Location: {}", location),
            format!("- Starts: {}", date_label),
            format!("- Ends: {}", format_datetime(&booking.end_time)),
            format!(
                "- Attendees: {}",
                booking
                    .attendees_count
                    .map(|count| count.to_string())
                    .unwrap_or_default()
            ),
            format!("- Amount: {}", booking.formatted_amount()),
            String::new(),
            "The confirmation PDF is attached. We look forward to hosting you!".to_string(),
            String::new(),
            "-- Infinity8 Team".to_string(),
        ];
        let text = body_lines.join("\n");
        let html = text.lines().collect::<Vec<_>>().join("<br>");

        EmailMessage {
            from: self.sender_address.clone(),
            to: recipient.to_string(),
            subject,
            text,
            html,
            attachment: None,
        }
    }
}

fn render_attachment(
    renderer: &dyn ReceiptRender,
    booking: &Booking,
    profile: Option<&UserProfile>,
) -> Option<RenderedReceipt> {
    match renderer.render(booking, profile) {
        Ok(Some(bytes)) => Some(RenderedReceipt {
            filename: format!("booking-{}.pdf", booking.id),
            bytes,
        }),
        Ok(None) => None,
        Err(e) => {
            log::warn!(
                "Receipt rendering failed for booking {}; sending without attachment: {}",
                booking.id,
                e
            );
            None
        }
    }
}
