//! PDF receipt rendering

use crate::constants::DEFAULT_LOCATION;
use crate::error::{NotifyError, Result};
use crate::services::dates::format_datetime;
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{self, FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Document, Element as _, SimplePageDecorator};
use log::debug;
use notify_types::{Booking, UserProfile};
use std::path::Path;

/// Receipt rendering capability. Absence degrades the confirmation email
/// to one without an attachment; it never blocks the send.
pub trait ReceiptRender: Send + Sync {
    /// Render a one-page PDF receipt for the booking. `Ok(None)` means
    /// rendering is unavailable.
    fn render(&self, booking: &Booking, profile: Option<&UserProfile>)
        -> Result<Option<Vec<u8>>>;
}

/// Null renderer selected at startup when no font family could be loaded
pub struct NoopReceiptRenderer;

impl ReceiptRender for NoopReceiptRenderer {
    fn render(
        &self,
        _booking: &Booking,
        _profile: Option<&UserProfile>,
    ) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

pub struct PdfReceiptRenderer {
    fonts: FontFamily<FontData>,
}

impl PdfReceiptRenderer {
    /// Load the font family receipts are typeset with. Fails when the
    /// directory does not hold the regular/bold/italic TTF variants.
    pub fn from_fonts_dir<P: AsRef<Path>>(dir: P, font_name: &str) -> Result<Self> {
        let fonts = fonts::from_files(dir.as_ref(), font_name, None).map_err(|e| {
            NotifyError::Render(format!(
                "Failed to load font family '{}' from {}: {}",
                font_name,
                dir.as_ref().display(),
                e
            ))
        })?;

        Ok(Self { fonts })
    }
}

impl ReceiptRender for PdfReceiptRenderer {
    fn render(&self, booking: &Booking, profile: Option<&UserProfile>)
        -> Result<Option<Vec<u8>>> {
        let mut doc = Document::new(self.fonts.clone());
        doc.set_title("Booking Confirmation");

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            Paragraph::new("Booking Confirmation")
                .styled(Style::new().bold().with_font_size(16)),
        );
        doc.push(Break::new(1.0));

        for line in summary_lines(booking, profile) {
            doc.push(Paragraph::new(line).styled(Style::new().with_font_size(11)));
        }

        doc.push(Break::new(1.5));
        doc.push(
            Paragraph::new(
                "Thank you for choosing Infinity8. Please present this confirmation upon arrival.",
            )
            .styled(Style::new().with_font_size(10)),
        );

        let mut bytes = Vec::new();
        doc.render(&mut bytes)
            .map_err(|e| NotifyError::Render(format!("PDF generation failed: {}", e)))?;

        debug!("Rendered receipt for booking {}, {} bytes", booking.id, bytes.len());
        Ok(Some(bytes))
    }
}

/// Labeled lines for the receipt summary block. Lines whose value is
/// empty are dropped.
pub fn summary_lines(booking: &Booking, profile: Option<&UserProfile>) -> Vec<String> {
    let space = booking.space.clone().unwrap_or_default();

    let email = profile
        .and_then(|p| p.email.as_deref())
        .unwrap_or("")
        .to_string();
    let full_name = profile.and_then(|p| p.full_name.as_deref()).unwrap_or("");
    let guest = if !full_name.is_empty() {
        full_name.to_string()
    } else if !email.is_empty() {
        email.clone()
    } else {
        "Guest".to_string()
    };

    let location = space
        .location
        .filter(|location| !location.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let status = capitalize(booking.status.as_deref().unwrap_or(""));
    let status = if status.is_empty() {
        "Confirmed".to_string()
    } else {
        status
    };

    let fields = vec![
        ("Booking ID", booking.id.clone()),
        ("Guest", guest),
        ("Email", email),
        ("Space", space.name.unwrap_or_default()),
        ("Location", location),
        ("Date", format_datetime(&booking.start_time)),
        ("End", format_datetime(&booking.end_time)),
        (
            "Attendees",
            booking
                .attendees_count
                .map(|count| count.to_string())
                .unwrap_or_default(),
        ),
        ("Total Paid", booking.formatted_amount()),
        ("Status", status),
    ];

    fields
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_types::Space;

    fn booking() -> Booking {
        Booking {
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
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            email: Some("a@x.com".to_string()),
            full_name: Some("Ann".to_string()),
        }
    }

    #[test]
    fn test_summary_lines_full_booking() {
        let profile = profile();
        let lines = summary_lines(&booking(), Some(&profile));

        assert_eq!(
            lines,
            vec![
                "Booking ID: B1",
                "Guest: Ann",
                "Email: a@x.com",
                "Space: Sky Loft",
                "Location: KL",
                "Date: January 01, 2024 10:00 AM",
                "End: January 01, 2024 12:00 PM",
                "Attendees: 4",
                "Total Paid: RM150.50",
                "Status: Confirmed",
            ]
        );
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let mut booking = booking();
        booking.space = None;
        booking.attendees_count = None;
        booking.start_time = String::new();
        booking.end_time = String::new();

        let lines = summary_lines(&booking, None);

        assert_eq!(
            lines,
            vec![
                "Booking ID: B1",
                "Guest: Guest",
                "Location: Kuala Lumpur",
                "Total Paid: RM150.50",
                "Status: Confirmed",
            ]
        );
    }

    #[test]
    fn test_guest_falls_back_to_email() {
        let profile = UserProfile {
            email: Some("a@x.com".to_string()),
            full_name: None,
        };

        let lines = summary_lines(&booking(), Some(&profile));

        assert!(lines.contains(&"Guest: a@x.com".to_string()));
    }

    #[test]
    fn test_status_is_capitalized() {
        let mut booking = booking();
        booking.status = Some("PAID".to_string());

        let lines = summary_lines(&booking, None);

        assert!(lines.contains(&"Status: Paid".to_string()));
    }

    #[test]
    fn test_noop_renderer_returns_none() {
        let rendered = NoopReceiptRenderer.render(&booking(), None).unwrap();
        assert!(rendered.is_none());
    }

    #[test]
    fn test_missing_fonts_dir_is_an_error() {
        let result = PdfReceiptRenderer::from_fonts_dir("/nonexistent/fonts", "LiberationSans");
        assert!(matches!(result, Err(NotifyError::Render(_))));
    }
}
