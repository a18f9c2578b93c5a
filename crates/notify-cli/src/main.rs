//! Booking confirmation trigger binary
//!
//! Replaces the Python notification worker entry point.

use clap::{Arg, Command};
use notify_core::{
    ConfirmationSender, NoopReceiptRenderer, NotifyConfig, PdfReceiptRenderer, ReceiptRender,
    ResendClient, SupabaseClient,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("notify-cli")
        .version("1.0.0")
        .about("Infinity8 booking confirmation sender")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/app/config/notify.json"),
        )
        .arg(
            Arg::new("booking-id")
                .long("booking-id")
                .value_name("ID")
                .help("Send the confirmation email for this booking"),
        )
        .arg(
            Arg::new("fallback-email")
                .long("fallback-email")
                .value_name("ADDR")
                .help("Recipient used when the booking has no profile email"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Verify configuration and collaborator availability")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = if Path::new(config_path).exists() {
        log::info!("Loading configuration from {}", config_path);
        NotifyConfig::from_file(config_path)?
    } else {
        log::info!(
            "Config file {} not found; reading configuration from environment",
            config_path
        );
        NotifyConfig::from_env()?
    };

    let store = Arc::new(SupabaseClient::new(config.supabase.clone()));
    let dispatcher = Arc::new(ResendClient::new(config.email.clone()));

    let pdf_available;
    let renderer: Arc<dyn ReceiptRender> = match PdfReceiptRenderer::from_fonts_dir(
        &config.receipt.fonts_dir,
        &config.receipt.font_name,
    ) {
        Ok(renderer) => {
            pdf_available = true;
            Arc::new(renderer)
        }
        Err(e) => {
            log::warn!("PDF rendering unavailable; confirmations go out without receipts: {}", e);
            pdf_available = false;
            Arc::new(NoopReceiptRenderer)
        }
    };

    if matches.get_flag("check") {
        let store_ok = store.health_check().await.unwrap_or(false);
        println!("supabase: {}", if store_ok { "ok" } else { "unreachable" });
        println!(
            "email: {}",
            if config.email.is_configured() {
                "configured"
            } else {
                "not configured"
            }
        );
        println!(
            "pdf receipts: {}",
            if pdf_available { "available" } else { "unavailable" }
        );
        return Ok(());
    }

    if let Some(booking_id) = matches.get_one::<String>("booking-id") {
        let sender = ConfirmationSender::new(store, dispatcher, renderer, config.email.from.clone());
        let fallback = matches
            .get_one::<String>("fallback-email")
            .map(|addr| addr.as_str());

        sender.send_booking_confirmation(booking_id, fallback).await;
        return Ok(());
    }

    anyhow::bail!("Nothing to do: pass --booking-id or --check")
}
