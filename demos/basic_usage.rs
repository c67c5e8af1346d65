//! Basic usage of the ActiveCampaign client
//!
//! This demo shows:
//! - Building a validated configuration
//! - Reading contacts and deals
//! - Syncing a contact by email
//! - Telling error kinds apart
//!
//! Required environment variables:
//! - ACTIVECAMPAIGN_API_TOKEN
//! - ACTIVECAMPAIGN_URL (e.g. https://myaccount.api-us1.com)
//!
//! Run with: cargo run --example basic_usage

use std::time::Duration;

use activecampaign_api::{ActiveCampaignClient, Configuration, ErrorKind};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=activecampaign_client=debug to see each request
    tracing_subscriber::fmt::init();

    println!("=== ActiveCampaign Client Demo ===\n");

    let token = std::env::var("ACTIVECAMPAIGN_API_TOKEN")?;
    let url = std::env::var("ACTIVECAMPAIGN_URL")?;

    let config = Configuration::builder(token, url)
        .with_timeout(Duration::from_secs(20))
        .with_max_retries(2)
        .with_retry_delay(Duration::from_millis(500))
        .build()?;
    println!("✓ Configuration: {:?}\n", config);

    let client = ActiveCampaignClient::new(config)?;

    list_contacts(&client).await?;
    sync_contact(&client).await?;
    show_error_kinds(&client).await;

    println!("\n✓ Demo completed!");
    Ok(())
}

async fn list_contacts(client: &ActiveCampaignClient) -> Result<(), Box<dyn std::error::Error>> {
    println!("Contacts");
    println!("--------");

    let contacts = client.contacts().list(&[("limit", "5")]).await?;
    for contact in contacts["contacts"].as_array().into_iter().flatten() {
        println!("  {} <{}>", contact["id"], contact["email"]);
    }
    println!("  total: {}\n", contacts["meta"]["total"]);

    Ok(())
}

async fn sync_contact(client: &ActiveCampaignClient) -> Result<(), Box<dyn std::error::Error>> {
    println!("Sync");
    println!("----");

    let result = client
        .contacts()
        .sync(&json!({"contact": {"email": "demo@example.com", "firstName": "Demo"}}))
        .await?;
    println!("  synced contact id {}\n", result["contact"]["id"]);

    Ok(())
}

async fn show_error_kinds(client: &ActiveCampaignClient) {
    println!("Error kinds");
    println!("-----------");

    match client.deals().get(u64::MAX).await {
        Ok(deal) => println!("  unexpected deal: {}", deal),
        Err(e) => {
            println!("  ✗ {}", e);
            match &e.kind {
                ErrorKind::NotFound => println!("  not found (status {})", e.status()),
                ErrorKind::Authentication => println!("  check ACTIVECAMPAIGN_API_TOKEN"),
                ErrorKind::RateLimit { retry_after } => {
                    println!("  rate limited, retry after {:?}s", retry_after)
                }
                ErrorKind::Validation { errors } => println!("  invalid: {:?}", errors),
                _ => println!("  context: {:?}", e.context()),
            }
        }
    }
}
