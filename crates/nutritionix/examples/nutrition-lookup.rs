//! Example: run a natural-language nutrient query and an instant search.
//!
//! Credentials come from `~/.config/nutritionix/config.toml` or the
//! `NUTRITIONIX_APP_ID` / `NUTRITIONIX_APP_KEY` environment variables.
//!
//! ```text
//! NUTRITIONIX_DEBUG=true cargo run --example nutrition-lookup -- "1 cup butter"
//! ```

use nutritionix::{ClientConfig, NaturalRequest, NutritionClient, SearchRequest};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nutritionix=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "1 cup butter".to_string());

    let config = ClientConfig::load_with_env()?;
    let client = match NutritionClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("\nSet NUTRITIONIX_APP_ID and NUTRITIONIX_APP_KEY first!");
            return Err(e.into());
        }
    };

    println!("Natural nutrients for {query:?}...\n");
    let response = client
        .natural_nutrients(&NaturalRequest::new(query.as_str()))
        .await?;
    if !response.is_success() {
        eprintln!("API returned {}: {}", response.status(), response.text());
        return Ok(());
    }

    let nutrients: serde_json::Value = response.json()?;
    for food in nutrients["foods"].as_array().into_iter().flatten() {
        println!(
            "  • {} ({} {}): {} kcal",
            food["food_name"].as_str().unwrap_or("?"),
            food["serving_qty"],
            food["serving_unit"].as_str().unwrap_or(""),
            food["nf_calories"]
        );
    }

    println!("\nInstant search for {query:?}...\n");
    let response = client
        .search(&SearchRequest::new(query.as_str()).with_param("detailed", true))
        .await?;
    let results: serde_json::Value = response.json()?;
    for food in results["common"].as_array().into_iter().flatten().take(5) {
        println!("  • {}", food["food_name"].as_str().unwrap_or("?"));
    }

    Ok(())
}
