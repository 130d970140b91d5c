//! Binary to log in to Integrate and print the account's limits, positions
//! and holdings for a quick end-to-end check.
//!
//! # Usage
//!
//! ```sh
//! export API_TOKEN="your-api-token"
//! export API_SECRET="your-api-secret"
//! export TOTP="123456"          # optional, prompted for otherwise
//! export INTEGRATE_LOGGING=1    # optional, log payloads
//! cargo run --bin integrate_check --features cli
//! ```

use integrate_rs::IntegrateClient;
use integrate_rs::config::{self, Credentials};

#[tokio::main]
async fn main() -> integrate_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let creds = Credentials::from_env()?;
    let mut client = IntegrateClient::builder()
        .logging(config::logging_from_env())
        .on_session_expired(|| eprintln!("session expired, run again to log in"))
        .build()?;

    let keys = client
        .login(&creds.api_token, &creds.api_secret, creds.totp.as_deref())
        .await?;
    println!("Logged in: uid={} actid={}", keys.uid, keys.actid);

    let limits = client.get_limits().await?;
    println!("\nLimits:");
    for (name, value) in &limits.fields {
        println!("  {name}: {value}");
    }

    let positions = client.get_positions().await?;
    println!("\nPositions: {}", positions.positions.len());
    for p in &positions.positions {
        println!(
            "  {} {}",
            p.exchange.as_deref().unwrap_or("-"),
            p.tradingsymbol.as_deref().unwrap_or("-")
        );
    }

    let holdings = client.get_holdings().await?;
    println!("\nHoldings: {}", holdings.data.len());
    for h in &holdings.data {
        println!("  {}", h.isin.as_deref().unwrap_or("-"));
    }

    Ok(())
}
