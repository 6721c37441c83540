//! Example: Reading account state and handling API errors.
//!
//! Run with: UPBIT_ACCESS_KEY=... UPBIT_SECRET_KEY=... cargo run --example exchange_account

use upbit_api_client::auth::Credentials;
use upbit_api_client::rest::UpbitRestClient;
use upbit_api_client::rest::exchange::{ListOrdersRequest, OrderState};
use upbit_api_client::{ApiError, ErrorKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let (Ok(access_key), Ok(secret_key)) = (
        std::env::var("UPBIT_ACCESS_KEY"),
        std::env::var("UPBIT_SECRET_KEY"),
    ) else {
        println!("Set UPBIT_ACCESS_KEY and UPBIT_SECRET_KEY to run this example.");
        return Ok(());
    };

    let client = UpbitRestClient::builder()
        .credentials(Credentials::new(access_key, secret_key))
        .build();

    println!("=== Balances ===");
    for account in client.get_accounts().await? {
        println!("{}: {} (locked {})", account.currency, account.balance, account.locked);
    }

    println!("\n=== Open Orders ===");
    let request = ListOrdersRequest::for_market("KRW-BTC").state(OrderState::Wait);
    match client.list_orders(&request).await {
        Ok(orders) => {
            for order in orders {
                println!("{} {:?} {:?} @ {:?}", order.uuid, order.side, order.volume, order.price);
            }
        }
        Err(err) => report(&err),
    }

    Ok(())
}

fn report(err: &ApiError) {
    match err.kind {
        ErrorKind::Auth => println!("Check the key's permissions and IP allow list: {err}"),
        ErrorKind::RateLimitExceeded => println!("Rate limited, try again later: {err}"),
        ErrorKind::InvalidRequest(reason) => println!("Rejected ({reason:?}): {err}"),
        _ => println!("Request failed: {err}"),
    }
}
