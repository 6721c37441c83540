use upbit_api_client::auth::Credentials;
use upbit_api_client::rest::UpbitRestClient;

fn live_tests_enabled() -> bool {
    std::env::var("UPBIT_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_quotation_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let client = UpbitRestClient::new();
    let markets = client.get_markets(false).await?;
    assert!(markets.iter().any(|m| m.market == "KRW-BTC"));

    let tickers = client.get_ticker(&["KRW-BTC"]).await?;
    assert_eq!(tickers[0].market, "KRW-BTC");

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_exchange_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let (Ok(access_key), Ok(secret_key)) = (
        std::env::var("UPBIT_ACCESS_KEY"),
        std::env::var("UPBIT_SECRET_KEY"),
    ) else {
        return Ok(());
    };
    let credentials = Credentials::new(access_key, secret_key);
    let client = UpbitRestClient::builder().credentials(credentials).build();

    let _accounts = client.get_accounts().await?;
    let keys = client.get_api_keys().await?;
    assert!(!keys.is_empty());

    Ok(())
}
