use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use sha2::{Digest, Sha512};
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use upbit_api_client::auth::{Credentials, QueryParams};
use upbit_api_client::error::ErrorKind;
use upbit_api_client::rest::UpbitRestClient;
use upbit_api_client::rest::exchange::{
    ListOrdersRequest, OrderLookup, OrderSide, OrderState, PlaceOrderRequest, TransferLookup,
};

const ACCESS_KEY: &str = "test_access_key";
const SECRET_KEY: &str = "test_secret_key";

#[derive(Debug, Deserialize)]
struct Claims {
    access_key: String,
    nonce: String,
    query_hash: Option<String>,
    query_hash_alg: Option<String>,
}

fn build_client(server: &MockServer) -> UpbitRestClient {
    UpbitRestClient::builder()
        .base_url(server.uri())
        .credentials(Credentials::new(ACCESS_KEY, SECRET_KEY))
        .build()
}

fn decode_claims(request: &Request) -> Claims {
    let header = request
        .headers
        .get("authorization")
        .expect("authorization header")
        .to_str()
        .unwrap();
    let token = header.strip_prefix("Bearer ").expect("bearer scheme");

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    decode::<Claims>(token, &DecodingKey::from_secret(SECRET_KEY.as_bytes()), &validation)
        .expect("token verifies with the secret key")
        .claims
}

fn sha512_hex(input: &str) -> String {
    hex::encode(Sha512::digest(input.as_bytes()))
}

fn order_json(uuid: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "uuid": uuid,
        "side": "bid",
        "ord_type": "limit",
        "price": "50000000",
        "state": state,
        "market": "KRW-BTC",
        "created_at": "2024-01-01T09:00:00+09:00",
        "volume": "0.01",
        "remaining_volume": "0.01",
        "reserved_fee": "250",
        "remaining_fee": "250",
        "paid_fee": "0",
        "locked": "500250",
        "executed_volume": "0",
        "trades_count": 0
    })
}

#[tokio::test]
async fn test_get_accounts_is_signed_without_query_hash() {
    let server = MockServer::start().await;
    let response = serde_json::json!([{
        "currency": "KRW",
        "balance": "1000000.0",
        "locked": "0.0",
        "avg_buy_price": "0",
        "avg_buy_price_modified": false,
        "unit_currency": "KRW"
    }]);

    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let accounts = client.get_accounts().await.unwrap();
    assert_eq!(accounts[0].currency, "KRW");

    let requests = server.received_requests().await.unwrap();
    let claims = decode_claims(&requests[0]);
    assert_eq!(claims.access_key, ACCESS_KEY);
    assert!(!claims.nonce.is_empty());
    assert!(claims.query_hash.is_none());
}

#[tokio::test]
async fn test_get_order_hashes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/order"))
        .and(query_param("uuid", "9ca023a5-851b-4fec-9f0a-48cd83c2eaae"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(order_json("9ca023a5-851b-4fec-9f0a-48cd83c2eaae", "wait")),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let order = client
        .get_order(&OrderLookup::by_uuid("9ca023a5-851b-4fec-9f0a-48cd83c2eaae"))
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Wait);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap().to_string();
    let claims = decode_claims(&requests[0]);
    assert_eq!(claims.query_hash, Some(sha512_hex(&query)));
    assert_eq!(claims.query_hash_alg.as_deref(), Some("SHA512"));
}

#[tokio::test]
async fn test_list_orders_hashes_literal_bracket_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            order_json("u1", "done"),
            order_json("u2", "done")
        ])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let request = ListOrdersRequest {
        uuids: vec!["u1".to_string(), "u2".to_string()],
        state: Some(OrderState::Done),
        ..Default::default()
    };
    let orders = client.list_orders(&request).await.unwrap();
    assert_eq!(orders.len(), 2);

    // Upbit hashes the decoded query, so the brackets must not be escaped.
    let expected = "state=done&uuids[]=u1&uuids[]=u2";
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some(expected));
    let claims = decode_claims(&requests[0]);
    assert_eq!(claims.query_hash, Some(sha512_hex(expected)));
}

#[tokio::test]
async fn test_each_request_gets_a_fresh_nonce() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/api_keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"access_key": ACCESS_KEY, "expire_at": "2025-01-01T00:00:00+09:00"}
        ])))
        .mount(&server)
        .await;

    let client = build_client(&server);
    client.get_api_keys().await.unwrap();
    client.get_api_keys().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_ne!(decode_claims(&requests[0]).nonce, decode_claims(&requests[1]).nonce);
}

#[tokio::test]
async fn test_place_order_sends_json_body() {
    let server = MockServer::start().await;
    let request = PlaceOrderRequest::limit(
        "KRW-BTC",
        OrderSide::Bid,
        "0.01".parse().unwrap(),
        "50000000".parse().unwrap(),
    );

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .and(body_json(serde_json::json!({
            "market": "KRW-BTC",
            "side": "bid",
            "volume": "0.01",
            "price": "50000000",
            "ord_type": "limit"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json("new-order", "wait")))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let order = client.place_order(&request).await.unwrap();
    assert_eq!(order.uuid, "new-order");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
    let expected_query = QueryParams::from_serialize(&request)
        .unwrap()
        .to_query_string()
        .unwrap();
    let claims = decode_claims(&requests[0]);
    assert_eq!(claims.query_hash, Some(sha512_hex(&expected_query)));
}

#[tokio::test]
async fn test_cancel_order_uses_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/order"))
        .and(query_param("identifier", "my-order-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("abc", "cancel")))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let order = client
        .cancel_order(&OrderLookup::by_identifier("my-order-1"))
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Cancel);
}

#[tokio::test]
async fn test_lookups_without_keys_are_rejected_locally() {
    let server = MockServer::start().await;
    let client = build_client(&server);

    let err = client.get_order(&OrderLookup::default()).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRequest(_)));

    let err = client
        .get_withdraw(&TransferLookup::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRequest(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credentials() {
    let server = MockServer::start().await;
    let client = UpbitRestClient::builder().base_url(server.uri()).build();

    let err = client.get_accounts().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Signing);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_error_is_not_retried() {
    let server = MockServer::start().await;
    let response = serde_json::json!({
        "error": {"name": "invalid_access_key", "message": "잘못된 엑세스 키입니다."}
    });

    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.get_accounts().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.code.as_deref(), Some("invalid_access_key"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_coin_address_pending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/deposits/generate_coin_address"))
        .and(body_json(serde_json::json!({"currency": "BTC"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "message": "BTC 입금주소를 생성중입니다."
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client.generate_coin_address("BTC").await.unwrap();
    assert!(matches!(
        response,
        upbit_api_client::rest::exchange::GenerateAddressResponse::Pending { success: true, .. }
    ));
}
