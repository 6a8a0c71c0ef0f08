// Path: crates/client/src/algod/tests/mod.rs
use super::models::{SimulateRequest, SimulateResponse};
use super::*;
use koa_types::app::{Digest, SignedTransaction, Transaction, TxType};
use koa_types::error::ErrorCode;
use serde_json::json;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AlgodClient {
    AlgodClient::new(&server.uri(), "secret-token", "koa-test")
        .unwrap()
        .with_retries(2)
}

#[tokio::test]
async fn suggested_params_are_mapped_and_authenticated() {
    let server = MockServer::start().await;
    let genesis = Digest::hash(b"sandnet");
    Mock::given(method("GET"))
        .and(path("/v2/transactions/params"))
        .and(header(API_TOKEN_HEADER, "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "consensus-version": "future",
            "fee": 0,
            "genesis-hash": genesis.to_string(),
            "genesis-id": "sandnet-v1",
            "last-round": 120,
            "min-fee": 1000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = client(&server).suggested_params().await.unwrap();
    assert_eq!(params.first_valid, 120);
    assert_eq!(params.last_valid, 1120);
    assert_eq!(params.min_fee, 1000);
    assert_eq!(params.genesis_hash, genesis);
    assert_eq!(params.genesis_id, "sandnet-v1");
    assert!(!params.flat_fee);
}

#[tokio::test]
async fn submit_sends_raw_bytes_and_returns_tx_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .and(header("content-type", "application/x-binary"))
        .and(body_bytes(vec![0x81, 0xa1, 0x61, 0x01]))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"txId": "TXID"})))
        .expect(1)
        .mount(&server)
        .await;

    let tx_id = client(&server).submit(&[0x81, 0xa1, 0x61, 0x01]).await.unwrap();
    assert_eq!(tx_id, "TXID");
}

#[tokio::test]
async fn rejected_submission_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "transaction rejected by ApprovalProgram"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).submit(b"group").await.unwrap_err();
    assert_eq!(err.code(), "SUBMIT_REJECTED");
    match err {
        ClientError::Submission(SubmissionError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("ApprovalProgram"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn server_errors_are_retried_for_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"last-round": 7})))
        .mount(&server)
        .await;

    let status = client(&server).status().await.unwrap();
    assert_eq!(status.last_round, 7);
}

#[tokio::test]
async fn exhausted_retries_surface_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).status().await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(err, ClientError::Http { status: 500, .. }));
}

#[tokio::test]
async fn global_state_is_read_from_created_app() {
    let server = MockServer::start().await;
    let owner = Address([4u8; 32]);
    Mock::given(method("GET"))
        .and(path(format!("/v2/accounts/{}/applications/42", owner)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created-app": {
                "global-state": [
                    {"key": "a2luZ19wcmljZQ==", "value": {"type": 2, "uint": 200000}},
                    {"key": "a2luZw==", "value": {"type": 1, "bytes": ""}}
                ]
            }
        })))
        .mount(&server)
        .await;

    let entries = client(&server)
        .read_contract_key_values(&owner, 42)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], RawKeyValue::uint(b"king_price", 200_000));
    assert_eq!(entries[1], RawKeyValue::bytes(b"king", b""));
}

#[tokio::test]
async fn missing_created_app_is_reported() {
    let server = MockServer::start().await;
    let owner = Address([4u8; 32]);
    Mock::given(method("GET"))
        .and(path(format!("/v2/accounts/{}/applications/42", owner)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client(&server)
        .read_contract_key_values(&owner, 42)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 404, .. }));
}

#[tokio::test]
async fn unknown_pending_transaction_is_a_plain_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/transactions/pending/NOPE"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "txn does not exist"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).pending_transaction("NOPE").await.unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("txn does not exist"));
}

#[tokio::test]
async fn compile_decodes_program_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/teal/compile"))
        .and(body_bytes(b"#pragma version 6\nint 1\n".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "HASH",
            "result": "BoEB"
        })))
        .mount(&server)
        .await;

    let program = client(&server)
        .compile(b"#pragma version 6\nint 1\n")
        .await
        .unwrap();
    assert_eq!(program, vec![0x06, 0x81, 0x01]);
}

#[tokio::test]
async fn simulate_posts_msgpack_and_parses_json() {
    let server = MockServer::start().await;
    let txn = Transaction {
        tx_type: TxType::Payment,
        sender: Address([1u8; 32]),
        receiver: Address([2u8; 32]),
        amount: 5,
        fee: 1000,
        first_valid: 1,
        last_valid: 2,
        genesis_hash: Digest::hash(b"net"),
        ..Default::default()
    };
    let request = SimulateRequest::traced_group(vec![SignedTransaction::unsigned(txn)]);
    let encoded = codec::to_bytes_canonical(&request).unwrap();

    Mock::given(method("POST"))
        .and(path("/v2/transactions/simulate"))
        .and(header("content-type", "application/msgpack"))
        .and(body_bytes(encoded))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "last-round": 9,
            "version": 2,
            "txn-groups": [{
                "failed-at": [0],
                "failure-message": "logic eval error: assert failed pc=80",
                "txn-results": [{"txn-result": {}}]
            }]
        })))
        .mount(&server)
        .await;

    let response: SimulateResponse = client(&server).simulate(&request).await.unwrap();
    assert_eq!(response.last_round, 9);
    let group = &response.txn_groups[0];
    assert_eq!(group.failed_index(), Some(0));
    assert!(group.failure_message.as_deref().unwrap().contains("assert failed"));
}

#[test]
fn backoff_grows_and_honors_retry_after() {
    assert_eq!(retry_delay(0, None), Duration::from_millis(100));
    assert_eq!(retry_delay(2, None), Duration::from_millis(400));
    assert_eq!(retry_delay(10, None), Duration::from_millis(MAX_BACKOFF_MS));
    let header = HeaderValue::from_static("3");
    assert_eq!(retry_delay(0, Some(&header)), Duration::from_secs(3));
}

#[test]
fn snippets_are_single_line_and_bounded() {
    let body = format!("line one\nline two\t{}", "x".repeat(400));
    let snippet = ascii_snippet(body.as_bytes());
    assert!(!snippet.contains('\n'));
    assert!(snippet.starts_with("line one\\nline two\\t"));
    assert!(snippet.chars().count() <= 170);
}
