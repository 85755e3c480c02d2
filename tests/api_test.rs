//! End-to-end tests against a live server with the simulated backend.

use serde_json::json;
use wallet_playground::config::SimulatedConfig;

mod common;

#[tokio::test]
async fn test_health_and_env() {
    let server = common::start_server().await;

    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok", "mode": "simulated" }));

    let (status, body) = server.get("/check-env-variables").await;
    assert_eq!(status, 200);
    assert!(body["available"].is_boolean());
    assert!(body["message"].is_string());
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start_server().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_smart_account_without_owner_is_rejected() {
    let server = common::start_server().await;

    let (status, body) = server.post("/evm/create-account", json!({ "type": "smart" })).await;
    assert_eq!(status, 400);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let (_, body) = server.get("/accounts?chain=evm").await;
    assert_eq!(body["accounts"], json!([]));
}

#[tokio::test]
async fn test_smart_account_with_owner() {
    let server = common::start_server().await;

    let (status, owner) = server.post("/evm/create-account", json!({ "type": "regular" })).await;
    assert_eq!(status, 200);
    let owner = owner["address"].as_str().unwrap().to_string();

    let (status, smart) = server
        .post(
            "/evm/create-account",
            json!({ "type": "smart", "ownerAddress": owner, "network": "ethereum-sepolia" }),
        )
        .await;
    assert_eq!(status, 200);
    assert!(smart["address"].as_str().unwrap().starts_with("0x"));

    let (_, body) = server.get("/accounts?chain=evm").await;
    let accounts = body["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["type"], "regular");
    assert_eq!(accounts[1]["type"], "smart");
    assert_eq!(accounts[1]["network"], "ethereum-sepolia");
}

#[tokio::test]
async fn test_evm_faucet_send_and_wait() {
    let server = common::start_server().await;

    let (_, from) = server.post("/evm/create-account", json!({ "type": "regular" })).await;
    let (_, to) = server.post("/evm/create-account", json!({ "type": "regular" })).await;
    let from = from["address"].as_str().unwrap().to_string();
    let to = to["address"].as_str().unwrap().to_string();

    let (status, faucet) = server
        .post(
            "/evm/request-faucet",
            json!({ "address": from, "network": "base-sepolia", "token": "eth" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(faucet["confirmed"], true);
    assert_eq!(faucet["balance"], "0.000100000000000000");
    assert!(faucet["transactionHash"].as_str().unwrap().starts_with("0x"));

    let (status, balance) = server
        .post("/evm/check-balance", json!({ "address": from, "network": "base-sepolia" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(balance["balance"], "0.000100000000000000");

    let (status, sent) = server
        .post(
            "/evm/send-transaction",
            json!({ "address": from, "network": "base-sepolia", "to": to, "value": "0.00001" }),
        )
        .await;
    assert_eq!(status, 200);
    let hash = sent["transactionHash"].as_str().unwrap().to_string();

    let (_, txs) = server.get("/transactions?chain=evm").await;
    assert_eq!(txs["transactions"][0]["hash"], hash);
    assert_eq!(txs["transactions"][0]["status"], "pending");
    assert_eq!(txs["transactions"][0]["type"], "send");

    let (status, receipt) = server
        .post(
            "/evm/wait-for-transaction",
            json!({ "network": "base-sepolia", "hash": hash }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(receipt["receipt"]["transactionHash"], hash);

    let (_, txs) = server.get("/transactions?chain=evm").await;
    let sent_tx = &txs["transactions"][0];
    assert_eq!(sent_tx["status"], "success");
    assert_eq!(sent_tx["from"], from);
    assert_eq!(sent_tx["to"], to);
    assert_eq!(sent_tx["amount"], "0.00001");
    assert_eq!(sent_tx["token"], "ETH");
    assert_eq!(txs["transactions"][1]["from"], "Faucet");
}

#[tokio::test]
async fn test_evm_input_errors() {
    let server = common::start_server().await;
    let (_, account) = server.post("/evm/create-account", json!({ "type": "regular" })).await;
    let address = account["address"].as_str().unwrap().to_string();

    let (status, body) = server
        .post("/evm/check-balance", json!({ "address": address, "network": "mainnet" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Unknown network: mainnet");

    let (status, _) = server
        .post("/evm/check-balance", json!({ "address": "0x123", "network": "base-sepolia" }))
        .await;
    assert_eq!(status, 400);

    let (status, _) = server
        .post(
            "/evm/request-faucet",
            json!({ "address": address, "network": "base-sepolia", "token": "usdc" }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = server
        .post(
            "/evm/send-transaction",
            json!({ "address": address, "network": "base-sepolia", "to": address, "value": "-1" }),
        )
        .await;
    assert_eq!(status, 400);

    // Missing field
    let (status, body) = server.post("/evm/check-balance", json!({ "address": address })).await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let server = common::start_server().await;

    let res = server
        .client
        .post(server.url("/solana/check-balance"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_faucet_without_funds_reports_distinct_error() {
    let dry = SimulatedConfig {
        evm_faucet_wei: 0,
        solana_faucet_lamports: 0,
    };
    let server = common::start_server_with(dry, 2).await;

    let (_, account) = server.post("/solana/create-account", json!({})).await;
    let address = account["address"].as_str().unwrap().to_string();

    let (status, body) = server
        .post("/solana/request-faucet", json!({ "address": address, "token": "sol" }))
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "No funds received after 2 attempts");

    let (_, txs) = server.get("/transactions?chain=solana").await;
    assert_eq!(txs["transactions"][0]["status"], "pending");
}

#[tokio::test]
async fn test_solana_flow() {
    let server = common::start_server().await;

    let (status, alice) = server.post("/solana/create-account", json!({})).await;
    assert_eq!(status, 200);
    let (_, bob) = server.post("/solana/create-account", json!({})).await;
    let alice = alice["address"].as_str().unwrap().to_string();
    let bob = bob["address"].as_str().unwrap().to_string();

    let (status, faucet) = server
        .post("/solana/request-faucet", json!({ "address": alice, "token": "sol" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(faucet["confirmed"], true);
    assert_eq!(faucet["balance"], "0.001250000");
    assert!(faucet["signature"].is_string());

    let (status, sent) = server
        .post(
            "/solana/send-transaction",
            json!({ "address": alice, "to": bob, "amount": "0.00025" }),
        )
        .await;
    assert_eq!(status, 200);
    let signature = sent["signature"].as_str().unwrap().to_string();

    let (status, waited) = server
        .post("/solana/wait-for-transaction", json!({ "signature": signature }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(waited, json!({ "confirmed": true }));

    let (_, balance) = server.post("/solana/check-balance", json!({ "address": bob })).await;
    assert_eq!(balance["balance"], "0.000250000");

    let (_, accounts) = server.get("/accounts?chain=solana").await;
    let accounts = accounts["accounts"].as_array().unwrap();
    assert_eq!(accounts[0]["balance"], "0.001000000");
    assert_eq!(accounts[1]["balance"], "0.000250000");
    assert!(accounts[0].get("type").is_none());

    let (_, txs) = server.get("/transactions?chain=solana").await;
    assert_eq!(txs["transactions"][0]["hash"], signature);
    assert_eq!(txs["transactions"][0]["status"], "success");
}

#[tokio::test]
async fn test_unknown_chain_query() {
    let server = common::start_server().await;
    let (status, body) = server.get("/accounts?chain=bitcoin").await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}
