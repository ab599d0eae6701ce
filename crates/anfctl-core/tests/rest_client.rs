//! RestClient against a mock management endpoint

use std::time::Duration;

use anfctl_core::netapp::{
    CapacityPool, NetAppApi, NetAppAccount, PoolChangeRequest, RestClient, ServiceLevel,
    create_pool_and_wait, delete_volume_and_wait,
};
use anfctl_core::poller::{PollSettings, ResourcePoller};
use anfctl_core::{ResourceHandle, netapp::MIN_POOL_SIZE};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_VERSION: &str = "2019-11-01";

fn client(server: &MockServer) -> RestClient {
    RestClient::new(&server.uri(), API_VERSION, Some("test-token".to_string())).unwrap()
}

fn pool_id() -> ResourceHandle {
    ResourceHandle::pool("sub", "rg", "acct", "primary")
}

fn pool_body(state: &str) -> serde_json::Value {
    json!({
        "id": pool_id().as_str(),
        "name": "acct/primary",
        "type": "Microsoft.NetApp/netAppAccounts/capacityPools",
        "location": "westus",
        "properties": {
            "serviceLevel": "Premium",
            "size": 4_398_046_511_104u64,
            "provisioningState": state
        }
    })
}

fn fast_poller() -> ResourcePoller {
    ResourcePoller::new(PollSettings::new(3, Duration::from_millis(10)))
}

#[tokio::test]
async fn test_get_pool_sends_api_version_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(pool_id().as_str()))
        .and(query_param("api-version", API_VERSION))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body("Succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    let pool = client(&server).get_pool(&pool_id()).await.unwrap();
    assert_eq!(pool.properties.service_level, ServiceLevel::Premium);
    assert_eq!(pool.id.as_deref(), Some(pool_id().as_str()));
}

#[tokio::test]
async fn test_missing_resource_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(pool_id().as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "ResourceNotFound", "message": "not found" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_pool(&pool_id()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("capacity pool 'primary'"));
}

#[tokio::test]
async fn test_auth_failure_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("InvalidAuthenticationToken"))
        .mount(&server)
        .await;

    let err = client(&server).get_pool(&pool_id()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("InvalidAuthenticationToken"));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).get_pool(&pool_id()).await.unwrap_err();
    assert!(matches!(err, anfctl_core::CoreError::Decode(_)));
}

#[tokio::test]
async fn test_wrong_kind_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let account = ResourceHandle::account("sub", "rg", "acct");
    let err = client(&server).get_pool(&account).await.unwrap_err();
    assert!(err.to_string().contains("expected a capacity pool id"));
}

#[tokio::test]
async fn test_create_account_puts_lowercase_location() {
    let server = MockServer::start().await;
    let account = ResourceHandle::account("sub", "rg", "acct");
    Mock::given(method("PUT"))
        .and(path(account.as_str()))
        .and(body_json(json!({ "location": "westus", "properties": {} })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": account.as_str(),
            "name": "acct",
            "location": "westus",
            "properties": { "provisioningState": "Creating" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_or_update_account(&account, &NetAppAccount::new("WestUS"))
        .await
        .unwrap();
    assert_eq!(
        created.properties.provisioning_state.as_deref(),
        Some("Creating")
    );
}

#[tokio::test]
async fn test_pool_change_posts_new_pool_id() {
    let server = MockServer::start().await;
    let volume = ResourceHandle::volume("sub", "rg", "acct", "primary", "vol");
    let secondary = ResourceHandle::pool("sub", "rg", "acct", "secondary");

    Mock::given(method("POST"))
        .and(path(format!("{}/poolChange", volume.as_str())))
        .and(query_param("api-version", API_VERSION))
        .and(body_json(json!({ "newPoolResourceId": secondary.as_str() })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .pool_change(&volume, &PoolChangeRequest::new(secondary.as_str()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_pool_and_wait_polls_until_readable() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(pool_id().as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(pool_body("Creating")))
        .expect(1)
        .mount(&server)
        .await;
    // First read races the backend and misses
    Mock::given(method("GET"))
        .and(path(pool_id().as_str()))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(pool_id().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(pool_body("Succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let body = CapacityPool::new("westus", ServiceLevel::Premium, MIN_POOL_SIZE);
    let pool = create_pool_and_wait(&client, &pool_id(), &body, &fast_poller())
        .await
        .unwrap();
    assert_eq!(
        pool.properties.provisioning_state.as_deref(),
        Some("Succeeded")
    );
}

#[tokio::test]
async fn test_delete_volume_and_wait_times_out_when_volume_lingers() {
    let server = MockServer::start().await;
    let volume = ResourceHandle::volume("sub", "rg", "acct", "secondary", "vol");

    Mock::given(method("DELETE"))
        .and(path(volume.as_str()))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(volume.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": "westus",
            "properties": {
                "creationToken": "vol",
                "serviceLevel": "Standard",
                "usageThreshold": 107_374_182_400u64,
                "subnetId": "subnet",
                "provisioningState": "Deleting"
            }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let err = delete_volume_and_wait(&client(&server), &volume, &fast_poller())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}
