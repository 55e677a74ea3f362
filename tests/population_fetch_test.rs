use anyhow::Result;
use httpmock::prelude::*;
use popsolar::{
    ClientConfig, DataClient, Delivery, DeliveryPolicy, DispatchState, FetchError,
    PopulationResponse, PopulationSummary,
};
use tokio::sync::oneshot;
use tokio_test::{assert_err, assert_ok};

fn config_for(server: &MockServer, policy: DeliveryPolicy) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.population.base_url = server.base_url();
    config.http.timeout_seconds = 5;
    config.delivery.policy = policy;
    config
}

#[tokio::test]
async fn test_population_end_to_end() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/1.0/population/Georgia/today-and-tomorrow/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "total_population": [
                        {"date": "2024-05-19", "population": 3760365},
                        {"date": "2024-05-20", "population": 3760401}
                    ]
                }));
        })
        .await;

    let client = DataClient::from_config(&config_for(&server, DeliveryPolicy::Silent))?;
    let (tx, rx) = oneshot::channel::<popsolar::Result<PopulationResponse>>();

    let handle = client.population("Georgia", tx)?;
    assert_eq!(handle.join().await, DispatchState::Delivered(Delivery::Value));
    api_mock.assert_async().await;

    let response = rx.await??;
    let summary = PopulationSummary::from_response(&response).unwrap();
    assert_eq!(summary.today_text, "3760365");
    assert_eq!(summary.tomorrow_text, "3760401");
    Ok(())
}

#[tokio::test]
async fn test_fetch_population_returns_typed_value() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/1.0/population/Brazil/today-and-tomorrow/");
            then.status(200)
                .body(r#"{"total_population":[{"population":1000},{"population":1010}]}"#);
        })
        .await;

    let client = DataClient::from_config(&config_for(&server, DeliveryPolicy::Silent))?;
    let response = assert_ok!(client.fetch_population("Brazil").await);

    assert_eq!(response.today().unwrap().population, 1000);
    assert_eq!(response.tomorrow().unwrap().population, 1010);
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_silently_dropped_by_default() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/1.0/population/Georgia/today-and-tomorrow/");
            then.status(200).body(r#"{"total_population":"#);
        })
        .await;

    let client = DataClient::from_config(&config_for(&server, DeliveryPolicy::Silent))?;
    let (tx, rx) = oneshot::channel::<popsolar::Result<PopulationResponse>>();

    let handle = client.population("Georgia", tx)?;
    assert_eq!(
        handle.join().await,
        DispatchState::Delivered(Delivery::Suppressed)
    );
    api_mock.assert_async().await;
    assert_err!(rx.await);

    // The structured path still reports why.
    let err = client.fetch_population("Georgia").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
    Ok(())
}

#[tokio::test]
async fn test_server_error_never_reaches_value_channel() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/1.0/population/Atlantis/today-and-tomorrow/");
            then.status(400)
                .json_body(serde_json::json!({"detail": "Atlantis is an invalid value"}));
        })
        .await;

    let client = DataClient::from_config(&config_for(&server, DeliveryPolicy::Strict))?;
    let (tx, rx) = oneshot::channel::<popsolar::Result<PopulationResponse>>();

    let handle = client.population("Atlantis", tx)?;
    assert_eq!(handle.join().await, DispatchState::Delivered(Delivery::Error));

    match rx.await? {
        Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 400),
        other => panic!("expected an HTTP status error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_country_with_spaces_is_encoded() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/today-and-tomorrow/");
            then.status(200)
                .body(r#"{"total_population":[{"population":1},{"population":2}]}"#);
        })
        .await;

    let client = DataClient::from_config(&config_for(&server, DeliveryPolicy::Strict))?;
    let url = client.endpoints().population_url("United States")?;
    assert!(url.as_str().ends_with("/1.0/population/United%20States/today-and-tomorrow/"));

    assert_ok!(client.fetch_population("United States").await);
    api_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_base_url_is_an_error_not_a_panic() {
    let mut config = ClientConfig::default();
    config.population.base_url = "population.io without scheme".to_string();

    let err = DataClient::from_config(&config).err().unwrap();
    assert!(matches!(err, FetchError::InvalidRequestConfiguration { .. }));
}
