//! Drives the device end to end against a mock OpenWeather server.

use owm_core::{
    CurrentWeather, Device, DeviceConfig, EventName, EventValue, FetchError, OpenWeatherProvider,
    UpdateError, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_weather(dt: i64) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 37.62, "lat": 55.75},
        "weather": [{"id": 800, "main": "Clear", "description": "ясно", "icon": "01d"}],
        "base": "stations",
        "main": {"temp": 20.0, "feels_like": 19.5, "temp_min": 18.0, "temp_max": 21.0, "pressure": 1013.25, "humidity": 55},
        "visibility": 10000,
        "wind": {"speed": 3.2, "deg": 200},
        "clouds": {"all": 0},
        "dt": dt,
        "id": 524901,
        "name": "Москва",
        "cod": 200
    })
}

fn create_device(mock_server: &MockServer) -> CurrentWeather<OpenWeatherProvider> {
    #[allow(clippy::expect_used)]
    let provider = OpenWeatherProvider::with_base_url(mock_server.uri()).expect("client builds");
    let config = DeviceConfig { api_key: Some("KEY".into()), city_id: Some("524901".into()) };
    CurrentWeather::with_config(provider, "balcony", config)
}

async fn mount_weather(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn request_carries_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("APPID", "KEY"))
        .and(query_param("id", "524901"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "ru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather(1000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut device = create_device(&mock_server);
    assert!(device.update().await);
}

#[tokio::test]
async fn update_applies_reading_and_events() {
    let mock_server = MockServer::start().await;
    mount_weather(&mock_server, ResponseTemplate::new(200).set_body_json(current_weather(1000))).await;

    let mut device = create_device(&mock_server);
    assert!(device.update().await);

    let state = device.state().expect("state after update");
    assert!((state.pressure - 760.0).abs() < 1e-9);
    assert_eq!(state.wind_direction_string.as_str(), "S");
    assert_eq!(state.description, "ясно");
    assert_eq!(device.last_update(), 1000);

    let events = device.take_events().expect("events after update");
    let raw = events.get(EventName::Weather).and_then(EventValue::as_str).expect("weather event");
    assert!(raw.contains("Москва"));
    assert!(device.take_events().is_none());
}

#[tokio::test]
async fn unchanged_upstream_is_reported_once() {
    let mock_server = MockServer::start().await;
    mount_weather(&mock_server, ResponseTemplate::new(200).set_body_json(current_weather(1000))).await;

    let mut device = create_device(&mock_server);
    assert!(device.update().await);
    let before = device.state();

    assert!(matches!(device.try_update().await, Err(UpdateError::Unchanged(1000))));
    assert_eq!(device.state(), before);
}

#[tokio::test]
async fn unauthorized_is_a_status_error() {
    let mock_server = MockServer::start().await;
    mount_weather(
        &mock_server,
        ResponseTemplate::new(401)
            .set_body_json(serde_json::json!({"cod": 401, "message": "Invalid API key"})),
    )
    .await;

    let mut device = create_device(&mock_server);
    let result = device.try_update().await;

    assert!(
        matches!(
            result,
            Err(UpdateError::Fetch(FetchError::Status { status, .. })) if status.as_u16() == 401
        ),
        "Expected 401 status error, got: {result:?}"
    );
    assert_eq!(device.state(), None);
    assert_eq!(device.last_update(), 0);
}

#[tokio::test]
async fn malformed_body_keeps_previous_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather(1000)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_weather(&mock_server, ResponseTemplate::new(200).set_body_string("not valid json")).await;

    let mut device = create_device(&mock_server);
    assert!(device.update().await);
    let before = device.state();
    let _ = device.take_events();

    let result = device.try_update().await;
    assert!(
        matches!(result, Err(UpdateError::Fetch(FetchError::Decode(_)))),
        "Expected decode error, got: {result:?}"
    );
    assert_eq!(device.state(), before);
    assert!(device.take_events().is_none());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on port 1.
    let provider = OpenWeatherProvider::with_base_url("http://127.0.0.1:1").expect("client builds");
    let result = provider.fetch_current("KEY", "524901").await;

    assert!(
        matches!(result, Err(FetchError::Transport(_))),
        "Expected transport error, got: {result:?}"
    );
}
