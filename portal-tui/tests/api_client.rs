//! Integration tests for RestClient.
//!
//! Uses wiremock for the backend. Covers status and message mapping, auth
//! headers, the update body, and a full load-edit-save cycle through the
//! profile workflow.

use std::sync::Arc;
use std::time::Duration;

use portal_core::{ProfileBackend, QueryCache, RemoteError, SocialProfileUpdate};
use portal_test_utils::fixtures;
use portal_tui::api_client::RestClient;
use portal_tui::config::AuthConfig;
use portal_tui::workflow::{Phase, ProfileWorkflow, SubmitOutcome};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jwt_auth() -> AuthConfig {
    AuthConfig {
        jwt: Some("test-token".to_string()),
        api_key: None,
        session_cookie: None,
    }
}

fn create_test_client(mock_server: &MockServer) -> RestClient {
    RestClient::with_settings(
        &format!("{}/api", mock_server.uri()),
        &jwt_auth(),
        Duration::from_secs(2),
    )
    .expect("failed to create client")
}

#[tokio::test]
async fn test_get_profile_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::asmith_profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let profile = client.get_profile().await.expect("profile");
    assert_eq!(profile, fixtures::asmith_profile());
}

#[tokio::test]
async fn test_api_key_and_cookie_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patent/list"))
        .and(header("x-api-key", "key-1"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::sample_patents_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = AuthConfig {
        jwt: None,
        api_key: Some("key-1".to_string()),
        session_cookie: Some("sid=abc".to_string()),
    };
    let client =
        RestClient::with_settings(&mock_server.uri(), &auth, Duration::from_secs(2)).unwrap();
    let patents = client.list_patents().await.expect("patents");
    assert_eq!(patents.len(), 1);
}

#[tokio::test]
async fn test_error_status_maps_to_http_error_with_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/project/list"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Not a faculty account" })),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.list_projects().await;

    assert_eq!(
        result,
        Err(RemoteError::http(403, "Not a faculty account"))
    );
}

#[tokio::test]
async fn test_error_without_body_uses_reason_phrase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    match client.get_profile().await {
        Err(RemoteError::Http {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/project/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.list_projects().await;
    assert!(matches!(result, Err(RemoteError::Decode(_))));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/profile/edit"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let value = client
        .put_json("/profile/edit", &json!({ "linkedin": "" }))
        .await
        .expect("put");
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_update_sends_wire_field_names() {
    let mock_server = MockServer::start().await;

    let mut updated = fixtures::asmith_profile_json();
    updated["orchidID"] = json!("0000-0002-1825-0097");

    Mock::given(method("PUT"))
        .and(path("/api/profile/edit"))
        .and(body_json(json!({
            "linkedin": "",
            "orchidID": "0000-0002-1825-0097",
            "scopusID": "",
            "googleScholar": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let update = SocialProfileUpdate {
        linkedin: Some(String::new()),
        orchid_id: Some("0000-0002-1825-0097".to_string()),
        scopus_id: Some(String::new()),
        google_scholar: Some(String::new()),
    };
    let profile = client.update_social_profile(&update).await.expect("update");
    assert_eq!(profile.orchid_id.as_deref(), Some("0000-0002-1825-0097"));
}

#[tokio::test]
async fn test_slow_server_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::asmith_profile_json())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client =
        RestClient::with_settings(&mock_server.uri(), &jwt_auth(), Duration::from_millis(50))
            .unwrap();
    let result = client.get_profile().await;
    assert!(matches!(result, Err(RemoteError::Network(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = RestClient::with_settings(
        &format!("http://127.0.0.1:{}", port),
        &jwt_auth(),
        Duration::from_secs(1),
    )
    .unwrap();

    let result = client.get_json("/profile").await;
    assert!(matches!(result, Err(RemoteError::Network(_))));
}

#[tokio::test]
async fn test_edit_links_round_trip_through_workflow() {
    let mock_server = MockServer::start().await;
    let linkedin = "https://linkedin.com/in/asmith";

    let mut updated = fixtures::asmith_profile_json();
    updated["linkedin"] = json!(linkedin);

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::asmith_profile_json()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated.clone()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/project/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::sample_projects_json()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patent/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile/edit"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend: Arc<dyn ProfileBackend> = Arc::new(create_test_client(&mock_server));
    let mut wf = ProfileWorkflow::new(QueryCache::default(), backend);
    wf.mount();

    let settled = |wf: &ProfileWorkflow| {
        !wf.profile().is_loading() && !wf.projects().is_loading() && !wf.patents().is_loading()
    };
    tokio::time::timeout(Duration::from_secs(5), async {
        while !settled(&wf) {
            let update = wf.next_update().await.expect("subscribed");
            wf.apply_update(update);
        }
    })
    .await
    .expect("initial load");

    assert_eq!(wf.phase(), Phase::Ready);
    assert_eq!(wf.form().value("linkedin"), "");

    assert!(wf.edit_field("linkedin", linkedin));
    assert_eq!(wf.submit().await, SubmitOutcome::Saved);

    tokio::time::timeout(Duration::from_secs(5), async {
        while wf.profile().ready().and_then(|p| p.linkedin.as_deref()) != Some(linkedin) {
            let update = wf.next_update().await.expect("subscribed");
            wf.apply_update(update);
        }
    })
    .await
    .expect("refetch after save");

    assert_eq!(wf.form().value("linkedin"), linkedin);
    let puts = mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == "PUT")
        .count();
    assert_eq!(puts, 1);
}
