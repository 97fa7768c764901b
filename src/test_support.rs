use wiremock::MockServer;

use crate::api::ApiClient;

/// A mock backend mounted under `/api`, and a client pointed at it.
pub(crate) async fn mock_backend() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(format!("{}/api", server.uri())).unwrap();
    (server, client)
}

/// Query string of the `index`-th request the server saw.
pub(crate) async fn query_of(server: &MockServer, index: usize) -> Option<String> {
    let received = server.received_requests().await.unwrap();
    received[index].url.query().map(str::to_string)
}
