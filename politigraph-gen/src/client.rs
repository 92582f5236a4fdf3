//! GraphQL client for the politigraph API
//!
//! One endpoint, one request shape: a query document plus
//! `{limit, offset}` variables, answered with `{"data": {<key>: [...]}}`.
//! Any transport or protocol problem is returned as a [`GraphQlError`];
//! nothing here retries.

use crate::fetcher::PageSource;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("politigraph-gen/", env!("CARGO_PKG_VERSION"));

/// Result list field of [`PEOPLE_QUERY`]
pub const PEOPLE_KEY: &str = "people";
/// Result list field of [`VOTE_EVENTS_QUERY`]
pub const VOTE_EVENTS_KEY: &str = "voteEvents";

pub const PEOPLE_QUERY: &str = r#"
query People($limit: Int, $offset: Int) {
  people(limit: $limit, offset: $offset) {
    id
    prefix
    name
    image
    gender
    national_identity
    birth_date
    educations
    previous_occupations
    memberships {
      label
      province
      district_number
      start_date
      end_date
      posts {
        label
        start_date
        end_date
        organizations {
          name
          image
          color
        }
      }
    }
  }
}
"#;

pub const VOTE_EVENTS_QUERY: &str = r#"
query VoteEvents($limit: Int, $offset: Int) {
  voteEvents(limit: $limit, offset: $offset) {
    id
    title
    nickname
    classification
    publish_status
    start_date
    end_date
    pass_condition
    result
    agree_count
    disagree_count
    abstain_count
    novote_count
    votes {
      option
      voters {
        name
      }
    }
  }
}
"#;

/// GraphQL client errors
#[derive(Debug, Error)]
pub enum GraphQlError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// The payload carried an `error`/`errors` field
    #[error("Server reported error: {0}")]
    ServerError(String),

    #[error("Missing field in response: {0}")]
    MissingField(String),
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: PageVariables,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct PageVariables {
    limit: usize,
    offset: usize,
}

/// politigraph GraphQL API client
pub struct GraphQlClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, GraphQlError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| GraphQlError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Run one paged query and return the payload's `data` object
    pub async fn execute(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Value, GraphQlError> {
        let body = GraphQlRequest {
            query,
            variables: PageVariables { limit, offset },
        };

        tracing::debug!(endpoint = %self.endpoint, limit, offset, "Querying GraphQL API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| GraphQlError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GraphQlError::ApiError(status.as_u16(), error_text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GraphQlError::ParseError(e.to_string()))?;

        extract_data(payload)
    }

    /// Page source over one list field of one query
    pub fn pages<'a>(&'a self, query: &'a str, data_key: &'a str) -> GraphQlPages<'a> {
        GraphQlPages {
            client: self,
            query,
            data_key,
        }
    }
}

/// Unwrap the `data` object, surfacing server-reported errors
pub fn extract_data(mut payload: Value) -> Result<Value, GraphQlError> {
    if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
        return Err(GraphQlError::ServerError(error.to_string()));
    }
    if let Some(errors) = payload.get("errors") {
        let reported = match errors {
            Value::Null => false,
            Value::Array(list) => !list.is_empty(),
            _ => true,
        };
        if reported {
            return Err(GraphQlError::ServerError(errors.to_string()));
        }
    }

    match payload.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Err(GraphQlError::MissingField("data".to_string())),
        Some(data) => Ok(data),
    }
}

/// Pull the result list out of `data`
///
/// A `null` list is an empty page.
pub fn extract_page(data: &Value, data_key: &str) -> Result<Vec<Value>, GraphQlError> {
    match data.get(data_key) {
        None => Err(GraphQlError::MissingField(data_key.to_string())),
        Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows.clone()),
        Some(other) => Err(GraphQlError::ParseError(format!(
            "expected list for {}, got {}",
            data_key, other
        ))),
    }
}

/// [`PageSource`] backed by a live GraphQL endpoint
pub struct GraphQlPages<'a> {
    client: &'a GraphQlClient,
    query: &'a str,
    data_key: &'a str,
}

#[async_trait]
impl PageSource for GraphQlPages<'_> {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Value>, GraphQlError> {
        let data = self.client.execute(self.query, limit, offset).await?;
        extract_page(&data, self.data_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port, returning its URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/graphql", addr)
    }

    /// Drain headers and the JSON body so the reply is not reset
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    #[test]
    fn test_client_creation() {
        let client = GraphQlClient::new("http://localhost:4000/graphql", None);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_execute_non_success_status_is_api_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "upstream down").await;
        let client = GraphQlClient::new(&url, Some(Duration::from_secs(5))).unwrap();

        let result = client.execute(PEOPLE_QUERY, 10, 0).await;

        match result {
            Err(GraphQlError::ApiError(status, body)) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_unreadable_payload_is_parse_error() {
        let url = serve_once("HTTP/1.1 200 OK", "<html>not json</html>").await;
        let client = GraphQlClient::new(&url, Some(Duration::from_secs(5))).unwrap();

        let result = client.execute(PEOPLE_QUERY, 10, 0).await;

        assert!(matches!(result, Err(GraphQlError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_execute_returns_data_object() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"data":{"people":[{"id":"p1"}]}}"#).await;
        let client = GraphQlClient::new(&url, Some(Duration::from_secs(5))).unwrap();

        let data = client.execute(PEOPLE_QUERY, 10, 0).await.unwrap();

        assert_eq!(extract_page(&data, PEOPLE_KEY).unwrap().len(), 1);
    }

    #[test]
    fn test_request_body_shape() {
        let body = GraphQlRequest {
            query: PEOPLE_QUERY,
            variables: PageVariables {
                limit: 100,
                offset: 200,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["variables"], json!({"limit": 100, "offset": 200}));
        assert!(value["query"].as_str().unwrap().contains("people(limit: $limit"));
    }

    #[test]
    fn test_extract_data_ok() {
        let data = extract_data(json!({"data": {"people": []}})).unwrap();
        assert_eq!(data, json!({"people": []}));
    }

    #[test]
    fn test_extract_data_server_error_field() {
        let result = extract_data(json!({"error": "boom", "data": null}));
        assert!(matches!(result, Err(GraphQlError::ServerError(_))));
    }

    #[test]
    fn test_extract_data_graphql_errors_list() {
        let result = extract_data(json!({
            "errors": [{"message": "Cannot query field"}],
            "data": {"people": []}
        }));
        assert!(matches!(result, Err(GraphQlError::ServerError(_))));

        // An empty errors list is not a failure
        let ok = extract_data(json!({"errors": [], "data": {"people": []}}));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_extract_data_missing_data() {
        assert!(matches!(
            extract_data(json!({})),
            Err(GraphQlError::MissingField(_))
        ));
        assert!(matches!(
            extract_data(json!({"data": null})),
            Err(GraphQlError::MissingField(_))
        ));
    }

    #[test]
    fn test_extract_page_variants() {
        let data = json!({
            "people": [{"id": "a"}, {"id": "b"}],
            "voteEvents": null,
            "bogus": 3
        });
        assert_eq!(extract_page(&data, PEOPLE_KEY).unwrap().len(), 2);
        assert!(extract_page(&data, VOTE_EVENTS_KEY).unwrap().is_empty());
        assert!(matches!(
            extract_page(&data, "bogus"),
            Err(GraphQlError::ParseError(_))
        ));
        assert!(matches!(
            extract_page(&data, "missing"),
            Err(GraphQlError::MissingField(_))
        ));
    }
}
