// Remote venue API client
// Typed wrappers over the venue/booking REST endpoints. Every call is one
// round trip and comes back as a tagged result; nothing panics past here.

use crate::config::{ClientConfig, SortOrder};
use crate::session::Session;
use crate::venue::{
    AuthUser, Booking, BookingPayload, DataEnvelope, ErrorDetail, ErrorEnvelope, PageMeta, Venue,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub const API_KEY_HEADER: &str = "X-Noroff-API-Key";
pub const GENERIC_FAILURE: &str = "API request failed";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error: {status} - {}", first_message(.errors))]
    Api {
        status: u16,
        errors: Vec<ErrorDetail>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

fn first_message(errors: &[ErrorDetail]) -> &str {
    errors
        .first()
        .map(|detail| detail.message.as_str())
        .unwrap_or(GENERIC_FAILURE)
}

impl ApiError {
    // Normalized error list; always holds at least one entry.
    pub fn details(&self) -> Vec<ErrorDetail> {
        match self {
            ApiError::Api { errors, .. } if !errors.is_empty() => errors.clone(),
            ApiError::NotFound(message) => vec![ErrorDetail::new(message.clone())],
            _ => vec![ErrorDetail::new(GENERIC_FAILURE)],
        }
    }

    // The single string a view shows for this failure.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Api { errors, .. } => first_message(errors).to_string(),
            ApiError::NotFound(message) => message.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VenuePage {
    pub venues: Vec<Venue>,
    pub meta: Option<PageMeta>,
}

impl VenuePage {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues, meta: None }
    }
}

// Operations the listing, detail and booking views need from the remote API
#[async_trait]
pub trait VenueApi: Send + Sync + 'static {
    async fn list_venues(
        &self,
        page: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> ApiResult<VenuePage>;

    async fn search_venues(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> ApiResult<VenuePage>;

    async fn get_venue_by_id(&self, id: &str, include_bookings: bool) -> ApiResult<Venue>;

    async fn create_booking(&self, payload: &BookingPayload) -> ApiResult<Booking>;

    async fn update_booking(&self, id: &str, payload: &BookingPayload) -> ApiResult<Booking>;

    async fn get_booking_by_id(&self, id: &str) -> ApiResult<Booking>;

    async fn delete_booking(&self, id: &str) -> ApiResult<()>;

    async fn get_user_bookings(&self, profile_name: &str) -> ApiResult<Vec<Booking>>;

    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthUser>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct HttpVenueApi {
    config: ClientConfig,
    session: Session,
    api_key: Option<HeaderValue>,
    http: reqwest::Client,
}

impl HttpVenueApi {
    pub fn new(config: ClientConfig, session: Session) -> ApiResult<Self> {
        let api_key = match config.api_key.trim() {
            "" => None,
            key => Some(HeaderValue::from_str(key).map_err(|_| {
                ApiError::Transport(format!("{API_KEY_HEADER} is not a valid header value"))
            })?),
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            config,
            session,
            api_key,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.config.auth_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, url: &str, auth: Auth) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key.clone());
        }

        if auth == Auth::Bearer {
            if let Some(token) = self.session.token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder
    }

    fn venues_request(
        &self,
        query: Option<&str>,
        page: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> RequestBuilder {
        let mut params = vec![
            ("limit", page_size.to_string()),
            ("sortOrder", sort_order.to_string()),
            ("page", page.max(1).to_string()),
        ];
        let path = match query {
            Some(q) => {
                params.push(("q", q.to_string()));
                "/venues/search"
            }
            None => "/venues",
        };
        self.request(Method::GET, &self.api_url(path), Auth::Bearer)
            .query(&params)
    }

    fn venue_request(&self, id: &str, include_bookings: bool) -> RequestBuilder {
        self.request(Method::GET, &self.api_url(&format!("/venues/{id}")), Auth::Bearer)
            .query(&[("_bookings", include_bookings)])
    }

    fn create_booking_request(&self, payload: &BookingPayload) -> RequestBuilder {
        self.request(Method::POST, &self.api_url("/bookings"), Auth::Bearer)
            .json(payload)
    }

    // The venue of an existing booking cannot change, so the body omits it
    fn update_booking_request(&self, id: &str, payload: &BookingPayload) -> RequestBuilder {
        let body = BookingPayload {
            venue_id: None,
            ..payload.clone()
        };
        self.request(Method::PUT, &self.api_url(&format!("/bookings/{id}")), Auth::Bearer)
            .json(&body)
    }

    fn booking_request(&self, method: Method, id: &str) -> RequestBuilder {
        self.request(method, &self.api_url(&format!("/bookings/{id}")), Auth::Bearer)
    }

    fn user_bookings_request(&self, profile_name: &str) -> RequestBuilder {
        self.request(
            Method::GET,
            &self.api_url(&format!("/profiles/{profile_name}/bookings")),
            Auth::Bearer,
        )
        .query(&[("_venue", true)])
    }

    fn login_request(&self, email: &str, password: &str) -> RequestBuilder {
        self.request(Method::POST, &self.auth_url("/login"), Auth::Anonymous)
            .json(&Credentials { email, password })
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<(StatusCode, Bytes)> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ApiError::Transport(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let (status, body) = self.execute(builder).await?;
        let result = decode_response::<T>(status, &body);
        if let Err(error) = &result {
            warn!(status = status.as_u16(), "API call failed: {}", error);
        }
        result.map(|envelope| envelope.data)
    }

    async fn send_page(&self, builder: RequestBuilder) -> ApiResult<VenuePage> {
        let (status, body) = self.execute(builder).await?;
        let envelope = decode_response::<Vec<Venue>>(status, &body).map_err(|error| {
            warn!(status = status.as_u16(), "Venue listing failed: {}", error);
            error
        })?;
        Ok(VenuePage {
            venues: envelope.data,
            meta: envelope.meta,
        })
    }

    async fn send_without_content(&self, builder: RequestBuilder) -> ApiResult<()> {
        let (status, body) = self.execute(builder).await?;
        decode_empty(status, &body).map_err(|error| {
            warn!(status = status.as_u16(), "API call failed: {}", error);
            error
        })
    }
}

// Maps a raw response onto the tagged result shape.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> ApiResult<DataEnvelope<T>> {
    if status.is_success() {
        return serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()));
    }
    Err(decode_failure(status, body))
}

// For endpoints that answer 204 with no body
pub(crate) fn decode_empty(status: StatusCode, body: &[u8]) -> ApiResult<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(decode_failure(status, body))
}

fn decode_failure(status: StatusCode, body: &[u8]) -> ApiError {
    let structured = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .filter(|envelope| !envelope.errors.is_empty());

    match (status, structured) {
        (StatusCode::NOT_FOUND, Some(envelope)) => {
            ApiError::NotFound(first_message(&envelope.errors).to_string())
        }
        (StatusCode::NOT_FOUND, None) => ApiError::NotFound("Resource not found".to_string()),
        (_, Some(envelope)) => ApiError::Api {
            status: status.as_u16(),
            errors: envelope.errors,
        },
        (_, None) => ApiError::Transport(format!("{GENERIC_FAILURE} with status {status}")),
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl VenueApi for HttpVenueApi {
    #[instrument(skip(self))]
    async fn list_venues(
        &self,
        page: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> ApiResult<VenuePage> {
        debug!("Fetching venues page {}", page);
        self.send_page(self.venues_request(None, page, page_size, sort_order))
            .await
    }

    #[instrument(skip(self))]
    async fn search_venues(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
        sort_order: SortOrder,
    ) -> ApiResult<VenuePage> {
        debug!("Searching venues for {:?}, page {}", query, page);
        self.send_page(self.venues_request(Some(query), page, page_size, sort_order))
            .await
    }

    #[instrument(skip(self))]
    async fn get_venue_by_id(&self, id: &str, include_bookings: bool) -> ApiResult<Venue> {
        self.send(self.venue_request(id, include_bookings)).await
    }

    #[instrument(skip(self))]
    async fn create_booking(&self, payload: &BookingPayload) -> ApiResult<Booking> {
        self.send(self.create_booking_request(payload)).await
    }

    #[instrument(skip(self))]
    async fn update_booking(&self, id: &str, payload: &BookingPayload) -> ApiResult<Booking> {
        self.send(self.update_booking_request(id, payload)).await
    }

    #[instrument(skip(self))]
    async fn get_booking_by_id(&self, id: &str) -> ApiResult<Booking> {
        self.send(self.booking_request(Method::GET, id)).await
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: &str) -> ApiResult<()> {
        self.send_without_content(self.booking_request(Method::DELETE, id))
            .await
    }

    #[instrument(skip(self))]
    async fn get_user_bookings(&self, profile_name: &str) -> ApiResult<Vec<Booking>> {
        self.send(self.user_bookings_request(profile_name)).await
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthUser> {
        let user: AuthUser = self.send(self.login_request(email, password)).await?;
        self.session.sign_in(user.clone());
        debug!("Signed in as {}", user.name);
        Ok(user)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reqwest::header::AUTHORIZATION;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tokio_test::{assert_err, assert_ok};

    fn client(session: Session) -> HttpVenueApi {
        let config = ClientConfig {
            base_url: "https://api.example.com/holidaze/".to_string(),
            auth_url: "https://api.example.com/auth".to_string(),
            api_key: "test-key".to_string(),
            ..ClientConfig::default()
        };
        HttpVenueApi::new(config, session).unwrap()
    }

    fn payload() -> BookingPayload {
        BookingPayload {
            venue_id: Some("v1".to_string()),
            date_from: NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            guests: 2,
        }
    }

    fn json_body(request: &reqwest::Request) -> Value {
        let bytes = request.body().and_then(|body| body.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    // Answers exactly one request with a canned response and hands back the
    // raw request text.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn local_client(url: &str, session: Session) -> HttpVenueApi {
        let config = ClientConfig {
            base_url: url.to_string(),
            auth_url: url.to_string(),
            api_key: "test-key".to_string(),
            ..ClientConfig::default()
        };
        HttpVenueApi {
            config,
            session,
            api_key: Some(HeaderValue::from_static("test-key")),
            http: reqwest::Client::builder()
                .no_proxy()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .unwrap(),
        }
    }

    #[test]
    fn test_search_request_shape() {
        let api = client(Session::with_token("tok"));
        let request = api
            .venues_request(Some("beach house"), 2, 12, SortOrder::Desc)
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/holidaze/venues/search?limit=12&sortOrder=desc&page=2&q=beach+house"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert_eq!(request.headers()[API_KEY_HEADER], "test-key");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_listing_request_is_one_indexed() {
        let api = client(Session::new());
        let request = api
            .venues_request(None, 0, 12, SortOrder::Asc)
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/holidaze/venues?limit=12&sortOrder=asc&page=1"
        );
        // No token, no bearer header
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_anonymous_request_omits_bearer() {
        let api = client(Session::with_token("tok"));
        let request = api
            .request(Method::POST, &api.auth_url("/login"), Auth::Anonymous)
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.example.com/auth/login");
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers()[API_KEY_HEADER], "test-key");
    }

    #[test]
    fn test_token_updates_are_seen_by_next_request() {
        let session = Session::new();
        let api = client(session.clone());
        session.set_token(Some("fresh".to_string()));
        let request = api
            .request(Method::GET, &api.api_url("/bookings/b1"), Auth::Bearer)
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer fresh");
    }

    #[test]
    fn test_venue_request_bookings_flag() {
        let api = client(Session::with_token("tok"));
        let request = api.venue_request("v1", true).build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/holidaze/venues/v1?_bookings=true"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");

        let request = api.venue_request("v1", false).build().unwrap();
        assert_eq!(request.url().query(), Some("_bookings=false"));
    }

    #[test]
    fn test_create_booking_request_carries_venue() {
        let api = client(Session::with_token("tok"));
        let request = api.create_booking_request(&payload()).build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "https://api.example.com/holidaze/bookings");
        assert_eq!(
            json_body(&request),
            json!({"venueId": "v1", "dateFrom": "2024-06-06", "dateTo": "2024-06-08", "guests": 2})
        );
    }

    #[test]
    fn test_update_booking_request_omits_venue() {
        let api = client(Session::with_token("tok"));
        let request = api.update_booking_request("b1", &payload()).build().unwrap();
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.url().as_str(), "https://api.example.com/holidaze/bookings/b1");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert_eq!(
            json_body(&request),
            json!({"dateFrom": "2024-06-06", "dateTo": "2024-06-08", "guests": 2})
        );
    }

    #[test]
    fn test_booking_and_profile_request_paths() {
        let api = client(Session::with_token("tok"));
        let request = api.booking_request(Method::DELETE, "b1").build().unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.url().as_str(), "https://api.example.com/holidaze/bookings/b1");

        let request = api.user_bookings_request("kari").build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/holidaze/profiles/kari/bookings?_venue=true"
        );
    }

    #[test]
    fn test_login_request_is_anonymous() {
        let api = client(Session::with_token("stale"));
        let request = api.login_request("kari@stud.noroff.no", "secret").build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "https://api.example.com/auth/login");
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers()[API_KEY_HEADER], "test-key");
        assert_eq!(
            json_body(&request),
            json!({"email": "kari@stud.noroff.no", "password": "secret"})
        );
    }

    #[test]
    fn test_invalid_api_key_is_rejected_up_front() {
        let config = ClientConfig {
            api_key: "bad\nkey".to_string(),
            ..ClientConfig::default()
        };
        let error = assert_err!(HttpVenueApi::new(config, Session::new()));
        assert!(matches!(error, ApiError::Transport(_)));
    }

    #[test]
    fn test_missing_api_key_sends_no_header() {
        let api = HttpVenueApi::new(ClientConfig::default(), Session::new()).unwrap();
        let request = api.venue_request("v1", true).build().unwrap();
        assert!(request.headers().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_decode_empty_response() {
        assert_ok!(decode_empty(StatusCode::NO_CONTENT, b""));
        let error = assert_err!(decode_empty(
            StatusCode::NOT_FOUND,
            br#"{"errors":[{"message":"No booking with such ID"}]}"#
        ));
        assert_eq!(error, ApiError::NotFound("No booking with such ID".to_string()));
        let error = assert_err!(decode_empty(StatusCode::UNAUTHORIZED, b""));
        assert!(matches!(error, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_login_signs_in_session() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"data":{"name":"kari","email":"kari@stud.noroff.no","accessToken":"tok-1","venueManager":true}}"#,
        )
        .await;
        let session = Session::new();
        let api = local_client(&url, session.clone());

        let user = assert_ok!(api.login("kari@stud.noroff.no", "secret").await);
        assert_eq!(user.name, "kari");
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(session.is_authenticated());
        assert!(session.is_venue_manager());

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("post /login "));
        assert!(request.contains("x-noroff-api-key: test-key"));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_signed_out() {
        let (url, server) = serve_once(
            "401 Unauthorized",
            r#"{"errors":[{"message":"Invalid email or password"}]}"#,
        )
        .await;
        let session = Session::new();
        let api = local_client(&url, session.clone());

        let error = assert_err!(api.login("kari@stud.noroff.no", "wrong").await);
        assert_eq!(error.display_message(), "Invalid email or password");
        assert!(session.token().is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_booking_accepts_no_content() {
        let (url, server) = serve_once("204 No Content", "").await;
        let api = local_client(&url, Session::with_token("tok"));

        assert_ok!(api.delete_booking("b1").await);
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("delete /bookings/b1 "));
        assert!(request.contains("authorization: bearer tok"));
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{"data":[{"id":"v1","name":"Cabin","maxGuests":2}],"meta":{"isLastPage":true,"currentPage":1}}"#;
        let envelope = assert_ok!(decode_response::<Vec<Venue>>(StatusCode::OK, body));
        assert_eq!(envelope.data.len(), 1);
        assert!(envelope.meta.unwrap().is_last_page);
    }

    #[test]
    fn test_decode_structured_error() {
        let body = br#"{"errors":[{"message":"Guests exceed the venue capacity"},{"message":"second"}]}"#;
        let error = assert_err!(decode_response::<Booking>(StatusCode::BAD_REQUEST, body));
        assert_eq!(error.display_message(), "Guests exceed the venue capacity");
        assert_eq!(error.details().len(), 2);
        assert!(matches!(error, ApiError::Api { status: 400, .. }));
    }

    #[test]
    fn test_decode_unstructured_failure_is_generic() {
        let error = assert_err!(decode_response::<Booking>(
            StatusCode::BAD_GATEWAY,
            b"<html>bad gateway</html>"
        ));
        assert!(matches!(error, ApiError::Transport(_)));
        assert_eq!(error.display_message(), GENERIC_FAILURE);
        assert_eq!(error.details(), vec![ErrorDetail::new(GENERIC_FAILURE)]);
    }

    #[test]
    fn test_decode_not_found() {
        let error = assert_err!(decode_response::<Venue>(
            StatusCode::NOT_FOUND,
            br#"{"errors":[{"message":"No venue with such ID"}]}"#
        ));
        assert!(error.is_not_found());
        assert_eq!(error.display_message(), "No venue with such ID");

        let error = assert_err!(decode_response::<Venue>(StatusCode::NOT_FOUND, b""));
        assert!(error.is_not_found());
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let error = assert_err!(decode_response::<Venue>(StatusCode::OK, b"{\"data\":"));
        assert!(matches!(error, ApiError::Decode(_)));
        assert_eq!(error.display_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: Some(500),
            ..ClientConfig::default()
        };
        let api = HttpVenueApi::new(config, Session::new()).unwrap();
        let error = assert_err!(api.get_booking_by_id("b1").await);
        assert!(matches!(error, ApiError::Transport(_)));
    }
}
