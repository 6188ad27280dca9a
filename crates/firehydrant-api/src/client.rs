//! Asynchronous FireHydrant client implementation.

use crate::models::{
    CreateEnvironmentRequest, CreateFunctionalityRequest, CreateServiceRequest,
    CreateSeverityRequest, CreateTeamRequest, EnvironmentResponse, FunctionalityResponse,
    PingResponse, ServiceQuery, ServiceResponse, ServicesResponse, SeverityResponse, TeamResponse,
    UpdateEnvironmentRequest, UpdateFunctionalityRequest, UpdateServiceRequest,
    UpdateSeverityRequest, UpdateTeamRequest,
};
use crate::Result;
use firehydrant_core::config::FireHydrantConfig;
use firehydrant_core::id::{EnvironmentId, FunctionalityId, ServiceId, TeamId};
use firehydrant_core::query::QueryParams;
use firehydrant_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("firehydrant-api/", env!("CARGO_PKG_VERSION"));

/// Builder for [`FireHydrantClient`].
#[derive(Debug, Clone)]
pub struct FireHydrantClientBuilder {
    config: FireHydrantConfig,
}

impl FireHydrantClientBuilder {
    /// Create a builder from a [`FireHydrantConfig`].
    #[must_use]
    pub fn new(config: FireHydrantConfig) -> Self {
        Self { config }
    }

    /// Set the API token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config = self.config.with_api_key(api_key);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config = self.config.with_timeout(seconds);
        self
    }

    /// Finalise the builder and create the [`FireHydrantClient`].
    pub fn build(self) -> Result<FireHydrantClient> {
        let base_url = self.config.parse_api_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self.config.expose_api_key() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::ConfigError("API key contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            warn!("FireHydrant client built without an API key");
        }

        let user_agent = self.config.user_agent.as_deref().unwrap_or(USER_AGENT);

        let http = ClientBuilder::new()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(self.config.timeout())
            .build()
            .map_err(|err| {
                Error::ConfigError(format!("Failed to build FireHydrant HTTP client: {err}"))
            })?;

        Ok(FireHydrantClient { http, base_url })
    }
}

/// Asynchronous client for the FireHydrant v1 REST API.
#[derive(Debug, Clone)]
pub struct FireHydrantClient {
    http: Client,
    base_url: Url,
}

impl FireHydrantClient {
    /// Construct a client for `api_url` authenticating with `api_key`.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let config = FireHydrantConfig::new(api_url)?.with_api_key(api_key);
        FireHydrantClientBuilder::new(config).build()
    }

    /// Construct a client directly from the configuration.
    pub fn from_config(config: &FireHydrantConfig) -> Result<Self> {
        FireHydrantClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: FireHydrantConfig) -> FireHydrantClientBuilder {
        FireHydrantClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Identify the actor behind the configured token.
    pub async fn ping(&self) -> Result<PingResponse> {
        self.get_json("ping", &QueryParams::new()).await
    }

    /// Search services.
    pub async fn list_services(&self, query: &ServiceQuery) -> Result<Vec<ServiceResponse>> {
        let response: ServicesResponse = self.get_json("services", &query.to_params()).await?;
        Ok(response.services)
    }

    /// Fetch a service by ID.
    pub async fn get_service(&self, id: ServiceId) -> Result<ServiceResponse> {
        self.get_json(&format!("services/{id}"), &QueryParams::new())
            .await
    }

    /// Create a service.
    pub async fn create_service(&self, request: &CreateServiceRequest) -> Result<ServiceResponse> {
        self.send_json(Method::POST, "services", request).await
    }

    /// Update a service.
    pub async fn update_service(
        &self,
        id: ServiceId,
        request: &UpdateServiceRequest,
    ) -> Result<ServiceResponse> {
        self.send_json(Method::PATCH, &format!("services/{id}"), request)
            .await
    }

    /// Delete a service.
    pub async fn delete_service(&self, id: ServiceId) -> Result<()> {
        self.delete(&format!("services/{id}")).await
    }

    /// Fetch an environment by ID.
    pub async fn get_environment(&self, id: EnvironmentId) -> Result<EnvironmentResponse> {
        self.get_json(&format!("environments/{id}"), &QueryParams::new())
            .await
    }

    /// Create an environment.
    pub async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> Result<EnvironmentResponse> {
        self.send_json(Method::POST, "environments", request).await
    }

    /// Update an environment.
    pub async fn update_environment(
        &self,
        id: EnvironmentId,
        request: &UpdateEnvironmentRequest,
    ) -> Result<EnvironmentResponse> {
        self.send_json(Method::PATCH, &format!("environments/{id}"), request)
            .await
    }

    /// Delete an environment.
    pub async fn delete_environment(&self, id: EnvironmentId) -> Result<()> {
        self.delete(&format!("environments/{id}")).await
    }

    /// Fetch a functionality by ID.
    pub async fn get_functionality(&self, id: FunctionalityId) -> Result<FunctionalityResponse> {
        self.get_json(&format!("functionalities/{id}"), &QueryParams::new())
            .await
    }

    /// Create a functionality.
    pub async fn create_functionality(
        &self,
        request: &CreateFunctionalityRequest,
    ) -> Result<FunctionalityResponse> {
        self.send_json(Method::POST, "functionalities", request)
            .await
    }

    /// Update a functionality.
    pub async fn update_functionality(
        &self,
        id: FunctionalityId,
        request: &UpdateFunctionalityRequest,
    ) -> Result<FunctionalityResponse> {
        self.send_json(Method::PATCH, &format!("functionalities/{id}"), request)
            .await
    }

    /// Delete a functionality.
    pub async fn delete_functionality(&self, id: FunctionalityId) -> Result<()> {
        self.delete(&format!("functionalities/{id}")).await
    }

    /// Fetch a team by ID.
    pub async fn get_team(&self, id: TeamId) -> Result<TeamResponse> {
        self.get_json(&format!("teams/{id}"), &QueryParams::new())
            .await
    }

    /// Create a team.
    pub async fn create_team(&self, request: &CreateTeamRequest) -> Result<TeamResponse> {
        self.send_json(Method::POST, "teams", request).await
    }

    /// Update a team.
    pub async fn update_team(&self, id: TeamId, request: &UpdateTeamRequest) -> Result<TeamResponse> {
        self.send_json(Method::PATCH, &format!("teams/{id}"), request)
            .await
    }

    /// Delete a team.
    pub async fn delete_team(&self, id: TeamId) -> Result<()> {
        self.delete(&format!("teams/{id}")).await
    }

    /// Fetch a severity by slug.
    pub async fn get_severity(&self, slug: &str) -> Result<SeverityResponse> {
        let path = severity_path(slug)?;
        self.get_json(&path, &QueryParams::new()).await
    }

    /// Create a severity.
    pub async fn create_severity(&self, request: &CreateSeverityRequest) -> Result<SeverityResponse> {
        self.send_json(Method::POST, "severities", request).await
    }

    /// Update a severity.
    pub async fn update_severity(
        &self,
        slug: &str,
        request: &UpdateSeverityRequest,
    ) -> Result<SeverityResponse> {
        let path = severity_path(slug)?;
        self.send_json(Method::PATCH, &path, request).await
    }

    /// Delete a severity.
    pub async fn delete_severity(&self, slug: &str) -> Result<()> {
        let path = severity_path(slug)?;
        self.delete(&path).await
    }

    fn build_url(&self, path: &str, params: &QueryParams) -> Result<Url> {
        let mut url = self.base_url.join(path).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid FireHydrant path `{path}`: {err}"))
        })?;
        params.append_to(&mut url);
        Ok(url)
    }

    async fn get_json<R>(&self, path: &str, params: &QueryParams) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.build_url(path, params)?;
        debug!(path = %path, params = ?params.pairs(), "Sending FireHydrant request");
        let response = self.execute(self.http.get(url), path).await?;
        parse_json(response, path).await
    }

    async fn send_json<B, R>(&self, method: Method, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path, &QueryParams::new())?;
        debug!(method = %method, path = %path, "Sending FireHydrant request");
        let response = self
            .execute(self.http.request(method, url).json(body), path)
            .await?;
        parse_json(response, path).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path, &QueryParams::new())?;
        debug!(method = "DELETE", path = %path, "Sending FireHydrant request");
        self.execute(self.http.delete(url), path).await.map(|_| ())
    }

    async fn execute(&self, request: reqwest::RequestBuilder, path: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(path = %path, %status, "FireHydrant request failed");
        Err(map_status_to_error(status, text))
    }
}

fn severity_path(slug: &str) -> Result<String> {
    if slug.is_empty() {
        return Err(Error::InvalidRequest("severity slug must not be empty".into()));
    }
    let mut url = Url::parse("http://placeholder/severities/")?;
    url.path_segments_mut()
        .map_err(|()| Error::InternalError("cannot build severity path".into()))?
        .pop_if_empty()
        .push(slug);
    Ok(url.path().trim_start_matches('/').to_string())
}

async fn parse_json<R>(response: Response, path: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        Error::ParseError(format!(
            "Failed to parse FireHydrant response for `{path}`: {err}"
        ))
    })
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(text),
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::UNPROCESSABLE_ENTITY => Error::UnprocessableEntity(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("FireHydrant temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("FireHydrant server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("FireHydrant error {status}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SERVICE_ID: &str = "5a8d8bd6-0c3a-4dc4-9a18-3b2ff3d5b5d1";

    fn test_client(server: &MockServer) -> FireHydrantClient {
        FireHydrantClient::new(server.uri(), "fhb-test-token").unwrap()
    }

    fn service_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "service_tier": 2,
            "slug": name,
            "created_at": "2021-03-01T12:00:00Z",
            "updated_at": "2021-03-02T12:00:00Z",
            "labels": { "env": "prod", "team": "sre" }
        })
    }

    #[tokio::test]
    async fn ping_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer fhb-test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "actor": {
                    "id": "bot-1",
                    "name": "Terraform",
                    "email": "",
                    "type": "firehydrant_bot"
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ping = client.ping().await.unwrap();
        assert_eq!(ping.actor.name, "Terraform");
        assert_eq!(ping.actor.actor_type, "firehydrant_bot");
    }

    #[tokio::test]
    async fn list_services_sends_canonical_labels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .and(query_param("query", "outage"))
            .and(query_param("service_tier", "2"))
            .and(query_param("labels", "env=prod,team=sre"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [service_json(SERVICE_ID, "checkout")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = ServiceQuery::new()
            .with_query("outage")
            .with_service_tier(2)
            .with_label("team", "sre")
            .with_label("env", "prod");

        let services = client.list_services(&query).await.unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].labels.get("team"), Some("sre"));
    }

    #[tokio::test]
    async fn list_services_omits_empty_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .and(query_param_is_missing("query"))
            .and(query_param_is_missing("service_tier"))
            .and(query_param_is_missing("labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let services = client.list_services(&ServiceQuery::new()).await.unwrap();
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn get_service_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/services/{SERVICE_ID}").as_str()))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let id = ServiceId::parse_str(SERVICE_ID).unwrap();
        let err = client.get_service(id).await.unwrap_err();
        assert_eq!(err, Error::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn create_service_posts_labels_as_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services"))
            .and(body_json(json!({
                "name": "checkout",
                "description": "Payments",
                "labels": { "env": "prod", "team": "sre" }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(service_json(SERVICE_ID, "checkout")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = CreateServiceRequest {
            description: "Payments".into(),
            labels: [("team", "sre"), ("env", "prod")].into_iter().collect(),
            ..CreateServiceRequest::new("checkout")
        };

        let service = client.create_service(&request).await.unwrap();
        assert_eq!(service.id.to_string(), SERVICE_ID);
    }

    #[tokio::test]
    async fn update_service_patches_changes_only() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/services/{SERVICE_ID}").as_str()))
            .and(body_json(json!({ "service_tier": 1 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(service_json(SERVICE_ID, "checkout")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = UpdateServiceRequest {
            service_tier: Some(1),
            ..UpdateServiceRequest::default()
        };
        let id = ServiceId::parse_str(SERVICE_ID).unwrap();
        client.update_service(id, &request).await.unwrap();
    }

    #[tokio::test]
    async fn delete_team_handles_no_content() {
        let server = MockServer::start().await;
        let id = TeamId::new_v4();

        Mock::given(method("DELETE"))
            .and(path(format!("/teams/{id}").as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_team(id).await.unwrap();
    }

    #[tokio::test]
    async fn create_environment_returns_environment() {
        let server = MockServer::start().await;
        let id = EnvironmentId::new_v4();

        Mock::given(method("POST"))
            .and(path("/environments"))
            .and(body_json(json!({ "name": "Production", "description": "" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": id,
                "name": "Production",
                "description": "",
                "slug": "production",
                "created_at": "2021-03-01T12:00:00Z",
                "updated_at": "2021-03-01T12:00:00Z"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = CreateEnvironmentRequest {
            name: "Production".into(),
            description: String::new(),
        };
        let environment = client.create_environment(&request).await.unwrap();
        assert_eq!(environment.id, id);
        assert_eq!(environment.slug, "production");
    }

    #[tokio::test]
    async fn get_severity_escapes_slug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/severities/SEV%201"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "slug": "SEV 1",
                "description": "Critical"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let severity = client.get_severity("SEV 1").await.unwrap();
        assert_eq!(severity.description, "Critical");
    }

    #[tokio::test]
    async fn get_severity_rejects_empty_slug() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let err = client.get_severity("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn unprocessable_entity_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(422).set_body_string("name taken"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = CreateTeamRequest {
            name: "SRE".into(),
            ..CreateTeamRequest::default()
        };
        let err = client.create_team(&request).await.unwrap_err();
        assert_eq!(err, Error::UnprocessableEntity("name taken".to_string()));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = FireHydrantClient::new("https://fh.example.com/v1", "token").unwrap();
        assert_eq!(client.base_url().as_str(), "https://fh.example.com/v1/");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, "no".into()),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::CONFLICT, "dup".into()),
            Error::Conflict(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::IM_A_TEAPOT, "tea".into()),
            Error::HttpError(_)
        ));
    }
}
