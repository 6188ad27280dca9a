//! FireHydrant request and response models.
//!
//! Field names follow the JSON wire format of the v1 REST API. Optional
//! request fields are skipped when unset so PATCH payloads only carry what
//! the caller changed.

use chrono::{DateTime, Utc};
use firehydrant_core::id::{EnvironmentId, FunctionalityId, ServiceId, TeamId};
use firehydrant_core::labels::LabelsSelector;
use firehydrant_core::query::{EncodedParameters, QueryParams};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Deserialize a label map, treating `null` as empty and stringifying scalar values.
pub fn deserialize_labels<'de, D>(deserializer: D) -> Result<LabelsSelector, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value_to_string(value).map(|v| (key, v)))
        .collect())
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize a possibly-`null` string as an empty string.
fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a possibly-`null` array as an empty vector.
fn deserialize_nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The principal (user or bot) that owns the API token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// Actor identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address, empty for bots.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub email: String,
    /// Actor kind, e.g. `firehydrant_user` or `firehydrant_bot`.
    #[serde(rename = "type")]
    pub actor_type: String,
}

/// Response from `GET /ping`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingResponse {
    /// Identity behind the token used for the request.
    pub actor: Actor,
}

/// Team attached to a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServiceTeam {
    /// Team ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TeamId>,
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Service tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<i32>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceTeam {
    /// Reference an existing team by ID.
    #[must_use]
    pub fn with_id(id: TeamId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Link shown on a service page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLink {
    /// Link label.
    pub name: String,
    /// Link ID, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Target URL.
    pub href_url: String,
    /// Icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Functionality attached to a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServiceFunctionality {
    /// Summary shown in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Functionality ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FunctionalityId>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Linked external resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_resources: Option<Vec<FunctionalityExternalResource>>,
    /// Services providing this functionality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<FunctionalityService>>,
}

impl ServiceFunctionality {
    /// Reference an existing functionality by ID.
    #[must_use]
    pub fn with_id(id: FunctionalityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Known representation of a service in a system outside FireHydrant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FunctionalityExternalResource {
    /// Integration type, e.g. `pager_duty`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// Connection display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,
    /// Connection ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    /// ID in the remote system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    /// URL in the remote system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request payload for `POST /services`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CreateServiceRequest {
    /// Service name.
    pub name: String,
    /// Description, sent even when empty.
    #[serde(default)]
    pub description: String,
    /// Service tier (1 is most critical).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<i32>,
    /// Functionalities provided by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functionalities: Option<Vec<ServiceFunctionality>>,
    /// Labels.
    #[serde(default, skip_serializing_if = "LabelsSelector::is_empty")]
    pub labels: LabelsSelector,
    /// Page the owning team when the service is added to an incident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_add: Option<bool>,
    /// Owning teams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<ServiceTeam>>,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ServiceLink>>,
}

impl CreateServiceRequest {
    /// Start a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Request payload for `PATCH /services/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UpdateServiceRequest {
    /// Service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Service tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<i32>,
    /// Labels; replaces the full label set when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelsSelector>,
    /// Functionalities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functionalities: Option<Vec<ServiceFunctionality>>,
    /// Teams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<ServiceTeam>>,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ServiceLink>>,
    /// Alert on add flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_add: Option<bool>,
}

/// Service as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    /// Service ID.
    pub id: ServiceId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    /// Service tier.
    #[serde(default)]
    pub service_tier: i32,
    /// Slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Labels.
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: LabelsSelector,
    /// Functionalities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functionalities: Option<Vec<ServiceFunctionality>>,
    /// Owning teams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<ServiceTeam>>,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<ServiceLink>>,
    /// Integration that manages this service, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by: Option<String>,
    /// Settings for the managing integration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_by_settings: Option<String>,
    /// Last import identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_import: Option<String>,
    /// IDs of open incidents affecting the service.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable_vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub active_incidents: Vec<String>,
    /// Alert on add flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_add: Option<bool>,
}

/// Response from `GET /services`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicesResponse {
    /// Matching services.
    #[serde(rename = "data")]
    pub services: Vec<ServiceResponse>,
}

/// Search filters for `GET /services`.
///
/// Unset fields (empty text, tier `0`, no labels) are left out of the
/// request. Negative tiers are sent as-is; the API decides what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceQuery {
    /// Free-text search.
    pub query: String,
    /// Service tier filter.
    pub service_tier: i32,
    /// Label filter, sent as a single `labels` parameter.
    pub labels: LabelsSelector,
}

impl ServiceQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by free text.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Filter by service tier.
    #[must_use]
    pub const fn with_service_tier(mut self, tier: i32) -> Self {
        self.service_tier = tier;
        self
    }

    /// Require a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Replace the label filter.
    #[must_use]
    pub fn with_labels(mut self, labels: LabelsSelector) -> Self {
        self.labels = labels;
        self
    }

    /// Build the query parameters.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_non_empty("query", &self.query);
        params.push_non_zero("service_tier", self.service_tier);
        params.push_encoded("labels", &self.labels);
        params
    }

    /// Convert the query into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> EncodedParameters {
        self.to_params().into_pairs()
    }
}

/// Environment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentResponse {
    /// Environment ID.
    pub id: EnvironmentId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    /// Slug.
    pub slug: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request payload for `POST /environments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CreateEnvironmentRequest {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Request payload for `PATCH /environments/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UpdateEnvironmentRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Service reference used inside functionality payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FunctionalityService {
    /// Service ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ServiceId>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Service tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<i32>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Labels.
    #[serde(
        default,
        deserialize_with = "deserialize_labels",
        skip_serializing_if = "LabelsSelector::is_empty"
    )]
    pub labels: LabelsSelector,
}

impl FunctionalityService {
    /// Reference an existing service by ID.
    #[must_use]
    pub fn with_id(id: ServiceId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Functionality as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionalityResponse {
    /// Functionality ID.
    pub id: FunctionalityId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    /// Slug.
    pub slug: String,
    /// Services providing this functionality.
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub services: Vec<ServiceResponse>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request payload for `POST /functionalities`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CreateFunctionalityRequest {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Services providing the functionality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<FunctionalityService>,
}

/// Request payload for `PATCH /functionalities/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UpdateFunctionalityRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Services providing the functionality.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<FunctionalityService>,
}

/// Team as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamResponse {
    /// Team ID.
    pub id: TeamId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
    /// Slug.
    pub slug: String,
    /// Services owned by the team.
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub services: Vec<ServiceResponse>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request payload for `POST /teams`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CreateTeamRequest {
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Services owned by the team.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<ServiceId>,
}

/// Request payload for `PATCH /teams/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UpdateTeamRequest {
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Services owned by the team.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<ServiceId>,
}

/// Severity as returned by the API. Severities are keyed by slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityResponse {
    /// Slug, e.g. `SEV1`.
    pub slug: String,
    /// Description.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
}

/// Request payload for `POST /severities`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CreateSeverityRequest {
    /// Slug.
    pub slug: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Request payload for `PATCH /severities/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UpdateSeverityRequest {
    /// Slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_query_omits_unset_fields() {
        let query = ServiceQuery::new();
        assert!(query.to_pairs().is_empty());
    }

    #[test]
    fn service_query_omits_empty_text_and_zero_tier() {
        let query = ServiceQuery::new()
            .with_query("")
            .with_service_tier(0)
            .with_label("team", "sre");

        assert_eq!(query.to_pairs(), vec![("labels", "team=sre".to_string())]);
    }

    #[test]
    fn service_query_composes_all_fields() {
        let query = ServiceQuery::new()
            .with_query("outage")
            .with_service_tier(2)
            .with_label("team", "sre")
            .with_label("env", "prod");

        assert_eq!(
            query.to_pairs(),
            vec![
                ("query", "outage".to_string()),
                ("service_tier", "2".to_string()),
                ("labels", "env=prod,team=sre".to_string()),
            ]
        );
    }

    #[test]
    fn service_query_passes_negative_tier_through() {
        let query = ServiceQuery::new().with_service_tier(-3);
        assert_eq!(query.to_pairs(), vec![("service_tier", "-3".to_string())]);
    }

    #[test]
    fn service_query_output_is_stable_across_label_order() {
        let a = ServiceQuery::new().with_labels(
            [("c", "3"), ("a", "1"), ("b", "2")].into_iter().collect(),
        );
        let b = ServiceQuery::new().with_labels(
            [("b", "2"), ("c", "3"), ("a", "1")].into_iter().collect(),
        );

        assert_eq!(a.to_pairs(), b.to_pairs());
        assert_eq!(a.to_pairs(), vec![("labels", "a=1,b=2,c=3".to_string())]);
    }

    #[test]
    fn create_service_request_skips_unset_optionals() {
        let request = CreateServiceRequest::new("checkout");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "name": "checkout", "description": "" }));
    }

    #[test]
    fn create_service_request_serializes_labels_as_object() {
        let team = TeamId::new_v4();
        let request = CreateServiceRequest {
            service_tier: Some(1),
            labels: [("env", "prod")].into_iter().collect(),
            teams: Some(vec![ServiceTeam::with_id(team)]),
            ..CreateServiceRequest::new("checkout")
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["service_tier"], json!(1));
        assert_eq!(value["labels"], json!({ "env": "prod" }));
        assert_eq!(value["teams"], json!([{ "id": team.to_string() }]));
    }

    #[test]
    fn update_service_request_only_sends_changes() {
        let request = UpdateServiceRequest {
            description: Some("Handles payments".into()),
            ..UpdateServiceRequest::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "description": "Handles payments" }));
    }

    #[test]
    fn service_response_tolerates_null_labels_and_description() {
        let value = json!({
            "id": "5a8d8bd6-0c3a-4dc4-9a18-3b2ff3d5b5d1",
            "name": "checkout",
            "description": null,
            "service_tier": 1,
            "slug": "checkout",
            "created_at": "2021-03-01T12:00:00Z",
            "updated_at": "2021-03-02T12:00:00Z",
            "labels": null
        });

        let service: ServiceResponse = serde_json::from_value(value).unwrap();
        assert!(service.labels.is_empty());
        assert_eq!(service.description, "");
        assert!(service.active_incidents.is_empty());
    }

    #[test]
    fn service_response_stringifies_scalar_label_values() {
        let value = json!({
            "id": "5a8d8bd6-0c3a-4dc4-9a18-3b2ff3d5b5d1",
            "name": "checkout",
            "description": "",
            "service_tier": 1,
            "slug": "checkout",
            "created_at": "2021-03-01T12:00:00Z",
            "updated_at": "2021-03-02T12:00:00Z",
            "labels": { "pci": true, "replicas": 3, "owner": "payments", "extra": null }
        });

        let service: ServiceResponse = serde_json::from_value(value).unwrap();
        assert_eq!(service.labels.encode(), "owner=payments,pci=true,replicas=3");
    }

    #[test]
    fn null_arrays_deserialize_as_empty() {
        let service: ServiceResponse = serde_json::from_value(json!({
            "id": "5a8d8bd6-0c3a-4dc4-9a18-3b2ff3d5b5d1",
            "name": "checkout",
            "description": "",
            "service_tier": 1,
            "slug": "checkout",
            "created_at": "2021-03-01T12:00:00Z",
            "updated_at": "2021-03-02T12:00:00Z",
            "labels": {},
            "active_incidents": null
        }))
        .unwrap();
        assert!(service.active_incidents.is_empty());

        let team: TeamResponse = serde_json::from_value(json!({
            "id": "8c0d3a2e-4f1b-4b8a-9d6e-2b7f5c1a0e33",
            "name": "Payments",
            "description": "",
            "slug": "payments",
            "services": null,
            "created_at": "2020-11-05T09:00:00Z",
            "updated_at": "2021-01-10T10:00:00Z"
        }))
        .unwrap();
        assert!(team.services.is_empty());

        let functionality: FunctionalityResponse = serde_json::from_value(json!({
            "id": "0f5b1a57-6d2e-4c3b-8a45-1f3c1c2e9a11",
            "name": "Card processing",
            "description": "",
            "slug": "card-processing",
            "services": null,
            "created_at": "2021-03-01T12:00:00Z",
            "updated_at": "2021-03-01T12:00:00Z"
        }))
        .unwrap();
        assert!(functionality.services.is_empty());
    }

    #[test]
    fn create_team_request_serializes_service_ids() {
        let service = ServiceId::new_v4();
        let request = CreateTeamRequest {
            name: "SRE".into(),
            description: "Site reliability".into(),
            service_ids: vec![service],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["service_ids"], json!([service.to_string()]));
    }

    #[test]
    fn actor_type_uses_wire_name() {
        let actor: Actor = serde_json::from_value(json!({
            "id": "bot-1",
            "name": "Terraform",
            "email": null,
            "type": "firehydrant_bot"
        }))
        .unwrap();
        assert_eq!(actor.actor_type, "firehydrant_bot");
        assert_eq!(actor.email, "");
    }
}
