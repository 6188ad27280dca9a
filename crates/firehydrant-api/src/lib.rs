//! FireHydrant API client and data models.
//!
//! Provides typed request/response structures for services, environments,
//! functionalities, teams and severities, plus an asynchronous client that
//! sends them. Service searches encode their label filter through
//! [`firehydrant_core::labels::LabelsSelector`], so the `labels` parameter is
//! identical for identical filters.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{FireHydrantClient, FireHydrantClientBuilder};
pub use firehydrant_core::{Error, LabelsSelector};
pub use models::{
    Actor, CreateEnvironmentRequest, CreateFunctionalityRequest, CreateServiceRequest,
    CreateSeverityRequest, CreateTeamRequest, EnvironmentResponse, FunctionalityExternalResource,
    FunctionalityResponse, FunctionalityService, PingResponse, ServiceFunctionality, ServiceLink,
    ServiceQuery, ServiceResponse, ServiceTeam, ServicesResponse, SeverityResponse, TeamResponse,
    UpdateEnvironmentRequest, UpdateFunctionalityRequest, UpdateServiceRequest,
    UpdateSeverityRequest, UpdateTeamRequest,
};

/// Convenient result alias that reuses the shared FireHydrant error type.
pub type Result<T> = firehydrant_core::Result<T>;
