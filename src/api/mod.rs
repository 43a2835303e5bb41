//! REST collaborator: request/response types, the pluggable [`Transport`],
//! and the typed [`ApiClient`] used by wizards (submit) and listings (fetch).

pub mod envelope;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Client, ClientDraft, Issue, IssueDraft, Project, ProjectDraft};
use crate::errors::ApiError;

pub use envelope::{ApiEnvelope, ListPayload, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves requests to a backend and returns its raw response.
///
/// Implementations own connection concerns (timeouts, retries); the client
/// layer only interprets status codes and envelopes.
pub trait Transport {
    fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// A record type exposed under a REST collection path.
pub trait Resource: DeserializeOwned {
    type Draft: Serialize + DeserializeOwned;

    /// Collection path, e.g. `/clients`.
    const PATH: &'static str;
    /// Singular display name used in messages.
    const KIND: &'static str;
}

impl Resource for Client {
    type Draft = ClientDraft;
    const PATH: &'static str = "/clients";
    const KIND: &'static str = "Client";
}

impl Resource for Project {
    type Draft = ProjectDraft;
    const PATH: &'static str = "/projects";
    const KIND: &'static str = "Project";
}

impl Resource for Issue {
    type Draft = IssueDraft;
    const PATH: &'static str = "/issues";
    const KIND: &'static str = "Issue";
}

/// Receives the payload assembled by a wizard.
pub trait SubmitCollaborator<P> {
    type Response;

    fn submit(&mut self, payload: &P) -> Result<Self::Response, ApiError>;
}

/// Supplies the raw collection rendered by a listing.
pub trait DataSource<T> {
    fn fetch(&mut self) -> Result<Vec<T>, ApiError>;
}

/// Create-or-update payload produced by the entity wizards.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<D> {
    /// `None` creates a new record, `Some(id)` replaces an existing one.
    pub target: Option<Uuid>,
    pub draft: D,
}

impl<D> Mutation<D> {
    pub fn create(draft: D) -> Self {
        Self {
            target: None,
            draft,
        }
    }

    pub fn update(id: Uuid, draft: D) -> Self {
        Self {
            target: Some(id),
            draft,
        }
    }
}

/// Typed CRUD client over any [`Transport`].
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Borrows the client as the submit collaborator for `R` wizards.
    pub fn writer<R: Resource>(&mut self) -> ResourceWriter<'_, T, R> {
        ResourceWriter {
            client: self,
            _resource: PhantomData,
        }
    }

    pub fn list<R: Resource>(&mut self) -> Result<Vec<R>, ApiError> {
        let response = self.send(Method::Get, R::PATH.to_string(), None)?;
        let payload: ListPayload<R> = envelope::decode(&response)?;
        Ok(payload.into_items())
    }

    pub fn list_page<R: Resource>(&mut self, page: u32, limit: u32) -> Result<Page<R>, ApiError> {
        let path = format!("{}?page={}&limit={}", R::PATH, page, limit);
        let response = self.send(Method::Get, path, None)?;
        match envelope::decode::<ListPayload<R>>(&response)? {
            ListPayload::Page(page) => Ok(page),
            ListPayload::Items(items) => Ok(Page {
                total: items.len() as u64,
                items,
                page,
                limit,
            }),
        }
    }

    pub fn get<R: Resource>(&mut self, id: Uuid) -> Result<R, ApiError> {
        let response = self.send(Method::Get, format!("{}/{}", R::PATH, id), None)?;
        envelope::decode(&response)
    }

    pub fn create<R: Resource>(&mut self, draft: &R::Draft) -> Result<R, ApiError> {
        let body = encode(draft)?;
        let response = self.send(Method::Post, R::PATH.to_string(), Some(body))?;
        envelope::decode(&response)
    }

    pub fn update<R: Resource>(&mut self, id: Uuid, draft: &R::Draft) -> Result<R, ApiError> {
        let body = encode(draft)?;
        let response = self.send(Method::Put, format!("{}/{}", R::PATH, id), Some(body))?;
        envelope::decode(&response)
    }

    pub fn delete<R: Resource>(&mut self, id: Uuid) -> Result<(), ApiError> {
        let response = self.send(Method::Delete, format!("{}/{}", R::PATH, id), None)?;
        envelope::decode_ack(&response)
    }

    fn send(
        &mut self,
        method: Method,
        path: String,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        debug!(%method, %path, "api request");
        let request = ApiRequest { method, path, body };
        let response = self.transport.send(request)?;
        if !response.is_success() {
            warn!(status = response.status, "api request failed");
        }
        Ok(response)
    }
}

fn encode<D: Serialize>(draft: &D) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(draft).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Submit target for one resource type, borrowed from an [`ApiClient`].
pub struct ResourceWriter<'a, T: Transport, R: Resource> {
    client: &'a mut ApiClient<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<T: Transport, R: Resource> SubmitCollaborator<Mutation<R::Draft>> for ResourceWriter<'_, T, R> {
    type Response = R;

    fn submit(&mut self, payload: &Mutation<R::Draft>) -> Result<R, ApiError> {
        match payload.target {
            Some(id) => self.client.update::<R>(id, &payload.draft),
            None => self.client.create::<R>(&payload.draft),
        }
    }
}

impl<T: Transport, R: Resource> DataSource<R> for ApiClient<T> {
    fn fetch(&mut self) -> Result<Vec<R>, ApiError> {
        self.list::<R>()
    }
}
