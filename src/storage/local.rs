use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::{ApiEnvelope, ApiRequest, ApiResponse, Method, Page, Resource, Transport};
use crate::domain::{Client, Identifiable, Issue, Project};
use crate::errors::{ApiError, StoreError};

use super::{JsonStore, Workspace};

/// Record types the local backend can store.
trait StoredRecord: Resource + Serialize + Clone + Identifiable {
    fn build(id: Uuid, draft: Self::Draft) -> Self;
    fn replace(&mut self, draft: Self::Draft);
    fn collection(workspace: &Workspace) -> &Vec<Self>;
    fn collection_mut(workspace: &mut Workspace) -> &mut Vec<Self>;

    /// Rejects drafts that point at records which do not exist.
    fn check_references(_workspace: &Workspace, _draft: &Self::Draft) -> Result<(), StoreError> {
        Ok(())
    }

    /// Rejects deletes that would orphan dependent records.
    fn check_delete(_workspace: &Workspace, _id: Uuid) -> Result<(), StoreError> {
        Ok(())
    }
}

impl StoredRecord for Client {
    fn build(id: Uuid, draft: Self::Draft) -> Self {
        Client::from_draft(id, draft, Utc::now())
    }

    fn replace(&mut self, draft: Self::Draft) {
        self.apply(draft);
    }

    fn collection(workspace: &Workspace) -> &Vec<Self> {
        &workspace.clients
    }

    fn collection_mut(workspace: &mut Workspace) -> &mut Vec<Self> {
        &mut workspace.clients
    }

    fn check_delete(workspace: &Workspace, id: Uuid) -> Result<(), StoreError> {
        let owned = workspace
            .projects
            .iter()
            .filter(|project| project.client_id == id)
            .count();
        if owned > 0 {
            return Err(StoreError::Conflict(format!(
                "Client still owns {owned} project(s)"
            )));
        }
        Ok(())
    }
}

impl StoredRecord for Project {
    fn build(id: Uuid, draft: Self::Draft) -> Self {
        Project::from_draft(id, draft, Utc::now())
    }

    fn replace(&mut self, draft: Self::Draft) {
        self.apply(draft);
    }

    fn collection(workspace: &Workspace) -> &Vec<Self> {
        &workspace.projects
    }

    fn collection_mut(workspace: &mut Workspace) -> &mut Vec<Self> {
        &mut workspace.projects
    }

    fn check_references(workspace: &Workspace, draft: &Self::Draft) -> Result<(), StoreError> {
        if workspace.client(draft.client_id).is_none() {
            return Err(StoreError::Conflict(format!(
                "Linked client {} does not exist",
                draft.client_id
            )));
        }
        Ok(())
    }

    fn check_delete(workspace: &Workspace, id: Uuid) -> Result<(), StoreError> {
        if workspace.issues.iter().any(|issue| issue.project_id == id) {
            return Err(StoreError::Conflict("Project has linked issues".into()));
        }
        Ok(())
    }
}

impl StoredRecord for Issue {
    fn build(id: Uuid, draft: Self::Draft) -> Self {
        Issue::from_draft(id, draft, Utc::now())
    }

    fn replace(&mut self, draft: Self::Draft) {
        self.apply(draft);
    }

    fn collection(workspace: &Workspace) -> &Vec<Self> {
        &workspace.issues
    }

    fn collection_mut(workspace: &mut Workspace) -> &mut Vec<Self> {
        &mut workspace.issues
    }

    fn check_references(workspace: &Workspace, draft: &Self::Draft) -> Result<(), StoreError> {
        if workspace.project(draft.project_id).is_none() {
            return Err(StoreError::Conflict(format!(
                "Linked project {} does not exist",
                draft.project_id
            )));
        }
        Ok(())
    }
}

/// Failure modes of a routed request, mapped onto HTTP statuses.
enum RouteError {
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    Store(StoreError),
}

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        RouteError::Store(err)
    }
}

impl RouteError {
    fn into_response(self) -> ApiResponse {
        let (status, message) = match self {
            RouteError::BadRequest(message) => (400, message),
            RouteError::NotFound(message) => (404, message),
            RouteError::MethodNotAllowed => (405, "Method not allowed".to_string()),
            RouteError::Store(err @ StoreError::NotFound { .. }) => (404, err.to_string()),
            RouteError::Store(StoreError::Conflict(message)) => (422, message),
            RouteError::Store(err) => (500, err.to_string()),
        };
        respond(status, &ApiEnvelope::<()>::failure(message))
    }
}

/// In-process backend answering REST requests from a [`Workspace`].
///
/// When opened over a [`JsonStore`], every successful mutation is persisted
/// before the response is returned.
pub struct LocalTransport {
    workspace: Workspace,
    store: Option<JsonStore>,
}

impl LocalTransport {
    pub fn in_memory(workspace: Workspace) -> Self {
        Self {
            workspace,
            store: None,
        }
    }

    pub fn open(store: JsonStore) -> Result<Self, StoreError> {
        let workspace = store.load()?;
        info!(
            path = %store.path().display(),
            clients = workspace.clients.len(),
            projects = workspace.projects.len(),
            issues = workspace.issues.len(),
            "opened local data store"
        );
        Ok(Self {
            workspace,
            store: Some(store),
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn route(&mut self, request: ApiRequest) -> Result<ApiResponse, RouteError> {
        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.path.as_str(), None),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let id = match segments.get(1) {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| RouteError::BadRequest(format!("Invalid id `{raw}`")))?,
            ),
            None => None,
        };
        if segments.len() > 2 {
            return Err(RouteError::NotFound(format!("No route for {path}")));
        }
        let query = query.map(parse_query).unwrap_or_default();

        match segments[0] {
            "clients" => self.dispatch::<Client>(request.method, id, request.body, query),
            "projects" => self.dispatch::<Project>(request.method, id, request.body, query),
            "issues" => self.dispatch::<Issue>(request.method, id, request.body, query),
            _ => Err(RouteError::NotFound(format!("No route for {path}"))),
        }
    }

    fn dispatch<R: StoredRecord>(
        &mut self,
        method: Method,
        id: Option<Uuid>,
        body: Option<serde_json::Value>,
        query: PageQuery,
    ) -> Result<ApiResponse, RouteError> {
        match (method, id) {
            (Method::Get, None) => Ok(self.list::<R>(query)),
            (Method::Get, Some(id)) => {
                let record = find::<R>(&self.workspace, id)?;
                Ok(respond(200, &ApiEnvelope::ok(record)))
            }
            (Method::Post, None) => {
                let draft = parse_draft::<R>(body)?;
                R::check_references(&self.workspace, &draft)?;
                let record = R::build(Uuid::new_v4(), draft);
                let mut next = self.workspace.clone();
                R::collection_mut(&mut next).push(record.clone());
                self.commit(next)?;
                info!(kind = R::KIND, id = %record.id(), "record created");
                Ok(respond(201, &ApiEnvelope::ok(record)))
            }
            (Method::Put, Some(id)) => {
                let draft = parse_draft::<R>(body)?;
                R::check_references(&self.workspace, &draft)?;
                let mut next = self.workspace.clone();
                let record = R::collection_mut(&mut next)
                    .iter_mut()
                    .find(|record| record.id() == id)
                    .ok_or_else(|| not_found::<R>(id))?;
                record.replace(draft);
                let updated = record.clone();
                self.commit(next)?;
                info!(kind = R::KIND, %id, "record updated");
                Ok(respond(200, &ApiEnvelope::ok(updated)))
            }
            (Method::Delete, Some(id)) => {
                find::<R>(&self.workspace, id)?;
                R::check_delete(&self.workspace, id)?;
                let mut next = self.workspace.clone();
                R::collection_mut(&mut next).retain(|record| record.id() != id);
                self.commit(next)?;
                info!(kind = R::KIND, %id, "record deleted");
                Ok(respond(200, &ApiEnvelope::<()>::ack()))
            }
            _ => Err(RouteError::MethodNotAllowed),
        }
    }

    fn list<R: StoredRecord>(&self, query: PageQuery) -> ApiResponse {
        let records = R::collection(&self.workspace);
        match (query.page, query.limit) {
            (Some(page), Some(limit)) if page > 0 && limit > 0 => {
                let start = (page as usize - 1).saturating_mul(limit as usize);
                let items: Vec<R> = records
                    .iter()
                    .skip(start)
                    .take(limit as usize)
                    .cloned()
                    .collect();
                let payload = Page {
                    items,
                    total: records.len() as u64,
                    page,
                    limit,
                };
                respond(200, &ApiEnvelope::ok(payload))
            }
            _ => respond(200, &ApiEnvelope::ok(records)),
        }
    }

    /// Saves `next` and only then makes it the served workspace, so a failed
    /// save leaves the previous state in place.
    fn commit(&mut self, next: Workspace) -> Result<(), StoreError> {
        if let Some(store) = &self.store {
            store.save(&next)?;
        }
        self.workspace = next;
        Ok(())
    }
}

impl Transport for LocalTransport {
    fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "local transport request");
        Ok(self
            .route(request)
            .unwrap_or_else(RouteError::into_response))
    }
}

#[derive(Debug, Default)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

fn parse_query(query: &str) -> PageQuery {
    let mut parsed = PageQuery::default();
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("page", value)) => parsed.page = value.parse().ok(),
            Some(("limit", value)) => parsed.limit = value.parse().ok(),
            _ => {}
        }
    }
    parsed
}

fn find<R: StoredRecord>(workspace: &Workspace, id: Uuid) -> Result<R, RouteError> {
    R::collection(workspace)
        .iter()
        .find(|record| record.id() == id)
        .cloned()
        .ok_or_else(|| not_found::<R>(id))
}

fn not_found<R: StoredRecord>(id: Uuid) -> RouteError {
    RouteError::Store(StoreError::NotFound {
        kind: R::KIND,
        id: id.to_string(),
    })
}

fn parse_draft<R: StoredRecord>(body: Option<serde_json::Value>) -> Result<R::Draft, RouteError> {
    let body = body.ok_or_else(|| RouteError::BadRequest("Request body is required".into()))?;
    serde_json::from_value(body).map_err(|err| RouteError::BadRequest(err.to_string()))
}

fn respond<T: Serialize>(status: u16, envelope: &ApiEnvelope<T>) -> ApiResponse {
    let body = serde_json::to_string(envelope).unwrap_or_else(|err| {
        format!(r#"{{"success":false,"error":"{}"}}"#, err.to_string().replace('"', "'"))
    });
    ApiResponse { status, body }
}
