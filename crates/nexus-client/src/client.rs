use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, warn};

use archive_purge_core_types::PackageRecord;
use archive_purge_engine::{ArtifactStore, RemoteError, RemoteOutcome};

use crate::config::NexusConfig;
use crate::errors::{from_reqwest, from_status, NexusError};
use crate::model::{Component, ComponentPage};
use crate::selection::NeededSet;

/// Deletes composer components from a Nexus hosted repository when no
/// retained package still needs them.
pub struct NexusArtifactStore {
    client: Client,
    config: NexusConfig,
}

impl NexusArtifactStore {
    pub fn new(config: NexusConfig) -> Result<Self, NexusError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| NexusError::Client(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(username) => request.basic_auth(username, self.config.password.as_deref()),
            None => request,
        }
    }

    async fn list_components(&self) -> Result<Vec<Component>, RemoteError> {
        let mut components = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let url = self.config.components_url(continuation.as_deref())?;
            debug!(%url, "listing nexus components");
            let response = self
                .authorize(self.client.get(url))
                .send()
                .await
                .map_err(from_reqwest)?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(from_status(status, body));
            }
            let page: ComponentPage = response
                .json()
                .await
                .map_err(|err| RemoteError::Invalid(err.to_string()))?;
            components.extend(page.items);
            match page.continuation_token {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => break,
            }
        }
        Ok(components)
    }

    async fn delete_component(&self, component: &Component) -> Result<(), RemoteError> {
        let url = self.config.component_url(&component.id)?;
        let response = self
            .authorize(self.client.delete(url))
            .send()
            .await
            .map_err(from_reqwest)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(component = %component.label(), "nexus component already gone");
            return Ok(());
        }
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(from_status(status, body))
        }
    }
}

#[async_trait]
impl ArtifactStore for NexusArtifactStore {
    fn name(&self) -> &str {
        "nexus"
    }

    async fn delete_unneeded(
        &self,
        retained: &[PackageRecord],
    ) -> Result<RemoteOutcome, RemoteError> {
        let needed = NeededSet::from_retained(retained);
        let components = self.list_components().await?;

        let mut outcome = RemoteOutcome::default();
        let mut failures = Vec::new();
        for component in &components {
            if needed.is_needed(component) {
                outcome.kept += 1;
                continue;
            }
            let label = component.label();
            match self.delete_component(component).await {
                Ok(()) => {
                    info!(component = %label, "deleted nexus component");
                    outcome.deleted.push(label);
                }
                Err(err) => {
                    warn!(component = %label, error = %err, "failed to delete nexus component");
                    failures.push(format!("{label}: {err}"));
                }
            }
        }

        if let Some(first) = failures.first() {
            return Err(RemoteError::Partial {
                failed: failures.len(),
                first: first.clone(),
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeNexus {
        deleted: Arc<Mutex<Vec<String>>>,
        refuse: Arc<Mutex<Vec<String>>>,
        gone: Arc<Mutex<Vec<String>>>,
    }

    async fn list(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let page = match params.get("continuationToken") {
            None => json!({
                "items": [
                    {"id": "c1", "name": "acme/a", "version": "1.0.0",
                     "assets": [{"path": "acme/a/1.0.0/a-1.0.0.zip"}]},
                    {"id": "c2", "name": "acme/old", "version": "0.1.0",
                     "assets": [{"path": "acme/old/0.1.0/old-0.1.0.zip"}]}
                ],
                "continuationToken": "page-2"
            }),
            Some(_) => json!({
                "items": [
                    {"id": "c3", "name": "acme/older", "version": "0.0.1",
                     "assets": [{"path": "acme/older/0.0.1/older-0.0.1.zip"}]}
                ],
                "continuationToken": null
            }),
        };
        Json(page)
    }

    async fn remove(State(state): State<FakeNexus>, Path(id): Path<String>) -> StatusCode {
        if state.refuse.lock().contains(&id) {
            return StatusCode::FORBIDDEN;
        }
        if state.gone.lock().contains(&id) {
            return StatusCode::NOT_FOUND;
        }
        state.deleted.lock().push(id);
        StatusCode::NO_CONTENT
    }

    async fn spawn_fake(state: FakeNexus) -> String {
        let app = Router::new()
            .route("/service/rest/v1/components", get(list))
            .route("/service/rest/v1/components/:id", delete(remove))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn retained() -> Vec<PackageRecord> {
        vec![PackageRecord::new("acme/a", "1.0.0").with_dist("zip", "dist/acme/a-1.0.0.zip")]
    }

    #[tokio::test]
    async fn deletes_components_across_pages() {
        let state = FakeNexus::default();
        let base = spawn_fake(state.clone()).await;
        let store = NexusArtifactStore::new(NexusConfig::new(&base, "composer").unwrap()).unwrap();

        let outcome = store.delete_unneeded(&retained()).await.unwrap();

        assert_eq!(outcome.kept, 1);
        assert_eq!(outcome.deleted, ["acme/old 0.1.0", "acme/older 0.0.1"]);
        assert_eq!(state.deleted.lock().as_slice(), ["c2", "c3"]);
    }

    #[tokio::test]
    async fn refused_deletions_surface_as_partial_failure() {
        let state = FakeNexus::default();
        state.refuse.lock().push("c2".into());
        let base = spawn_fake(state.clone()).await;
        let store = NexusArtifactStore::new(NexusConfig::new(&base, "composer").unwrap()).unwrap();

        let err = store.delete_unneeded(&retained()).await.unwrap_err();

        assert!(matches!(err, RemoteError::Partial { failed: 1, .. }));
        assert_eq!(state.deleted.lock().as_slice(), ["c3"]);
    }

    #[tokio::test]
    async fn components_already_gone_count_as_deleted() {
        let state = FakeNexus::default();
        state.gone.lock().push("c2".into());
        let base = spawn_fake(state.clone()).await;
        let store = NexusArtifactStore::new(NexusConfig::new(&base, "composer").unwrap()).unwrap();

        let outcome = store.delete_unneeded(&retained()).await.unwrap();

        assert_eq!(outcome.deleted, ["acme/old 0.1.0", "acme/older 0.0.1"]);
        assert_eq!(state.deleted.lock().as_slice(), ["c3"]);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = NexusConfig::new(&format!("http://{addr}"), "composer").unwrap();
        let store = NexusArtifactStore::new(config).unwrap();

        let err = store.delete_unneeded(&retained()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
