//! Asynchronous façade over `UserClient` and a `Transport`.
//!
//! Every call is a single request/response exchange: no retries, no caching.
//! Clones share the same transport, so one service can be handed to every
//! controller of an application.

use std::sync::Arc;

use tracing::{debug, info};

use crate::client::UserClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{User, UserId};

#[derive(Clone)]
pub struct UserService {
    client: UserClient,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(client: UserClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    /// Service talking to `config.base_url` through reqwest.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            UserClient::new(&config.base_url),
            Arc::new(ReqwestTransport::default()),
        )
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let response = self.transport.execute(self.client.build_list_users()).await?;
        let users = self.client.parse_list_users(response)?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<User>, ApiError> {
        let response = self.transport.execute(self.client.build_search_users(name)).await?;
        self.client.parse_search_users(response)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: UserId) -> Result<User, ApiError> {
        let response = self.transport.execute(self.client.build_get_user(id)).await?;
        self.client.parse_get_user(response)
    }

    #[tracing::instrument(skip(self, draft))]
    pub async fn create(&self, draft: &User) -> Result<User, ApiError> {
        debug!(?draft, "create called");
        let request = self.client.build_create_user(draft)?;
        let created = self.client.parse_create_user(self.transport.execute(request).await?)?;
        info!(id = ?created.id, "user created");
        Ok(created)
    }

    #[tracing::instrument(skip(self, record))]
    pub async fn update(&self, id: UserId, record: &User) -> Result<User, ApiError> {
        debug!(?record, "update called");
        let request = self.client.build_update_user(id, record)?;
        let updated = self.client.parse_update_user(self.transport.execute(request).await?)?;
        info!("user replaced");
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_user(id)).await?;
        self.client.parse_delete_user(response)?;
        info!("user deleted");
        Ok(())
    }
}
