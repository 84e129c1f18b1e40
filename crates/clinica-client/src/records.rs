use clinica_core::{EntityKind, routes};
use clinica_wizard::store::{BoxFuture, RecordStore, StoreRejection};
use serde_json::Value;
use tracing::warn;

use crate::client::{ApiClient, Method};
use crate::error::ClientError;

/// [`RecordStore`] backed by the clinic REST API: `POST {collection}` to
/// create, `PUT {collection}/{id}` to update.
#[derive(Clone)]
pub struct RestRecordStore {
    client: ApiClient,
}

impl RestRecordStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl RecordStore for RestRecordStore {
    fn create(&self, kind: EntityKind, payload: Value) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>> {
        let client = self.client.clone();
        Box::pin(async move {
            let path = routes::collection(kind);
            blocking(move || client.send_json(Method::Post, path, &payload)).await
        })
    }

    fn update(
        &self,
        kind: EntityKind,
        id: String,
        payload: Value,
    ) -> BoxFuture<'_, Result<Option<Value>, StoreRejection>> {
        let client = self.client.clone();
        Box::pin(async move {
            let path = routes::record(kind, &id);
            blocking(move || client.send_json(Method::Put, &path, &payload)).await
        })
    }
}

async fn blocking<F>(call: F) -> Result<Option<Value>, StoreRejection>
where
    F: FnOnce() -> Result<Option<Value>, ClientError> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(record)) => Ok(record),
        Ok(Err(e)) => {
            warn!(error = %e, "record store call failed");
            Err(StoreRejection::new(e.to_string()))
        }
        Err(e) => Err(StoreRejection::new(format!("request task failed: {e}"))),
    }
}
