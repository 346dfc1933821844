//! Generic CRUD client
//!
//! Builds get/list/create/update/delete for a REST resource out of a base
//! path, a [`Transport`] and a [`ResourceConverter`]. Everything specific to a
//! resource type lives in its converter; this module only knows how to
//! address paths, pick the request kind and unwrap the response envelope.

use super::error::ApiResult;
use super::http::Transport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Wire <-> model conversion for one resource type
pub trait ResourceConverter {
    /// Shape the server returns on read
    type Wire: DeserializeOwned;
    /// Shape sent on create/update
    type Payload: Serialize;
    /// Client-side representation
    type Model;

    fn to_model(wire: Self::Wire) -> ApiResult<Self::Model>;

    /// `include_id` is false for create (the server assigns identity) and
    /// true for update
    fn to_payload(model: &Self::Model, include_id: bool) -> Self::Payload;

    fn id(model: &Self::Model) -> &str;
}

/// The backend wraps payloads as `{"data": ...}`; bodies without the key are
/// taken as the payload itself
fn unwrap_envelope(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        if let Some(data) = map.remove("data") {
            return data;
        }
    }
    value
}

/// CRUD operations for the resource at `base_path`
pub struct CrudClient<T, C> {
    base_path: String,
    transport: T,
    converter: PhantomData<fn() -> C>,
}

impl<T: Clone, C> Clone for CrudClient<T, C> {
    fn clone(&self) -> Self {
        Self {
            base_path: self.base_path.clone(),
            transport: self.transport.clone(),
            converter: PhantomData,
        }
    }
}

impl<T, C> CrudClient<T, C>
where
    T: Transport,
    C: ResourceConverter,
{
    pub fn new(base_path: &str, transport: T) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            transport,
            converter: PhantomData,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn element_path(&self, id: &str) -> String {
        format!("{}/{}", self.base_path, urlencoding::encode(id))
    }

    fn decode_one(body: Value) -> ApiResult<C::Model> {
        let wire: C::Wire = serde_json::from_value(unwrap_envelope(body))?;
        C::to_model(wire)
    }

    /// Fetch a single element by id
    pub async fn get(&self, id: &str) -> ApiResult<C::Model> {
        let body = self.transport.get(&self.element_path(id)).await?;
        Self::decode_one(body)
    }

    /// Fetch every element visible to the caller, in server order
    pub async fn list(&self) -> ApiResult<Vec<C::Model>> {
        let body = self.transport.get(&self.base_path).await?;

        let wires: Vec<C::Wire> = match unwrap_envelope(body) {
            Value::Null => Vec::new(),
            data => serde_json::from_value(data)?,
        };
        tracing::debug!("Listed {} elements from {}", wires.len(), self.base_path);

        wires.into_iter().map(C::to_model).collect()
    }

    /// Create a new element; the returned model carries the server-assigned id
    pub async fn create(&self, model: &C::Model) -> ApiResult<C::Model> {
        let payload = serde_json::to_value(C::to_payload(model, false))?;
        let body = self.transport.post(&self.base_path, &payload).await?;
        Self::decode_one(body)
    }

    /// Replace an existing element, addressed by the model's id
    pub async fn update(&self, model: &C::Model) -> ApiResult<C::Model> {
        let payload = serde_json::to_value(C::to_payload(model, true))?;
        let body = self
            .transport
            .put(&self.element_path(C::id(model)), &payload)
            .await?;
        Self::decode_one(body)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.transport.delete(&self.element_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Transport that records every call and answers with a canned body
    #[derive(Clone, Default)]
    struct RecordingTransport {
        calls: Arc<Mutex<Vec<(String, String, Option<Value>)>>>,
        response: Value,
        fail_with: Option<u16>,
    }

    impl RecordingTransport {
        fn answering(response: Value) -> Self {
            Self {
                response,
                ..Default::default()
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Default::default()
            }
        }

        fn record(&self, method: &str, path: &str, body: Option<&Value>) -> ApiResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), path.to_string(), body.cloned()));
            match self.fail_with {
                Some(status) => Err(ApiError::Status {
                    status,
                    body: String::new(),
                }),
                None => Ok(self.response.clone()),
            }
        }

        fn calls(&self) -> Vec<(String, String, Option<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, path: &str) -> ApiResult<Value> {
            self.record("GET", path, None)
        }

        async fn post(&self, path: &str, body: &Value) -> ApiResult<Value> {
            self.record("POST", path, Some(body))
        }

        async fn put(&self, path: &str, body: &Value) -> ApiResult<Value> {
            self.record("PUT", path, Some(body))
        }

        async fn delete(&self, path: &str) -> ApiResult<()> {
            self.record("DELETE", path, None).map(|_| ())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    #[derive(Deserialize)]
    struct NoteData {
        id: String,
        text: String,
    }

    #[derive(Serialize)]
    struct NotePayload {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        text: String,
    }

    struct NoteConverter;

    impl ResourceConverter for NoteConverter {
        type Wire = NoteData;
        type Payload = NotePayload;
        type Model = Note;

        fn to_model(wire: NoteData) -> ApiResult<Note> {
            Ok(Note {
                id: wire.id,
                text: wire.text,
            })
        }

        fn to_payload(model: &Note, include_id: bool) -> NotePayload {
            NotePayload {
                id: include_id.then(|| model.id.clone()),
                text: model.text.clone(),
            }
        }

        fn id(model: &Note) -> &str {
            &model.id
        }
    }

    fn client(transport: RecordingTransport) -> CrudClient<RecordingTransport, NoteConverter> {
        CrudClient::new("/api/note", transport)
    }

    #[test]
    fn test_get_addresses_element_and_unwraps_envelope() {
        let transport = RecordingTransport::answering(json!({"data": {"id": "n1", "text": "hi"}}));
        let notes = client(transport.clone());

        let note = tokio_test::block_on(notes.get("n1")).unwrap();

        assert_eq!(note.text, "hi");
        assert_eq!(
            transport.calls(),
            vec![("GET".to_string(), "/api/note/n1".to_string(), None)]
        );
    }

    #[test]
    fn test_get_accepts_bare_body() {
        let transport = RecordingTransport::answering(json!({"id": "n1", "text": "bare"}));
        let note = tokio_test::block_on(client(transport).get("n1")).unwrap();
        assert_eq!(note.text, "bare");
    }

    #[test]
    fn test_list_preserves_order() {
        let transport = RecordingTransport::answering(json!({"data": [
            {"id": "b", "text": "second"},
            {"id": "a", "text": "first"}
        ]}));

        let notes = tokio_test::block_on(client(transport.clone()).list()).unwrap();

        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(transport.calls()[0].1, "/api/note");
    }

    #[test]
    fn test_list_empty_and_null_yield_nothing() {
        let empty = RecordingTransport::answering(json!({"data": []}));
        assert!(tokio_test::block_on(client(empty).list()).unwrap().is_empty());

        let null = RecordingTransport::answering(json!({"data": null}));
        assert!(tokio_test::block_on(client(null).list()).unwrap().is_empty());
    }

    #[test]
    fn test_create_omits_id_and_returns_server_id() {
        let transport = RecordingTransport::answering(json!({"data": {"id": "srv-1", "text": "x"}}));
        let draft = Note {
            id: String::new(),
            text: "x".to_string(),
        };

        let created = tokio_test::block_on(client(transport.clone()).create(&draft)).unwrap();

        assert_eq!(created.id, "srv-1");
        let calls = transport.calls();
        assert_eq!(calls[0].0, "POST");
        assert_eq!(calls[0].1, "/api/note");
        assert_eq!(calls[0].2, Some(json!({"text": "x"})));
    }

    #[test]
    fn test_update_includes_id_and_addresses_element() {
        let transport = RecordingTransport::answering(json!({"data": {"id": "n1", "text": "new"}}));
        let note = Note {
            id: "n1".to_string(),
            text: "new".to_string(),
        };

        let updated = tokio_test::block_on(client(transport.clone()).update(&note)).unwrap();

        assert_eq!(updated, note);
        let calls = transport.calls();
        assert_eq!(calls[0].0, "PUT");
        assert_eq!(calls[0].1, "/api/note/n1");
        assert_eq!(calls[0].2, Some(json!({"id": "n1", "text": "new"})));
    }

    #[test]
    fn test_delete_encodes_id() {
        let transport = RecordingTransport::answering(Value::Null);
        tokio_test::block_on(client(transport.clone()).delete("a b/c")).unwrap();
        assert_eq!(transport.calls()[0].1, "/api/note/a%20b%2Fc");
    }

    #[test]
    fn test_transport_errors_pass_through() {
        let notes = client(RecordingTransport::failing(404));

        let err = tokio_test::block_on(notes.get("missing")).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));

        let err = tokio_test::block_on(notes.delete("missing")).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let transport = RecordingTransport::answering(json!({"data": {"unexpected": true}}));
        let err = tokio_test::block_on(client(transport).get("n1")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_base_path_trailing_slash_is_trimmed() {
        let notes = CrudClient::<_, NoteConverter>::new("/api/note/", RecordingTransport::default());
        assert_eq!(notes.base_path(), "/api/note");
    }
}
