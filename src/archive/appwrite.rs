//! Appwrite Databases backend for the remote archive.
//!
//! Each chat session is one document in a fixed collection:
//! `{messages: <JSON-encoded message sequence>, createdAt: <RFC 3339>}`.
//! The message payload is stored as an opaque encoded blob and decoded back
//! into an ordered sequence on read. Document ids are generated client-side
//! (uuid v4) at create time.

use super::traits::{ArchiveError, RemoteArchive};
use crate::session::{ArchivedSession, Message};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Remote archive over the Appwrite Databases REST API.
///
/// Assumes an already-authenticated caller context: the project id scopes
/// every call and an API key is attached when configured. Sign-in/sign-out
/// management lives outside this crate.
pub struct AppwriteArchive {
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: Option<String>,
    client: Client,
}

// ── Wire types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateDocumentRequest<'a> {
    #[serde(rename = "documentId")]
    document_id: &'a str,
    data: DocumentData<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateDocumentRequest<'a> {
    data: UpdateData<'a>,
}

#[derive(Debug, Serialize)]
struct DocumentData<'a> {
    messages: &'a str,
    #[serde(rename = "createdAt")]
    created_at: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateData<'a> {
    messages: &'a str,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    messages: Option<String>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    documents: Vec<serde_json::Value>,
}

impl AppwriteArchive {
    /// Create an archive client against `endpoint` (e.g.
    /// `https://fra.cloud.appwrite.io/v1`, or a local mock server in tests).
    pub fn new(
        endpoint: &str,
        project_id: &str,
        database_id: &str,
        collection_id: &str,
        api_key: Option<&str>,
    ) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
            api_key: api_key.map(String::from),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{id}", self.documents_url())
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("X-Appwrite-Project", &self.project_id);
        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    /// Map a non-success response to the archive error taxonomy.
    async fn error_for(response: reqwest::Response, id: Option<&str>) -> ArchiveError {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return ArchiveError::NotFound(id.to_string());
            }
        }
        let body = response.text().await.unwrap_or_default();
        ArchiveError::Unavailable(format!("Appwrite API error ({status}): {body}"))
    }

    fn decode_document(value: serde_json::Value) -> Result<ArchivedSession, ArchiveError> {
        let id = value
            .get("$id")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing $id>")
            .to_string();

        let doc: Document = serde_json::from_value(value).map_err(|e| ArchiveError::Decode {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        let blob = doc.messages.ok_or_else(|| ArchiveError::Decode {
            id: id.clone(),
            reason: "missing messages field".into(),
        })?;
        let messages: Vec<Message> =
            serde_json::from_str(&blob).map_err(|e| ArchiveError::Decode {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        Ok(ArchivedSession {
            created_at: doc.created_at.unwrap_or_default(),
            id: doc.id,
            messages,
        })
    }
}

#[async_trait]
impl RemoteArchive for AppwriteArchive {
    fn name(&self) -> &str {
        "appwrite"
    }

    async fn create(
        &self,
        messages: &[Message],
        created_at: &str,
    ) -> Result<String, ArchiveError> {
        let blob = serde_json::to_string(messages)
            .map_err(|e| ArchiveError::Unavailable(format!("encoding messages: {e}")))?;
        let document_id = uuid::Uuid::new_v4().to_string();

        let request = CreateDocumentRequest {
            document_id: &document_id,
            data: DocumentData {
                messages: &blob,
                created_at,
            },
        };

        let response = self
            .request(self.client.post(self.documents_url()))
            .json(&request)
            .send()
            .await
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, None).await);
        }

        let created: Document = response
            .json()
            .await
            .map_err(|e| ArchiveError::Unavailable(format!("parsing create response: {e}")))?;

        Ok(created.id)
    }

    async fn update(&self, id: &str, messages: &[Message]) -> Result<(), ArchiveError> {
        let blob = serde_json::to_string(messages)
            .map_err(|e| ArchiveError::Unavailable(format!("encoding messages: {e}")))?;

        let request = UpdateDocumentRequest {
            data: UpdateData { messages: &blob },
        };

        let response = self
            .request(self.client.patch(self.document_url(id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, Some(id)).await);
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        let response = self
            .request(self.client.get(self.documents_url()))
            .send()
            .await
            .map_err(|e| ArchiveError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, None).await);
        }

        let listing: DocumentList = response
            .json()
            .await
            .map_err(|e| ArchiveError::Unavailable(format!("parsing list response: {e}")))?;

        // Per-item decode: one corrupt document never fails the whole listing.
        let mut sessions = Vec::with_capacity(listing.documents.len());
        for value in listing.documents {
            match Self::decode_document(value) {
                Ok(session) => sessions.push(session),
                Err(e) => tracing::warn!("Skipping undecodable archived session: {e}"),
            }
        }

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn archive_for(server: &MockServer) -> AppwriteArchive {
        AppwriteArchive::new(&server.uri(), "proj-1", "db-1", "col-1", Some("key-1"))
    }

    fn document_json(id: &str, messages: &[Message], created_at: &str) -> serde_json::Value {
        serde_json::json!({
            "$id": id,
            "messages": serde_json::to_string(messages).unwrap(),
            "createdAt": created_at,
        })
    }

    #[test]
    fn create_request_serialization() {
        let request = CreateDocumentRequest {
            document_id: "doc-1",
            data: DocumentData {
                messages: r#"[{"speaker":"user","text":"Hello"}]"#,
                created_at: "2026-01-01T00:00:00Z",
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"documentId\":\"doc-1\""));
        assert!(json.contains("\"createdAt\":\"2026-01-01T00:00:00Z\""));
        assert!(json.contains("speaker"));
    }

    #[tokio::test]
    async fn create_posts_document_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db-1/collections/col-1/documents"))
            .and(header("X-Appwrite-Project", "proj-1"))
            .and(header("X-Appwrite-Key", "key-1"))
            .respond_with(ResponseTemplate::new(201).set_body_json(document_json(
                "doc-42",
                &[Message::user("Hello")],
                "2026-01-01T00:00:00Z",
            )))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        let id = archive
            .create(&[Message::user("Hello")], "2026-01-01T00:00:00Z")
            .await
            .unwrap();
        assert_eq!(id, "doc-42");
    }

    #[tokio::test]
    async fn update_patches_existing_document() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/databases/db-1/collections/col-1/documents/doc-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document_json(
                "doc-42",
                &[Message::user("Hello"), Message::bot("Hi")],
                "2026-01-01T00:00:00Z",
            )))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        archive
            .update("doc-42", &[Message::user("Hello"), Message::bot("Hi")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_missing_document_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Document with the requested ID could not be found.",
            })))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        let err = archive
            .update("doc-nope", &[Message::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(ref id) if id == "doc-nope"));
    }

    #[tokio::test]
    async fn server_error_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        let err = archive
            .create(&[Message::user("x")], "2026-01-01T00:00:00Z")
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Unavailable(_)));
    }

    #[tokio::test]
    async fn list_decodes_documents() {
        let server = MockServer::start().await;
        let messages = vec![Message::user("Hello"), Message::bot("Hi there")];
        Mock::given(method("GET"))
            .and(path("/databases/db-1/collections/col-1/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "documents": [document_json("doc-1", &messages, "2026-01-02T00:00:00Z")],
            })))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        let sessions = archive.list().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "doc-1");
        assert_eq!(sessions[0].messages, messages);
        assert_eq!(sessions[0].created_at, "2026-01-02T00:00:00Z");
    }

    #[tokio::test]
    async fn list_skips_undecodable_documents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 2,
                "documents": [
                    { "$id": "doc-bad", "messages": "not json", "createdAt": "2026-01-01T00:00:00Z" },
                    document_json("doc-good", &[Message::user("ok")], "2026-01-03T00:00:00Z"),
                ],
            })))
            .mount(&server)
            .await;

        let archive = archive_for(&server);
        let sessions = archive.list().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "doc-good");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        // Port from a server that has been shut down.
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let archive = AppwriteArchive::new(&uri, "proj-1", "db-1", "col-1", None);
        let err = archive.list().await.unwrap_err();
        assert!(matches!(err, ArchiveError::Unavailable(_)));
    }
}
