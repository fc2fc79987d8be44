//! WorkDrive API client for upload, trash, listing, and sharing calls.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;

use crate::auth::TokenProvider;
use crate::config::{Region, RetryPolicy};
use crate::error::{ActionError, Result};
use crate::models::{FileItem, FileListResponse, PermissionResponse, ResourceDescriptor, UploadResponse};
use crate::retry::with_retry;

/// "Everyone on the internet" view role for files.
const PUBLIC_VIEW_ROLE: &str = "34";

/// WorkDrive status code for trashed resources.
const TRASHED_STATUS: &str = "51";

/// Client for the WorkDrive REST API.
///
/// Every method resolves the access token through the shared
/// [`TokenProvider`] and wraps its single HTTP call in the retry
/// executor.
pub struct WorkDriveClient {
    api_base: String,
    auth: TokenProvider,
    http: Client,
    retry: RetryPolicy,
}

impl WorkDriveClient {
    /// Create a client for the region's API endpoint.
    pub fn new(auth: TokenProvider, region: Region, retry: RetryPolicy) -> Self {
        Self::with_api_base(auth, region.api_base(), retry)
    }

    /// Create a client against an explicit API base URL.
    pub fn with_api_base(
        auth: TokenProvider,
        api_base: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            auth,
            http: Client::new(),
            retry,
        }
    }

    /// Resolve the access token up front so an auth failure surfaces
    /// before any file work starts.
    pub async fn ensure_token(&self) -> Result<()> {
        self.auth.get_access_token().await.map(|_| ())
    }

    fn auth_header(token: &str) -> String {
        format!("Zoho-oauthtoken {}", token)
    }

    /// Find a file by exact name in a folder.
    ///
    /// The server-side name filter can match loosely, so the returned
    /// entries are compared against `name` client-side.
    pub async fn find_file(&self, folder_id: &str, name: &str) -> Result<Option<FileItem>> {
        with_retry(self.retry, || async {
            let token = self.auth.get_access_token().await?;

            let response = self
                .http
                .get(format!("{}/files/{}/files", self.api_base, folder_id))
                .header("Authorization", Self::auth_header(&token))
                .header("Accept", "application/vnd.api+json")
                .query(&[("filter[name]", name)])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ActionError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let listing: FileListResponse = response
                .json()
                .await
                .map_err(|err| ActionError::UnexpectedResponse(err.to_string()))?;

            Ok(listing
                .data
                .into_iter()
                .find(|item| item.attributes.name.as_deref() == Some(name)))
        })
        .await
    }

    /// Move a resource to the trash (soft delete).
    pub async fn trash_file(&self, resource_id: &str) -> Result<()> {
        let payload = json!({
            "data": {
                "type": "files",
                "attributes": { "status": TRASHED_STATUS }
            }
        });

        with_retry(self.retry, || async {
            let token = self.auth.get_access_token().await?;

            let response = self
                .http
                .patch(format!("{}/files/{}", self.api_base, resource_id))
                .header("Authorization", Self::auth_header(&token))
                .header("Accept", "application/vnd.api+json")
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ActionError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            Ok(())
        })
        .await
    }

    /// Upload a local file into a folder under `remote_name`.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        folder_id: &str,
        remote_name: &str,
    ) -> Result<ResourceDescriptor> {
        if !local_path.is_file() {
            return Err(ActionError::NotFound(local_path.display().to_string()));
        }

        // Read once; each retry attempt rebuilds the multipart form from
        // the same bytes.
        let content = std::fs::read(local_path)?;
        let mime_type = mime_guess::from_path(remote_name)
            .first_or_octet_stream()
            .to_string();

        with_retry(self.retry, || async {
            let token = self.auth.get_access_token().await?;

            let file_part = Part::bytes(content.clone())
                .file_name(remote_name.to_string())
                .mime_str(&mime_type)?;

            let form = Form::new()
                .text("parent_id", folder_id.to_string())
                .text("filename", remote_name.to_string())
                .part("content", file_part);

            let response = self
                .http
                .post(format!("{}/upload", self.api_base))
                .header("Authorization", Self::auth_header(&token))
                .multipart(form)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ActionError::Upload {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let upload: UploadResponse = response
                .json()
                .await
                .map_err(|err| ActionError::UnexpectedResponse(err.to_string()))?;

            let item = upload.data.into_iter().next().ok_or_else(|| {
                ActionError::UnexpectedResponse("empty data in upload response".to_string())
            })?;

            let resource_id = item
                .attributes
                .resource_id
                .or(item.id)
                .ok_or_else(|| {
                    ActionError::UnexpectedResponse(
                        "no resource id in upload response".to_string(),
                    )
                })?;

            Ok(ResourceDescriptor {
                id: resource_id,
                name: item
                    .attributes
                    .file_name
                    .unwrap_or_else(|| remote_name.to_string()),
                parent_id: folder_id.to_string(),
                permalink: item.attributes.permalink,
            })
        })
        .await
    }

    /// Grant "everyone with the link" view access to a resource.
    ///
    /// Returns the permalink from the grant response when the service
    /// includes one; the caller falls back to the upload permalink.
    pub async fn share_public(&self, resource_id: &str) -> Result<Option<String>> {
        let payload = json!({
            "data": {
                "type": "permissions",
                "attributes": {
                    "resource_id": resource_id,
                    "shared_type": "everyone",
                    "role_id": PUBLIC_VIEW_ROLE
                }
            }
        });

        with_retry(self.retry, || async {
            let token = self.auth.get_access_token().await?;

            let response = self
                .http
                .post(format!("{}/permissions", self.api_base))
                .header("Authorization", Self::auth_header(&token))
                .header("Accept", "application/vnd.api+json")
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ActionError::Share {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let grant: PermissionResponse = response
                .json()
                .await
                .map_err(|err| ActionError::UnexpectedResponse(err.to_string()))?;

            Ok(grant.data.and_then(|data| data.attributes.permalink))
        })
        .await
    }
}
