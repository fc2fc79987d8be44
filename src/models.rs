//! Data models for WorkDrive API responses and per-file results.

use serde::{Deserialize, Serialize};

/// OAuth2 token response from the identity endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One entry from a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FileItem {
    pub id: String,
    #[serde(default)]
    pub attributes: FileItemAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileItemAttributes {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response from the folder-contents listing endpoint.
#[derive(Debug, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub data: Vec<FileItem>,
}

/// Response from the upload endpoint.
///
/// WorkDrive wraps the uploaded file in a one-element `data` array; the
/// resource id usually lives in the attributes, but some responses carry
/// it as the entry's own `id`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub data: Vec<UploadedItem>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: UploadAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadAttributes {
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default, rename = "Permalink")]
    pub permalink: Option<String>,
    #[serde(default, rename = "FileName")]
    pub file_name: Option<String>,
}

/// Response from the permission-grant endpoint.
#[derive(Debug, Deserialize)]
pub struct PermissionResponse {
    #[serde(default)]
    pub data: Option<PermissionData>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionData {
    #[serde(default)]
    pub attributes: PermissionAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionAttributes {
    #[serde(default)]
    pub permalink: Option<String>,
}

/// A successfully uploaded file, as the remote service sees it.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    /// Internal share URL, valid for authenticated org members.
    pub permalink: Option<String>,
}

/// URLs derived for one uploaded file, after the link policy filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    pub direct_url: Option<String>,
    pub preview_url: Option<String>,
    pub html: Option<String>,
}

/// Terminal state of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    Error,
}

/// Outcome for one input file; immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub source_path: String,
    pub remote_name: Option<String>,
    pub resource_id: Option<String>,
    pub direct_url: Option<String>,
    pub preview_url: Option<String>,
    pub html: Option<String>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(source_path: String, resource: &ResourceDescriptor, links: LinkSet) -> Self {
        Self {
            source_path,
            remote_name: Some(resource.name.clone()),
            resource_id: Some(resource.id.clone()),
            direct_url: links.direct_url,
            preview_url: links.preview_url,
            html: links.html,
            status: FileStatus::Ok,
            error: None,
        }
    }

    pub fn failure(source_path: String, message: String) -> Self {
        Self {
            source_path,
            remote_name: None,
            resource_id: None,
            direct_url: None,
            preview_url: None,
            html: None,
            status: FileStatus::Error,
            error: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FileStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_reads_attribute_resource_id() {
        let json = r#"{
            "data": [{
                "attributes": {
                    "resource_id": "res123",
                    "Permalink": "https://workdrive.zoho.com/file/res123/preview",
                    "FileName": "report.zip"
                }
            }]
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        let item = &response.data[0];
        assert_eq!(item.attributes.resource_id.as_deref(), Some("res123"));
        assert_eq!(item.attributes.file_name.as_deref(), Some("report.zip"));
    }

    #[test]
    fn upload_response_accepts_top_level_id() {
        let json = r#"{
            "data": [{
                "id": "res999",
                "attributes": {"Permalink": "https://p"}
            }]
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        let item = &response.data[0];
        assert_eq!(item.id.as_deref(), Some("res999"));
        assert!(item.attributes.resource_id.is_none());
    }

    #[test]
    fn token_response_tolerates_missing_token() {
        let response: TokenResponse = serde_json::from_str(r#"{"error": "invalid_code"}"#).unwrap();
        assert!(response.access_token.is_none());
    }

    #[test]
    fn file_result_serializes_error_status() {
        let result = FileResult::failure("a.txt".to_string(), "Upload failed (500): boom".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["source_path"], "a.txt");
        assert!(json["resource_id"].is_null());
        assert!(json["error"].as_str().unwrap().contains("500"));
    }
}
