//! Backend-owned photo entities exchanged over the REST boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Who may see a saved photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Only the owner.
    #[default]
    Private,
    /// Friends flagged as close.
    CloseFriends,
    /// Every accepted friend.
    AllFriends,
}

impl Visibility {
    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::CloseFriends => "CLOSE_FRIENDS",
            Visibility::AllFriends => "ALL_FRIENDS",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PRIVATE" => Ok(Visibility::Private),
            "CLOSE_FRIENDS" => Ok(Visibility::CloseFriends),
            "ALL_FRIENDS" => Ok(Visibility::AllFriends),
            _ => Err(CoreError::InvalidVisibility(raw.to_string())),
        }
    }
}

/// Photo as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Server-assigned identifier.
    pub id: i64,
    /// Public URL of the stored image.
    pub url: String,
    /// Visibility; older list endpoints omit it.
    #[serde(default)]
    pub visibility: Visibility,
}

/// Result of saving a photo to the album.
///
/// `url` is the server-persisted location and the only valid QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPhoto {
    /// Server-assigned identifier.
    pub id: i64,
    /// Public URL of the stored image.
    pub url: String,
}

/// Body of `POST /photos/upload-base64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPhotoRequest {
    /// Base64-encoded image bytes.
    pub image: String,
    /// Friends the photo is shared with.
    #[serde(rename = "friendIds", default, skip_serializing_if = "Option::is_none")]
    pub friend_ids: Option<Vec<i64>>,
    /// Requested visibility.
    pub visibility: Visibility,
}

/// Body of `POST /photos/{id}/visibility`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityUpdate {
    /// New visibility.
    pub visibility: Visibility,
}
