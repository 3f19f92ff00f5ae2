//! Shared data model for the Omnify client.
//!
//! Wire shapes (`Remote*`, `TokenResponse`) mirror what the server sends;
//! `Post` and `PageWindow` are the normalized client-side views.

use serde::{Deserialize, Serialize};

/// Number of posts per page, fixed by the client.
pub const PAGE_SIZE: u32 = 5;

/// Author name used when the server omits one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// An authenticated user's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// An authenticated session: bearer token plus the user it belongs to.
///
/// The token is opaque and never parsed client-side. Token and user exist
/// together or not at all; a logged-out state is the absence of a `Session`,
/// never a half-populated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// A blog post as displayed by the client.
///
/// Timestamps are RFC-3339 strings owned by the server; the client never
/// interprets them beyond display formatting. `updated_at` equals
/// `created_at` until the post is edited remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A blog post as the server sends it.
///
/// Listing replies carry a flat `authorName`; the detail endpoint nests an
/// `author` record instead. Both are optional on the wire, as is
/// `updatedAt`; normalization into [`Post`] fills the gaps with
/// [`UNKNOWN_AUTHOR`] and `created_at`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author: Option<RemoteAuthor>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Nested author record on the post detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteAuthor {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<RemotePost> for Post {
    fn from(remote: RemotePost) -> Self {
        let author_name = remote
            .author_name
            .or_else(|| remote.author.map(|author| author.name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let updated_at = remote
            .updated_at
            .filter(|ts| !ts.is_empty())
            .unwrap_or_else(|| remote.created_at.clone());

        Post {
            id: remote.id,
            title: remote.title,
            content: remote.content,
            author_name,
            created_at: remote.created_at,
            updated_at,
        }
    }
}

/// One page of the remote paged collection (`GET /blogs?page&size`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePage {
    #[serde(default)]
    pub content: Vec<RemotePost>,
    #[serde(default)]
    pub total_pages: u32,
}

/// The currently displayed slice of the remote post collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based page index.
    pub page_index: u32,
    /// Total page count as of the last successful fetch.
    pub total_pages: u32,
    /// At most [`PAGE_SIZE`] posts; may under-fill after a local delete.
    pub items: Vec<Post>,
}

impl PageWindow {
    /// Builds a window from a remote page, normalizing each record.
    pub fn from_remote(page_index: u32, page: RemotePage) -> Self {
        PageWindow {
            page_index,
            total_pages: page.total_pages,
            items: page.content.into_iter().map(Post::from).collect(),
        }
    }

    /// Removes the post with the given id, if present. Subsequent items are
    /// not shifted in from the server; the page under-fills until the next
    /// fetch.
    pub fn remove_post(&mut self, id: &str) {
        self.items.retain(|post| post.id != id);
    }
}

/// Server reply to login/signup.
///
/// Some server builds omit `id`; it defaults to empty rather than failing
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl TokenResponse {
    /// Splits the reply into the session it establishes.
    pub fn into_session(self) -> Session {
        Session {
            token: self.token,
            user: User {
                id: self.id.unwrap_or_default(),
                email: self.email,
                name: self.name,
            },
        }
    }
}
