//! YouTube Data API v3 client for pulling top-level comments of a video.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Largest page size the API accepts.
const PAGE_SIZE: &str = "100";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a YouTube video URL or id: {0}")]
    InvalidVideo(String),
}

impl From<reqwest::Error> for SyncError {
    /// Request URLs carry the API key, so they are dropped from the error.
    fn from(err: reqwest::Error) -> Self {
        SyncError::Http(err.without_url())
    }
}

/// Client for the `commentThreads` endpoint.
pub struct CommentClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_comments: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadPage {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Comment,
}

#[derive(Deserialize)]
struct Comment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
}

impl CommentThreadPage {
    fn into_texts(self) -> (Vec<String>, Option<String>) {
        let texts = self
            .items
            .into_iter()
            .map(|t| t.snippet.top_level_comment.snippet.text_display)
            .collect();
        (texts, self.next_page_token.filter(|t| !t.is_empty()))
    }
}

impl CommentClient {
    /// Create a client against the public Google API host.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_comments: None,
        }
    }

    /// Point the client at another host, e.g. a local mock (no trailing slash needed).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Stop after `limit` comments instead of reading every page. A limit of
    /// zero makes no requests.
    pub fn with_max_comments(mut self, limit: usize) -> Self {
        self.max_comments = Some(limit);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/youtube/v3/commentThreads", self.base_url)
    }

    fn page_query<'a>(
        &'a self,
        video_id: &'a str,
        page_token: Option<&'a str>,
    ) -> Vec<(&'static str, &'a str)> {
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", PAGE_SIZE),
            ("textFormat", "plainText"),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        query
    }

    /// Fetch the display text of every top-level comment, in API order.
    ///
    /// Follows `nextPageToken` until the last page or until the configured
    /// limit is reached.
    pub async fn fetch_comments(&self, video_id: &str) -> Result<Vec<String>, SyncError> {
        if self.max_comments == Some(0) {
            return Ok(Vec::new());
        }

        let url = self.endpoint();
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        info!(video_id, "fetching youtube comments");
        loop {
            let resp = self
                .client
                .get(&url)
                .query(&self.page_query(video_id, page_token.as_deref()))
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(SyncError::Server {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: CommentThreadPage = serde_json::from_str(&resp.text().await?)?;
            let (texts, next) = page.into_texts();
            debug!(page_items = texts.len(), more = next.is_some(), "comment page");
            comments.extend(texts);

            if let Some(limit) = self.max_comments {
                if comments.len() >= limit {
                    comments.truncate(limit);
                    break;
                }
            }
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(video_id, count = comments.len(), "fetched comments");
        Ok(comments)
    }
}

/// Extract the 11-character video id from a URL or accept a bare id.
///
/// Recognised forms: `youtube.com/watch?v=ID`, `youtu.be/ID`,
/// `youtube.com/shorts/ID` and `youtube.com/embed/ID`, with or without scheme.
pub fn parse_video_id(input: &str) -> Result<String, SyncError> {
    let input = input.trim();
    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let invalid = || SyncError::InvalidVideo(input.to_string());
    let url = if input.contains("://") {
        Url::parse(input)
    } else {
        Url::parse(&format!("https://{input}"))
    }
    .map_err(|_| invalid())?;

    let host = url.host_str().ok_or_else(invalid)?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = host.strip_prefix("m.").unwrap_or(host);

    let mut segments = url.path_segments().into_iter().flatten();
    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    };

    candidate.filter(|id| is_video_id(id)).ok_or_else(invalid)
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
