//! Shitaraba-style boards (`host/category/id`, EUC-JP).

use super::transport::{self, build_http_client, get_text, split_title_count};
use super::{BoardClient, Post, PostDraft, ThreadSummary};
use crate::error::{BoardError, SubmitError};
use async_trait::async_trait;
use encoding_rs::EUC_JP;
use std::collections::HashSet;
use std::time::Duration;

/// Client for one shitaraba board.
pub struct ShitarabaClient {
    http: reqwest::Client,
    base_url: String,
    /// `category/board-id`.
    board: String,
}

impl ShitarabaClient {
    /// Build a client for `board` on `host` over HTTPS.
    pub fn new(host: &str, board: &str, timeout: Duration) -> Self {
        Self::with_base_url(&format!("https://{host}"), board, timeout)
    }

    /// Build a client against an explicit scheme+host base URL.
    pub fn with_base_url(base_url: &str, board: &str, timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            board: board.trim_matches('/').to_string(),
        }
    }

    fn rawmode_url(&self, thread_id: u64, from: u32) -> String {
        format!(
            "{}/bbs/rawmode.cgi/{}/{thread_id}/{from}-",
            self.base_url, self.board
        )
    }

    async fn fetch_raw(&self, thread_id: u64, from: u32) -> Result<Vec<RawLine>, BoardError> {
        let text = get_text(&self.http, &self.rawmode_url(thread_id, from), EUC_JP).await?;
        Ok(text.lines().filter_map(parse_rawmode_line).collect())
    }
}

#[async_trait]
impl BoardClient for ShitarabaClient {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, BoardError> {
        let url = format!("{}/{}/subject.txt", self.base_url, self.board);
        let text = get_text(&self.http, &url, EUC_JP).await?;
        Ok(parse_subject_txt(&text))
    }

    async fn thread_by_id(&self, id: u64) -> Result<Option<ThreadSummary>, BoardError> {
        let lines = self.fetch_raw(id, 1).await?;
        let Some(first) = lines.first() else {
            return Ok(None);
        };
        let last = lines.iter().map(|line| line.post.no).max().unwrap_or(0);
        Ok(Some(ThreadSummary {
            id,
            title: first.title.clone(),
            last,
        }))
    }

    async fn fetch_posts(&self, thread_id: u64, from: u32) -> Result<Vec<Post>, BoardError> {
        let mut posts: Vec<Post> = self
            .fetch_raw(thread_id, from)
            .await?
            .into_iter()
            .map(|line| line.post)
            .filter(|post| post.no >= from)
            .collect();
        posts.sort_by_key(|post| post.no);
        Ok(posts)
    }

    async fn submit(&self, thread_id: u64, draft: &PostDraft) -> Result<(), SubmitError> {
        let (category, board_id) = self.board.split_once('/').ok_or_else(|| {
            SubmitError::Board(BoardError::Malformed(format!(
                "board `{}` is not category/id",
                self.board
            )))
        })?;
        let url = format!(
            "{}/bbs/write.cgi/{}/{thread_id}/",
            self.base_url, self.board
        );
        let referer = format!("{}/bbs/read.cgi/{}/{thread_id}/", self.base_url, self.board);
        let key = thread_id.to_string();
        transport::post_form(
            &self.http,
            &url,
            &referer,
            EUC_JP,
            &[
                ("DIR", category),
                ("BBS", board_id),
                ("KEY", key.as_str()),
                ("NAME", draft.name.as_str()),
                ("MAIL", draft.mail.as_str()),
                ("MESSAGE", draft.body.as_str()),
            ],
        )
        .await
    }
}

/// One `rawmode.cgi` row: the post plus the thread title it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawLine {
    post: Post,
    title: String,
}

/// Parse `no<>name<>mail<>date<>body<>title<>id`.
fn parse_rawmode_line(line: &str) -> Option<RawLine> {
    let fields: Vec<&str> = line.split("<>").collect();
    if fields.len() < 5 {
        return None;
    }
    let no = fields[0].trim().parse().ok()?;
    let poster_id = fields
        .get(6)
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    Some(RawLine {
        post: Post {
            no,
            name: fields[1].to_string(),
            mail: fields[2].to_string(),
            date: fields[3].to_string(),
            poster_id,
            body: fields[4].to_string(),
        },
        title: fields.get(5).copied().unwrap_or_default().to_string(),
    })
}

/// Parse `ID.cgi,TITLE(COUNT)` rows. The listing repeats its newest thread
/// as a trailer, so ids are de-duplicated keeping the first occurrence.
fn parse_subject_txt(text: &str) -> Vec<ThreadSummary> {
    let mut seen = HashSet::new();
    text.lines()
        .filter_map(|line| {
            let (file, entry) = line.split_once(',')?;
            let id = file.strip_suffix(".cgi")?.parse().ok()?;
            let (title, last) = split_title_count(entry)?;
            Some(ThreadSummary { id, title, last })
        })
        .filter(|thread| seen.insert(thread.id))
        .collect()
}
