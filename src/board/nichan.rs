//! 2ch-style boards (`host[/path]/board`, Shift_JIS `.dat` threads).

use super::transport::{self, build_http_client, get_text, split_title_count};
use super::{BoardClient, Post, PostDraft, ThreadSummary};
use crate::error::{BoardError, SubmitError};
use async_trait::async_trait;
use encoding_rs::SHIFT_JIS;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Label of the submit button; some boards refuse posts without it.
const SUBMIT_LABEL: &str = "書き込む";

/// Client for one 2ch-style board.
pub struct NichanClient {
    http: reqwest::Client,
    /// Scheme, host and any intermediate path.
    base_url: String,
    board: String,
}

impl NichanClient {
    /// Build a client for `board` under `host` (which may carry a path) over HTTPS.
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

    async fn fetch_dat(&self, thread_id: u64) -> Result<Vec<DatLine>, BoardError> {
        let url = format!("{}/{}/dat/{thread_id}.dat", self.base_url, self.board);
        let text = get_text(&self.http, &url, SHIFT_JIS).await?;
        Ok(parse_dat(&text))
    }
}

#[async_trait]
impl BoardClient for NichanClient {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, BoardError> {
        let url = format!("{}/{}/subject.txt", self.base_url, self.board);
        let text = get_text(&self.http, &url, SHIFT_JIS).await?;
        Ok(parse_subject_txt(&text))
    }

    async fn thread_by_id(&self, id: u64) -> Result<Option<ThreadSummary>, BoardError> {
        let lines = self.fetch_dat(id).await?;
        let Some(first) = lines.first() else {
            return Ok(None);
        };
        Ok(Some(ThreadSummary {
            id,
            title: first.title.clone(),
            last: lines.len() as u32,
        }))
    }

    async fn fetch_posts(&self, thread_id: u64, from: u32) -> Result<Vec<Post>, BoardError> {
        // `.dat` files have no range form; read the whole thread and skip.
        Ok(self
            .fetch_dat(thread_id)
            .await?
            .into_iter()
            .map(|line| line.post)
            .filter(|post| post.no >= from)
            .collect())
    }

    async fn submit(&self, thread_id: u64, draft: &PostDraft) -> Result<(), SubmitError> {
        let url = format!("{}/test/bbs.cgi", self.base_url);
        let referer = format!(
            "{}/test/read.cgi/{}/{thread_id}/",
            self.base_url, self.board
        );
        let key = thread_id.to_string();
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|delta| delta.as_secs())
            .unwrap_or(0)
            .to_string();
        transport::post_form(
            &self.http,
            &url,
            &referer,
            SHIFT_JIS,
            &[
                ("bbs", self.board.as_str()),
                ("key", key.as_str()),
                ("time", time.as_str()),
                ("FROM", draft.name.as_str()),
                ("mail", draft.mail.as_str()),
                ("MESSAGE", draft.body.as_str()),
                ("submit", SUBMIT_LABEL),
            ],
        )
        .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DatLine {
    post: Post,
    title: String,
}

/// Parse a `.dat` file; line `k` (1-based) is post `k`.
///
/// Unparseable lines still occupy their number so later posts keep their
/// numbering; they come back as empty posts.
fn parse_dat(text: &str) -> Vec<DatLine> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| parse_dat_line(idx as u32 + 1, line))
        .collect()
}

/// Parse `name<>mail<>date[ ID:x]<>body<>title`.
fn parse_dat_line(no: u32, line: &str) -> DatLine {
    let mut fields = line.split("<>");
    let name = fields.next().unwrap_or_default().to_string();
    let mail = fields.next().unwrap_or_default().to_string();
    let stamp = fields.next().unwrap_or_default();
    let body = fields.next().unwrap_or_default().trim().to_string();
    let title = fields.next().unwrap_or_default().trim().to_string();
    let (date, poster_id) = match stamp.rsplit_once(" ID:") {
        Some((date, id)) => (date.to_string(), Some(id.trim().to_string())),
        None => (stamp.to_string(), None),
    };
    DatLine {
        post: Post {
            no,
            name,
            mail,
            date,
            poster_id,
            body,
        },
        title,
    }
}

/// Parse `ID.dat<>TITLE (COUNT)` rows.
fn parse_subject_txt(text: &str) -> Vec<ThreadSummary> {
    text.lines()
        .filter_map(|line| {
            let (file, entry) = line.split_once("<>")?;
            let id = file.strip_suffix(".dat")?.parse().ok()?;
            let (title, last) = split_title_count(entry)?;
            Some(ThreadSummary { id, title, last })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{serve_http, CannedResponse};

    #[test]
    fn subject_txt_parses_dat_rows() {
        let text = "1700000001.dat<>ニュース速報 (1000)\n1700000002.dat<>雑談 (3)\nbroken\n";
        let threads = parse_subject_txt(text);
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].title, "ニュース速報");
        assert_eq!(threads[0].last, 1000);
        assert_eq!(threads[1].id, 1_700_000_002);
    }

    #[test]
    fn dat_line_splits_date_and_id() {
        let line = parse_dat_line(
            1,
            "名無しさん<>sage<>2024/01/01(月) 12:00:00.00 ID:AbCd1234<> 本文 <br> 二行目 <>スレタイ",
        );
        assert_eq!(line.post.date, "2024/01/01(月) 12:00:00.00");
        assert_eq!(line.post.poster_id.as_deref(), Some("AbCd1234"));
        assert_eq!(line.post.body, "本文 <br> 二行目");
        assert_eq!(line.title, "スレタイ");
    }

    #[test]
    fn dat_numbers_posts_by_line() {
        let lines = parse_dat("a<><>d<>one<>T\nb<><>d<>two<>\n");
        assert_eq!(lines[0].post.no, 1);
        assert_eq!(lines[1].post.no, 2);
        assert_eq!(lines[1].post.poster_id, None);
    }

    #[tokio::test]
    async fn fetch_posts_skips_before_cursor_and_decodes_shift_jis() {
        let (body, _, _) = SHIFT_JIS.encode("a<><>d<>一<>T\nb<><>d<>二<>\nc<><>d<>三<>\n");
        let server = serve_http(vec![CannedResponse::ok(body.into_owned())]).await;
        let client = NichanClient::with_base_url(&server.base_url, "news", Duration::from_secs(3));

        let posts = client.fetch_posts(1_700_000_000, 2).await.expect("fetch");
        assert_eq!(
            posts.iter().map(|p| p.body.as_str()).collect::<Vec<_>>(),
            vec!["二", "三"]
        );
        let requests = server.requests().await;
        assert!(requests[0].starts_with("GET /news/dat/1700000000.dat "));
    }

    #[tokio::test]
    async fn submit_reports_thread_stop() {
        let (body, _, _) = SHIFT_JIS.encode("ERROR: スレッドストップです。");
        let server = serve_http(vec![CannedResponse::ok(body.into_owned())]).await;
        let client = NichanClient::with_base_url(&server.base_url, "news", Duration::from_secs(3));
        let draft = PostDraft {
            name: String::new(),
            mail: "sage".into(),
            body: "hi".into(),
        };

        let err = client.submit(5, &draft).await.expect_err("stopped");
        assert!(matches!(err, SubmitError::ThreadStopped));
        let requests = server.requests().await;
        assert!(requests[0].starts_with("POST /test/bbs.cgi "));
        assert!(requests[0].contains("bbs=news&key=5&time="));
    }
}
