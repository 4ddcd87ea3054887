//! HTTP, charset, and response-classification helpers shared by both dialects.

use crate::error::{BoardError, SubmitError};
use encoding_rs::Encoding;
use std::time::Duration;

/// Marker boards print when a post was accepted.
const SUCCESS_MARKER: &str = "書きこみました";
/// Marker for a thread that has been closed to new posts.
const THREAD_STOP_MARKER: &str = "スレッドストップ";
/// Rate-limit messages read "...あと N 秒お待ちください".
const COOLDOWN_PREFIX: &str = "あと";
const COOLDOWN_SUFFIX: &str = "秒";
/// Upper bound on diagnostic text kept from an error page.
const MAX_DIAGNOSTIC_LEN: usize = 400;

/// Build an HTTP client with timeout and user agent applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("chit/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// GET `url` and decode the body from the board's charset.
pub(super) async fn get_text(
    http: &reqwest::Client,
    url: &str,
    encoding: &'static Encoding,
) -> Result<String, BoardError> {
    tracing::debug!(url, "board GET");
    let response = http.get(url).send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    let text = decode(&bytes, encoding);
    if !status.is_success() {
        return Err(BoardError::Status(status.as_u16(), diagnostic_excerpt(&text)));
    }
    Ok(text)
}

/// POST a form encoded in the board's charset and classify the reply.
pub(super) async fn post_form(
    http: &reqwest::Client,
    url: &str,
    referer: &str,
    encoding: &'static Encoding,
    fields: &[(&str, &str)],
) -> Result<(), SubmitError> {
    tracing::debug!(url, "board POST");
    let response = http
        .post(url)
        .header(reqwest::header::REFERER, referer)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(encode_form(fields, encoding))
        .send()
        .await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    classify_submit_response(status.is_success(), &decode(&bytes, encoding))
}

/// Decode board bytes, replacing malformed sequences.
pub(super) fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Encode `key=value&...` with values transcoded to `encoding`.
///
/// Characters the charset cannot represent become numeric character
/// references, which boards render back as the original character.
pub(super) fn encode_form(fields: &[(&str, &str)], encoding: &'static Encoding) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            let (bytes, _, _) = encoding.encode(value);
            format!("{key}={}", urlencoding::encode_binary(&bytes))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Map a submission reply onto success or a typed failure.
pub(super) fn classify_submit_response(success: bool, body: &str) -> Result<(), SubmitError> {
    if body.contains(SUCCESS_MARKER) {
        return Ok(());
    }
    if let Some(seconds) = parse_cooldown_secs(body) {
        return Err(SubmitError::RateLimited {
            cooldown: Duration::from_secs(seconds),
        });
    }
    if body.contains(THREAD_STOP_MARKER) {
        return Err(SubmitError::ThreadStopped);
    }
    if success {
        tracing::warn!("board accepted the post without a success message");
        return Ok(());
    }
    Err(SubmitError::Rejected(diagnostic_excerpt(body)))
}

/// Extract `N` from "...あと N 秒...".
fn parse_cooldown_secs(body: &str) -> Option<u64> {
    let (_, after) = body.split_once(COOLDOWN_PREFIX)?;
    let after = after.trim_start();
    let digits_len = after
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(after.len(), |(idx, _)| idx);
    if digits_len == 0 {
        return None;
    }
    let (digits, rest) = after.split_at(digits_len);
    if !rest.trim_start().starts_with(COOLDOWN_SUFFIX) {
        return None;
    }
    digits.parse().ok()
}

/// Strip tags and collapse whitespace so error pages read as one line.
fn diagnostic_excerpt(body: &str) -> String {
    let fragment = scraper::Html::parse_fragment(body);
    let text = fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    text.chars().take(MAX_DIAGNOSTIC_LEN).collect()
}

/// Parse a `TITLE(COUNT)` / `TITLE (COUNT)` listing entry.
pub(super) fn split_title_count(entry: &str) -> Option<(String, u32)> {
    let entry = entry.trim_end();
    let inner = entry.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let count = inner[open + 1..].trim().parse().ok()?;
    Some((inner[..open].trim_end().to_string(), count))
}
