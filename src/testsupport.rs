//! Shared test fixtures for board, resolver and session test modules.
//!
//! Keeping the scripted collaborators and the HTTP fixture here prevents each
//! test module from rebuilding ad-hoc fakes.

use crate::board::{BoardClient, Post, PostDraft, ThreadSummary};
use crate::error::{BoardError, SubmitError};
use crate::tui::{Console, LineEvent, NoticeLevel};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::Instant;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("chit-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

// ---------------------------------------------------------------------------
// Scripted board
// ---------------------------------------------------------------------------

/// One recorded `submit` call.
#[derive(Debug, Clone)]
pub struct SubmitRecord {
    pub at: Instant,
    pub thread_id: u64,
    pub draft: PostDraft,
}

#[derive(Default)]
struct BoardScript {
    threads: Vec<ThreadSummary>,
    posts: HashMap<u64, Vec<Post>>,
    growth: HashMap<u64, VecDeque<u32>>,
    fetch_failures: VecDeque<BoardError>,
    list_failures: VecDeque<BoardError>,
    submit_results: VecDeque<Result<(), SubmitError>>,
    list_calls: usize,
    lookup_calls: Vec<u64>,
    fetch_calls: Vec<(u64, u32)>,
    fetch_times: Vec<Instant>,
    submits: Vec<SubmitRecord>,
}

impl BoardScript {
    fn append_post(&mut self, thread_id: u64, name: &str, mail: &str, body: String) {
        let posts = self.posts.entry(thread_id).or_default();
        let no = posts.len() as u32 + 1;
        posts.push(Post {
            no,
            name: name.to_string(),
            mail: mail.to_string(),
            date: "2024/01/01(月) 12:00:00".into(),
            poster_id: None,
            body,
        });
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.last = thread.last.max(no);
        }
    }
}

/// In-memory board driven by a script instead of the network.
///
/// Successful submissions append a post to the thread, so sessions see their
/// own posts on the next poll.
pub struct ScriptedBoard {
    script: Mutex<BoardScript>,
}

impl ScriptedBoard {
    pub fn new(threads: Vec<ThreadSummary>) -> Self {
        Self {
            script: Mutex::new(BoardScript {
                threads,
                ..BoardScript::default()
            }),
        }
    }

    /// Before each fetch of `thread_id`, append the next count of posts.
    pub fn grow_on_fetch(&self, thread_id: u64, counts: Vec<u32>) {
        self.lock().growth.insert(thread_id, counts.into());
    }

    /// Fail the next fetch (of any thread) with `err`.
    pub fn fail_next_fetch(&self, err: BoardError) {
        self.lock().fetch_failures.push_back(err);
    }

    /// Fail the next thread listing with `err`.
    pub fn fail_next_list(&self, err: BoardError) {
        self.lock().list_failures.push_back(err);
    }

    /// Add a post as the board would serve it, number included.
    pub fn insert_post(&self, thread_id: u64, post: Post) {
        self.lock().posts.entry(thread_id).or_default().push(post);
    }

    /// Results for upcoming submissions; once exhausted, submissions succeed.
    pub fn script_submits(&self, results: Vec<Result<(), SubmitError>>) {
        self.lock().submit_results.extend(results);
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn lookup_calls(&self) -> Vec<u64> {
        self.lock().lookup_calls.clone()
    }

    /// `(thread_id, from)` for every fetch, in order.
    pub fn fetch_calls(&self) -> Vec<(u64, u32)> {
        self.lock().fetch_calls.clone()
    }

    pub fn fetch_times(&self) -> Vec<Instant> {
        self.lock().fetch_times.clone()
    }

    pub fn submits(&self) -> Vec<SubmitRecord> {
        self.lock().submits.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardScript> {
        self.script.lock().expect("board script poisoned")
    }
}

#[async_trait]
impl BoardClient for ScriptedBoard {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, BoardError> {
        let mut script = self.lock();
        script.list_calls += 1;
        if let Some(err) = script.list_failures.pop_front() {
            return Err(err);
        }
        Ok(script.threads.clone())
    }

    async fn thread_by_id(&self, id: u64) -> Result<Option<ThreadSummary>, BoardError> {
        let mut script = self.lock();
        script.lookup_calls.push(id);
        Ok(script.threads.iter().find(|t| t.id == id).cloned())
    }

    async fn fetch_posts(&self, thread_id: u64, from: u32) -> Result<Vec<Post>, BoardError> {
        let mut script = self.lock();
        script.fetch_calls.push((thread_id, from));
        script.fetch_times.push(Instant::now());
        if let Some(err) = script.fetch_failures.pop_front() {
            return Err(err);
        }
        let grow = script
            .growth
            .get_mut(&thread_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(0);
        for _ in 0..grow {
            let no = script.posts.get(&thread_id).map_or(0, Vec::len) + 1;
            script.append_post(thread_id, "名無し", "", format!("post {no}"));
        }
        Ok(script
            .posts
            .get(&thread_id)
            .map(|posts| posts.iter().filter(|p| p.no >= from).cloned().collect())
            .unwrap_or_default())
    }

    async fn submit(&self, thread_id: u64, draft: &PostDraft) -> Result<(), SubmitError> {
        let mut script = self.lock();
        script.submits.push(SubmitRecord {
            at: Instant::now(),
            thread_id,
            draft: draft.clone(),
        });
        let result = script.submit_results.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            script.append_post(thread_id, &draft.name, &draft.mail, draft.body.clone());
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Scripted console
// ---------------------------------------------------------------------------

/// Console fed from a queue of input outcomes, recording everything shown.
///
/// `None` in the queue means "no input for the whole wait"; once the queue
/// is empty the console reports end of input.
#[derive(Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<Option<LineEvent>>,
    pub printed: Vec<String>,
    pub reports: Vec<(NoticeLevel, String)>,
    pub prompts: Vec<String>,
    pub history: Vec<String>,
    pub installed: bool,
    pub uninstalled: bool,
    pub saved: bool,
    pub restored: bool,
    pub fail_save: bool,
}

impl ScriptedConsole {
    pub fn new(inputs: Vec<Option<LineEvent>>) -> Self {
        Self {
            inputs: inputs.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn install(&mut self, prompt: &str) -> io::Result<()> {
        self.installed = true;
        self.prompts.push(prompt.to_string());
        Ok(())
    }

    fn set_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.prompts.push(prompt.to_string());
        Ok(())
    }

    async fn poll_line(&mut self, timeout: Duration) -> io::Result<Option<LineEvent>> {
        match self.inputs.pop_front() {
            Some(Some(event)) => Ok(Some(event)),
            Some(None) => {
                tokio::time::sleep(timeout).await;
                Ok(None)
            }
            None => Ok(Some(LineEvent::Eof)),
        }
    }

    fn print_above(&mut self, text: &str) -> io::Result<()> {
        self.printed.push(text.to_string());
        Ok(())
    }

    fn report(&mut self, level: NoticeLevel, message: &str) {
        self.reports.push((level, message.to_string()));
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn uninstall(&mut self) -> io::Result<()> {
        self.uninstalled = true;
        Ok(())
    }

    fn save_history(&mut self) -> io::Result<()> {
        if self.fail_save {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.saved = true;
        Ok(())
    }

    fn restore_terminal(&mut self) {
        self.restored = true;
    }
}

// ---------------------------------------------------------------------------
// HTTP fixture
// ---------------------------------------------------------------------------

/// One canned HTTP response.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// Status line tail, e.g. `200 OK`.
    pub status: &'static str,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            body,
        }
    }
}

/// Local server answering one connection per canned response, in order.
pub struct HttpFixture {
    pub base_url: String,
    requests: Arc<tokio::sync::Mutex<Vec<String>>>,
}

impl HttpFixture {
    /// Raw requests received so far (head and body, lossily decoded).
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

pub async fn serve_http(responses: Vec<CannedResponse>) -> HttpFixture {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let requests = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let raw = read_request(&mut stream).await;
            recorded
                .lock()
                .await
                .push(String::from_utf8_lossy(&raw).into_owned());

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                response.status,
                response.body.len()
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&response.body).await;
            let _ = stream.shutdown().await;
        }
    });

    HttpFixture {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Read request head plus a `Content-Length` body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find_subsequence(&raw, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if raw.len() >= head_end + 4 + length {
                break;
            }
        }
    }
    raw
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
