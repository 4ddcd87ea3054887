//! The interactive loop for one thread.
//!
//! A [`Session`] alternates between polling the board for new posts and
//! waiting (bounded) for a line from the console. Everything happens on one
//! task: fetches, submissions and cooldown sleeps are awaited in sequence, so
//! thread, cursor and poll time are only ever touched here.

use crate::board::{BoardClient, PostDraft, RateLimitRetryPolicy, ThreadSummary, THREAD_CAPACITY};
use crate::config::{DEFAULT_MAIL, DEFAULT_POLL_INTERVAL_SECS};
use crate::error::{ResolveError, SessionError, SubmitError};
use crate::resolve::{search_threads, DisplayPrefs, Resolution};
use crate::tui::settings::thread_prompt_text;
use crate::tui::{render_post, Console, LineEvent, NoticeLevel};
use std::time::Duration;
use tokio::time::Instant;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Active,
    /// The active thread hit capacity; a successor is about to be resolved.
    PostFull,
    Terminated,
}

/// Per-session settings taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    /// Author name for submitted posts; empty posts anonymously.
    pub name: String,
    pub mail: String,
    pub color: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            name: String::new(),
            mail: DEFAULT_MAIL.to_string(),
            color: false,
        }
    }
}

/// One attached thread plus the console it is shown on.
pub struct Session<'a> {
    /// Original spec text, re-resolved on rollover.
    spec_text: String,
    board: &'a dyn BoardClient,
    console: &'a mut dyn Console,
    retry: RateLimitRetryPolicy,
    options: SessionOptions,
    thread: ThreadSummary,
    /// Number of the next post to fetch.
    cursor: u32,
    /// `None` forces a poll on the next iteration.
    last_poll: Option<Instant>,
    prefs: DisplayPrefs,
    prompt: String,
    phase: Phase,
}

impl<'a> Session<'a> {
    /// Attach to the first candidate of an initial resolution.
    pub fn new(
        spec_text: impl Into<String>,
        board: &'a dyn BoardClient,
        console: &'a mut dyn Console,
        resolution: Resolution,
        options: SessionOptions,
    ) -> Self {
        let prefs = resolution.prefs;
        let thread = resolution.into_first();
        let prompt = thread_prompt_text(&thread.title);
        Self {
            spec_text: spec_text.into(),
            board,
            console,
            retry: RateLimitRetryPolicy,
            options,
            thread,
            cursor: 1,
            last_poll: None,
            prefs,
            prompt,
            phase: Phase::Active,
        }
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn thread(&self) -> &ThreadSummary {
        &self.thread
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run until end of input or a fatal error.
    ///
    /// History is saved and the terminal restored on every exit path.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let outcome = self.drive().await;
        if let Err(err) = &outcome {
            tracing::debug!(error = %err, "session ended with an error");
        }
        self.shutdown();
        outcome
    }

    async fn drive(&mut self) -> Result<(), SessionError> {
        self.console.install(&self.prompt)?;
        while self.phase != Phase::Terminated {
            self.step().await?;
        }
        Ok(())
    }

    /// One scheduler iteration: rollover check, poll, bounded input wait.
    pub async fn step(&mut self) -> Result<(), SessionError> {
        // A failed rollover is retried once a poll interval has passed.
        if self.cursor > THREAD_CAPACITY && (self.phase != Phase::PostFull || self.poll_due()) {
            self.rollover().await?;
        }
        if self.phase == Phase::Active && self.poll_due() {
            self.poll().await?;
        }

        match self.console.poll_line(self.input_wait()).await? {
            None => {}
            Some(LineEvent::Line(line)) => self.handle_line(line).await?,
            Some(LineEvent::Eof) => {
                self.console.uninstall()?;
                self.phase = Phase::Terminated;
            }
        }
        Ok(())
    }

    fn poll_due(&self) -> bool {
        match self.last_poll {
            Some(at) => at.elapsed() >= self.options.poll_interval,
            None => true,
        }
    }

    /// Time left until the next scheduled poll.
    fn input_wait(&self) -> Duration {
        match self.last_poll {
            Some(at) => self.options.poll_interval.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        }
    }

    async fn poll(&mut self) -> Result<(), SessionError> {
        let result = self.board.fetch_posts(self.thread.id, self.cursor).await;
        self.last_poll = Some(Instant::now());

        let posts = match result {
            Ok(posts) => posts,
            Err(err) => {
                tracing::debug!(thread = self.thread.id, error = %err, "fetch failed");
                self.console
                    .report(NoticeLevel::Error, &format!("fetch failed: {err}"));
                return Ok(());
            }
        };
        tracing::debug!(
            thread = self.thread.id,
            from = self.cursor,
            fetched = posts.len(),
            "polled thread"
        );

        for post in posts {
            self.cursor += 1;
            if self.prefs.last10 && post.no.saturating_add(10) < self.thread.last {
                continue;
            }
            let text = render_post(&post, &self.prefs, self.options.color);
            self.console.print_above(&text)?;
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: String) -> Result<(), SessionError> {
        if line.is_empty() {
            self.last_poll = None;
            return Ok(());
        }

        self.console.add_history(&line);
        let draft = PostDraft {
            name: self.options.name.clone(),
            mail: self.options.mail.clone(),
            body: line,
        };
        let console = &mut *self.console;
        let result = self
            .retry
            .submit(self.board, &self.thread, &draft, |cooldown| {
                console.report(
                    NoticeLevel::Info,
                    &format!("rate limited; retrying in {}s", cooldown.as_secs()),
                );
            })
            .await;

        match result {
            Ok(()) => self.last_poll = None,
            Err(SubmitError::ThreadStopped) => return Err(SessionError::ThreadStopped),
            Err(err) => {
                tracing::debug!(thread = self.thread.id, error = %err, "submit failed");
                self.console
                    .report(NoticeLevel::Error, &format!("post failed: {err}"));
            }
        }
        Ok(())
    }

    /// Move to the next thread matching the original spec.
    async fn rollover(&mut self) -> Result<(), SessionError> {
        self.phase = Phase::PostFull;
        tracing::info!(thread = self.thread.id, "thread full; re-resolving");
        self.console.report(
            NoticeLevel::Warn,
            &format!("thread full: {}", self.thread.title),
        );

        self.phase = Phase::Resolving;
        let next = match search_threads(&self.spec_text, self.board).await {
            Ok(resolution) => resolution.into_first(),
            Err(ResolveError::Board(err)) => {
                tracing::debug!(thread = self.thread.id, error = %err, "rollover listing failed");
                self.console
                    .report(NoticeLevel::Error, &format!("could not find next thread: {err}"));
                self.phase = Phase::PostFull;
                self.last_poll = Some(Instant::now());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        tracing::info!(from = self.thread.id, to = next.id, "rolled over");
        self.console
            .report(NoticeLevel::Info, &format!("moved to {}", next.title));

        self.prompt = thread_prompt_text(&next.title);
        self.console.set_prompt(&self.prompt)?;
        self.thread = next;
        self.cursor = 1;
        self.last_poll = None;
        self.phase = Phase::Active;
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Err(err) = self.console.save_history() {
            self.console.report(
                NoticeLevel::Warn,
                &format!("could not save history: {err}"),
            );
        }
        self.console.restore_terminal();
    }
}
