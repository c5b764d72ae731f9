//! Orchestration of the active conversation.
//!
//! Every accepted user message runs one strict sequence: append the user
//! turn, ask the response provider for a reply (or synthesize a visible
//! error turn), write the transcript through to the local cache
//! (unconditionally), then mirror it to the remote archive (best-effort,
//! create-if-unbound / update-if-bound). The local tier is the availability
//! guarantee; the remote tier is a lagging mirror whose failures are logged
//! and swallowed. The next successful submit rewrites the full transcript
//! and is the de facto retry.

use crate::archive::RemoteArchive;
use crate::cache::LocalCache;
use crate::providers::ResponseProvider;
use crate::session::types::{ArchivedSession, Message};
use crate::util;

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Result of a `submit` call. Both reject paths are silent: blank input is
/// a no-op and a second submission while a provider call is in flight is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    EmptyInput,
    Busy,
}

/// Explicit state of the one active conversation.
///
/// `remote_id` is `None` until the first successful archive create; once
/// bound it stays stable for the session's lifetime and every later
/// persistence targets the same document.
#[derive(Debug, Default)]
struct ActiveSession {
    messages: Vec<Message>,
    remote_id: Option<String>,
}

pub struct SessionController {
    cache: Arc<dyn LocalCache>,
    archive: Arc<dyn RemoteArchive>,
    provider: Arc<dyn ResponseProvider>,
    state: Mutex<ActiveSession>,
    pending: AtomicBool,
}

impl SessionController {
    pub fn new(
        cache: Arc<dyn LocalCache>,
        archive: Arc<dyn RemoteArchive>,
        provider: Arc<dyn ResponseProvider>,
    ) -> Self {
        Self {
            cache,
            archive,
            provider,
            state: Mutex::new(ActiveSession::default()),
            pending: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current transcript, for the UI to render.
    pub fn transcript(&self) -> Vec<Message> {
        self.state
            .lock()
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// The bound archive document id, if this session has been persisted
    /// remotely.
    pub fn remote_id(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.remote_id.clone())
    }

    /// Whether a provider round-trip is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Submit a user message and run one full turn.
    ///
    /// Returns `Err` only when the local cache write fails; that is the
    /// last durability tier and its failure must reach the user. Provider
    /// failures become a visible `Error: <cause>` bot turn; remote archive
    /// failures are logged and swallowed.
    pub async fn submit(&self, user_text: &str) -> Result<SubmitOutcome> {
        let text = user_text.trim();
        if text.is_empty() {
            return Ok(SubmitOutcome::EmptyInput);
        }

        // At most one in-flight provider call; a concurrent submit is ignored.
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("submit ignored: a provider call is already in flight");
            return Ok(SubmitOutcome::Busy);
        }

        let result = self.run_turn(text).await;
        self.pending.store(false, Ordering::Release);

        result.map(|()| SubmitOutcome::Completed)
    }

    async fn run_turn(&self, text: &str) -> Result<()> {
        tracing::debug!("User turn: {}", util::preview(text, 80));
        let outgoing = self.with_state(|s| {
            s.messages.push(Message::user(text));
            s.messages.clone()
        })?;

        let reply = match self.provider.reply(&outgoing).await {
            Ok(reply) => Message::bot(reply),
            Err(e) => {
                tracing::warn!("Provider call failed: {e}");
                Message::bot(format!("Error: {e}"))
            }
        };

        let (transcript, remote_id) = self.with_state(|s| {
            s.messages.push(reply);
            (s.messages.clone(), s.remote_id.clone())
        })?;

        // Local tier, unconditionally: the user's message and any error
        // annotation must survive a restart even when the provider failed.
        let local = self
            .cache
            .save(&transcript)
            .await
            .context("persisting transcript to local cache");

        // Remote tier still gets its attempt when the local write failed;
        // the step order is unconditional.
        self.persist_remote(&transcript, remote_id).await;

        local
    }

    async fn persist_remote(&self, transcript: &[Message], remote_id: Option<String>) {
        match remote_id {
            Some(id) => {
                if let Err(e) = self.archive.update(&id, transcript).await {
                    tracing::warn!(session = %id, "Remote archive update failed: {e}");
                }
            }
            None => match self.archive.create(transcript, &util::now_rfc3339()).await {
                Ok(id) => {
                    tracing::info!(session = %id, "Session archived remotely");
                    let _ = self.with_state(|s| s.remote_id = Some(id));
                }
                Err(e) => {
                    // Session stays unbound; the next submit attempts
                    // create again with the full transcript.
                    tracing::warn!("Remote archive create failed: {e}");
                }
            },
        }
    }

    /// Start a fresh conversation: empty transcript, no remote binding, and
    /// a cleared local cache. Remote history is left untouched.
    ///
    /// Returns `false` when rejected because a submit is in flight. A cache
    /// clear failure is surfaced, but in-memory state is reset regardless.
    pub async fn start_new(&self) -> Result<bool> {
        if self.is_pending() {
            return Ok(false);
        }
        self.with_state(|s| {
            s.messages.clear();
            s.remote_id = None;
        })?;
        self.cache.clear().await.context("clearing local cache")?;
        Ok(true)
    }

    /// Swap the active transcript to an archived session (side-loading, not
    /// merging) and bind its remote id, so the next submit updates rather
    /// than creates. The local cache is not written until that submit.
    ///
    /// Returns `false` when rejected because a submit is in flight.
    pub fn restore(&self, session: ArchivedSession) -> bool {
        if self.is_pending() {
            return false;
        }
        self.with_state(|s| {
            s.messages = session.messages;
            s.remote_id = Some(session.id);
        })
        .is_ok()
    }

    /// Load the cached transcript at startup, if one exists.
    ///
    /// A cached copy carries no remote binding, so a resumed session gets a
    /// fresh archive document on its next persisted turn.
    pub async fn resume_from_cache(&self) -> Result<bool> {
        if self.is_pending() {
            return Ok(false);
        }
        match self
            .cache
            .load()
            .await
            .context("loading cached transcript")?
        {
            Some(messages) if !messages.is_empty() => {
                self.with_state(|s| {
                    s.messages = messages;
                    s.remote_id = None;
                })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ActiveSession) -> T) -> Result<T> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("session state lock poisoned: {e}"))?;
        Ok(f(&mut guard))
    }
}
