// Session State Synchronizer
//
// Owns the conversation state, talks to the quotation backend and publishes
// every state transition. State sits behind a std mutex that is never held
// across an await point.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{SyncBroadcaster, SyncEvent};
use super::guard::{InFlightGuard, InFlightLatch};
use super::state::ChatState;
use crate::api::{ApiError, ChatBackend};
use crate::utils::{lock_mutex_recover, non_blank};

// ============================================================================
// Outcomes
// ============================================================================

/// Why a send was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    Blank,
    InFlight,
    /// The order is complete; the conversation takes no further input
    Complete,
}

/// What happened to a `send_message` call
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Nothing was sent and state is untouched
    Ignored(IgnoredReason),
    /// The reply was applied
    Delivered { step: u8 },
    /// The backend call failed; the transcript carries an error bubble
    Failed(ApiError),
    /// The reply arrived after a reset and was dropped
    Discarded,
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

#[derive(Debug, Clone, Error)]
pub enum ResumeError {
    #[error("A request is already in flight")]
    InFlight,

    #[error("Session id must not be empty")]
    EmptySessionId,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Conversation was reset while the session was loading")]
    Superseded,
}

// ============================================================================
// Shared state
// ============================================================================

struct Inner {
    state: ChatState,
    /// Bumped on reset; work started under an older epoch is dropped
    epoch: u64,
}

struct Shared<B> {
    inner: Mutex<Inner>,
    latch: InFlightLatch,
    events: SyncBroadcaster,
    backend: B,
    history_limit: Option<usize>,
}

impl<B> Shared<B> {
    /// Apply `f` as a single transition, broadcasting the new snapshot if it
    /// changed anything. With `Some(epoch)`, does nothing unless the epoch is
    /// still current.
    fn mutate<R>(&self, epoch: Option<u64>, f: impl FnOnce(&mut ChatState) -> R) -> Option<R> {
        let (result, changed) = {
            let mut inner = lock_mutex_recover(&self.inner);
            if epoch.is_some_and(|e| e != inner.epoch) {
                return None;
            }
            let before = inner.state.clone();
            let result = f(&mut inner.state);
            let changed = (inner.state != before).then(|| inner.state.clone());
            (result, changed)
        };

        if let Some(snapshot) = changed {
            self.events.broadcast(SyncEvent::StateChanged(snapshot));
        }
        Some(result)
    }

    /// Take the in-flight latch and run `f` under the state lock.
    ///
    /// Reset releases the latch under the same lock, so a request either
    /// starts wholly before a reset or wholly after it. If `f` refuses, the
    /// latch is released and state is untouched.
    fn begin<R>(
        &self,
        f: impl FnOnce(&mut ChatState) -> Result<R, IgnoredReason>,
    ) -> Result<(InFlightGuard<'_>, u64, R), IgnoredReason> {
        let (guard, epoch, result, changed) = {
            let mut inner = lock_mutex_recover(&self.inner);
            let guard = self.latch.try_acquire().ok_or(IgnoredReason::InFlight)?;
            let before = inner.state.clone();
            let result = f(&mut inner.state)?;
            let changed = (inner.state != before).then(|| inner.state.clone());
            (guard, inner.epoch, result, changed)
        };

        if let Some(snapshot) = changed {
            self.events.broadcast(SyncEvent::StateChanged(snapshot));
        }
        Ok((guard, epoch, result))
    }
}

/// Clears `is_loading` when dropped, so a cancelled or panicking request never
/// leaves the studio stuck in the loading state
struct LoadingTicket<'a, B> {
    shared: &'a Shared<B>,
    epoch: u64,
}

impl<B> Drop for LoadingTicket<'_, B> {
    fn drop(&mut self) {
        self.shared
            .mutate(Some(self.epoch), |state| state.is_loading = false);
    }
}

// ============================================================================
// Synchronizer
// ============================================================================

/// Cloneable handle over one conversation.
///
/// All clones share the same state, latch and event channel.
pub struct SessionSynchronizer<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for SessionSynchronizer<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: ChatBackend> SessionSynchronizer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_history_limit(backend, None)
    }

    /// `history_limit` caps the transcript fetched by [`Self::resume_session`]
    pub fn with_history_limit(backend: B, history_limit: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ChatState::default(),
                    epoch: 0,
                }),
                latch: InFlightLatch::new(),
                events: SyncBroadcaster::new(),
                backend,
                history_limit,
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ChatState {
        lock_mutex_recover(&self.shared.inner).state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.shared.events.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        self.shared.latch.is_held()
    }

    /// Send a user message to the assistant.
    ///
    /// Blank text, calls made while another request is outstanding and
    /// messages after the order is complete are ignored. Failures never
    /// escape: they land in the transcript as an error bubble and in `error`.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let Some(text) = non_blank(text) else {
            return SendOutcome::Ignored(IgnoredReason::Blank);
        };

        let request_id = Uuid::new_v4().to_string();
        let started = self.shared.begin(|state| {
            if state.is_complete {
                return Err(IgnoredReason::Complete);
            }
            state.begin_send(text, &request_id);
            Ok(state.session_id.clone())
        });
        let (_guard, epoch, session_id) = match started {
            Ok(started) => started,
            Err(reason) => {
                log::debug!("Send ignored: {:?}", reason);
                return SendOutcome::Ignored(reason);
            }
        };
        let _loading = LoadingTicket {
            shared: self.shared.as_ref(),
            epoch,
        };

        log::debug!(
            "Sending message {} (session {:?})",
            request_id,
            session_id
        );
        let result = self
            .shared
            .backend
            .send_message(text, session_id.as_deref())
            .await;

        match result {
            Ok(reply) => {
                let step = self.shared.mutate(Some(epoch), |state| {
                    state.apply_reply(reply, &request_id);
                    state.current_step
                });
                match step {
                    Some(step) => {
                        log::info!("Assistant replied at step {}", step);
                        SendOutcome::Delivered { step }
                    }
                    None => {
                        log::info!("Dropping reply {} that arrived after a reset", request_id);
                        SendOutcome::Discarded
                    }
                }
            }
            Err(err) => {
                log::error!("Failed to send message: {}", err);
                let applied = self
                    .shared
                    .mutate(Some(epoch), |state| state.record_failure(&err, &request_id));
                match applied {
                    Some(()) => SendOutcome::Failed(err),
                    None => SendOutcome::Discarded,
                }
            }
        }
    }

    /// Start over: best-effort remote reset, then clear everything local.
    ///
    /// Local state is cleared before the remote call so a reply still in
    /// flight can no longer land. Remote failures are logged and swallowed.
    pub async fn reset_chat(&self) {
        let previous_session = {
            let mut inner = lock_mutex_recover(&self.shared.inner);
            inner.epoch += 1;
            self.shared.latch.force_release();
            std::mem::take(&mut inner.state).session_id
        };
        self.shared.events.broadcast(SyncEvent::Reset);
        self.shared
            .events
            .broadcast(SyncEvent::StateChanged(ChatState::default()));

        if let Some(session_id) = previous_session {
            match self.shared.backend.reset_session(&session_id).await {
                Ok(_) => log::info!("Reset session {}", session_id),
                Err(e) => log::warn!("Remote reset of session {} failed: {}", session_id, e),
            }
        }
    }

    /// Dismiss the current error without touching anything else
    pub fn clear_error(&self) {
        self.shared.mutate(None, |state| state.error = None);
    }

    /// Load an existing session and its transcript from the backend,
    /// replacing local state.
    pub async fn resume_session(&self, session_id: &str) -> Result<(), ResumeError> {
        let session_id = non_blank(session_id).ok_or(ResumeError::EmptySessionId)?;
        let (_guard, epoch, ()) = self
            .shared
            .begin(|state| {
                state.is_loading = true;
                state.error = None;
                Ok(())
            })
            .map_err(|_| ResumeError::InFlight)?;
        let _loading = LoadingTicket {
            shared: self.shared.as_ref(),
            epoch,
        };

        let backend = &self.shared.backend;
        let fetched = async {
            let info = backend.get_session(session_id).await?;
            let history = backend
                .get_history(session_id, self.shared.history_limit)
                .await?;
            Ok::<_, ApiError>((info, history))
        }
        .await;

        match fetched {
            Ok((info, history)) => {
                let count = history.messages.len();
                self.shared
                    .mutate(Some(epoch), |state| state.restore(info, history))
                    .ok_or(ResumeError::Superseded)?;
                log::info!("Resumed session {} with {} messages", session_id, count);
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to resume session {}: {}", session_id, err);
                self.shared.mutate(Some(epoch), |state| {
                    state.error = Some(err.to_string());
                    state.is_loading = false;
                });
                Err(err.into())
            }
        }
    }
}
