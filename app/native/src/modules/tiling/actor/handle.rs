//! Handle for communicating with the state actor.
//!
//! The `StateActorHandle` provides a safe, cloneable interface for forwarding
//! host events, issuing split commands and querying state.

use tokio::sync::{mpsc, oneshot};

use super::messages::{QueryResult, StateMessage, StateQuery};
use crate::error::TabsplitError;
use crate::modules::tiling::commands::SplitRequest;
use crate::modules::tiling::reflow::ReflowReport;
use crate::modules::tiling::state::{Display, TabId};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,
}

/// Handle for communicating with the state actor.
///
/// This handle is cheap to clone and can be shared across threads.
#[derive(Clone, Debug)]
pub struct StateActorHandle {
    sender: mpsc::Sender<StateMessage>,
}

impl StateActorHandle {
    /// Create a new handle with the given sender.
    pub(crate) const fn new(sender: mpsc::Sender<StateMessage>) -> Self { Self { sender } }

    // ========================================================================
    // Events
    // ========================================================================

    /// Send a message to the actor and wait for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    async fn send(&self, msg: StateMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    /// Forwards a tab activation event.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn tab_activated(&self, tab_id: TabId) -> Result<(), ActorError> {
        self.send(StateMessage::TabActivated { tab_id }).await
    }

    /// Forwards a tab removal event.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn tab_removed(&self, tab_id: TabId) -> Result<(), ActorError> {
        self.send(StateMessage::TabRemoved { tab_id }).await
    }

    /// Forwards a window focus change.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn window_focus_changed(&self) -> Result<(), ActorError> {
        self.send(StateMessage::WindowFocusChanged).await
    }

    /// Forwards a display configuration change.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed.
    pub async fn display_changed(&self) -> Result<(), ActorError> {
        self.send(StateMessage::DisplayChanged).await
    }

    /// Asks the actor to stop after the messages already queued.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has already stopped.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        self.send(StateMessage::Shutdown).await
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs a split command and waits for the reflow to finish.
    ///
    /// Runs queued behind earlier messages; a run never overlaps another one.
    ///
    /// # Errors
    ///
    /// Returns [`TabsplitError::Actor`] if communication fails, or
    /// [`TabsplitError::Reflow`] if the run was aborted by a host failure.
    pub async fn split(&self, request: SplitRequest) -> Result<ReflowReport, TabsplitError> {
        let (tx, rx) = oneshot::channel();

        self.send(StateMessage::Split { request, respond_to: tx }).await?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)?
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Execute a query and wait for the result.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the channel is closed, or
    /// [`ActorError::ReceiveFailed`] if the response channel is closed.
    pub async fn query(&self, query: StateQuery) -> Result<QueryResult, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(StateMessage::Query { query, respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// Get the activation history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn history(&self) -> Result<Vec<TabId>, ActorError> {
        self.query(StateQuery::History)
            .await?
            .into_history()
            .ok_or(ActorError::ReceiveFailed)
    }

    /// Get the cached reference display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn display(&self) -> Result<Option<Display>, ActorError> {
        self.query(StateQuery::Display)
            .await?
            .into_display()
            .ok_or(ActorError::ReceiveFailed)
    }
}

// ============================================================================
// Tests
// ============================================================================
