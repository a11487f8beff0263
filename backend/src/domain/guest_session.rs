//! Guest sessions: people without an account join an expense by scanning a
//! QR code that points at a session on the backend.
//!
//! A [`GuestSessionWatcher`] opens the session, polls the joined-guest list in
//! the background and publishes every change over a `watch` channel. Closing
//! the watcher stops polling and deletes the session; dropping it without
//! closing only stops polling.

use async_trait::async_trait;
use log::{debug, info, warn};
use shared::{CreateGuestSessionResponse, Guest, GuestListResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::errors::ApiError;

#[async_trait]
pub trait GuestSessionClient: Send + Sync {
    async fn create_guest_session(&self) -> Result<CreateGuestSessionResponse, ApiError>;

    async fn list_guests(&self, session_id: &str) -> Result<GuestListResponse, ApiError>;

    async fn delete_guest_session(&self, session_id: &str) -> Result<(), ApiError>;
}

/// URL encoded in the QR code for a session
pub fn join_url(join_base_url: &str, session_id: &str) -> String {
    format!("{}/{}", join_base_url.trim_end_matches('/'), session_id)
}

pub struct GuestSessionWatcher {
    client: Arc<dyn GuestSessionClient>,
    session_id: String,
    join_url: String,
    guests: watch::Receiver<Vec<Guest>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl GuestSessionWatcher {
    /// Create a session and start polling it every `poll_interval`
    pub async fn open(
        client: Arc<dyn GuestSessionClient>,
        join_base_url: &str,
        poll_interval: Duration,
    ) -> Result<Self, ApiError> {
        let session = client.create_guest_session().await?;
        let session_id = session.session_id;
        let join_url = join_url(join_base_url, &session_id);
        info!("Opened guest session {} ({})", session_id, join_url);

        let (guests_tx, guests_rx) = watch::channel(Vec::new());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(poll_guests(
            client.clone(),
            session_id.clone(),
            poll_interval,
            guests_tx,
            shutdown_rx,
        ));

        Ok(Self {
            client,
            session_id,
            join_url,
            guests: guests_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn join_url(&self) -> &str {
        &self.join_url
    }

    /// Guests seen by the latest successful poll
    pub fn guests(&self) -> Vec<Guest> {
        self.guests.borrow().clone()
    }

    /// Receiver that is notified whenever the guest list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Guest>> {
        self.guests.clone()
    }

    /// Stop polling and delete the session on the backend
    pub async fn close(mut self) -> Result<Vec<Guest>, ApiError> {
        self.stop_polling().await;
        let guests = self.guests();

        self.client.delete_guest_session(&self.session_id).await?;
        info!("Closed guest session {} with {} guests", self.session_id, guests.len());
        Ok(guests)
    }

    async fn stop_polling(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Guest polling task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for GuestSessionWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Guest session {} dropped without close, stopping poll", self.session_id);
            task.abort();
        }
    }
}

async fn poll_guests(
    client: Arc<dyn GuestSessionClient>,
    session_id: String,
    poll_interval: Duration,
    guests_tx: watch::Sender<Vec<Guest>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                match client.list_guests(&session_id).await {
                    Ok(response) => {
                        let changed = guests_tx.send_if_modified(|current| {
                            if *current == response.guests {
                                false
                            } else {
                                *current = response.guests;
                                true
                            }
                        });
                        if changed {
                            let count = guests_tx.borrow().len();
                            debug!("Guest session {} now has {} guests", session_id, count);
                        }
                    }
                    Err(e) => warn!("Failed to poll guest session {}: {}", session_id, e),
                }
            }
        }
    }

    debug!("Stopped polling guest session {}", session_id);
}
