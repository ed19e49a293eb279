//! Ordered delivery of notifications to the host.

use lewis_core::{Notification, WireNotification};
use std::collections::VecDeque;

/// Connection state of the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Connecting,
    Open,
    Closed,
}

/// WebSocket URL for a session's canvas, derived from the page location.
pub fn socket_url(page_protocol: &str, host: &str, session: &str, canvas: &str) -> String {
    let ws_protocol = if page_protocol == "https:" { "wss:" } else { "ws:" };
    format!("{}//{}/ws?session={}&canvas={}", ws_protocol, host, session, canvas)
}

/// Encoded notifications waiting for the channel, oldest first.
///
/// Frames queued before the socket opens are released in order once it
/// does, so the host sees notifications in emission order. Once the
/// socket has closed nothing more is queued: frames are dropped with a
/// warning and the page must be reloaded to resynchronize.
#[derive(Debug, Default)]
pub struct Outbox {
    state: LinkState,
    queued: VecDeque<String>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Encode and queue a notification. Returns `false` if the channel is
    /// closed and the notification was dropped.
    pub fn push(&mut self, notification: &Notification) -> Result<bool, serde_json::Error> {
        if self.state == LinkState::Closed {
            log::warn!("Channel closed; dropping notification for {}", notification.id());
            return Ok(false);
        }
        let frame = serde_json::to_string(&WireNotification::from(notification))?;
        self.queued.push_back(frame);
        Ok(true)
    }

    pub fn mark_open(&mut self) {
        self.state = LinkState::Open;
    }

    /// Close the channel, discarding undelivered frames. Returns how many
    /// were lost.
    pub fn mark_closed(&mut self) -> usize {
        self.state = LinkState::Closed;
        let lost = self.queued.len();
        self.queued.clear();
        if lost > 0 {
            log::warn!("Channel closed with {} undelivered notifications", lost);
        }
        lost
    }

    /// Frames that can be sent now. Empty unless the channel is open.
    pub fn take_ready(&mut self) -> Vec<String> {
        match self.state {
            LinkState::Open => self.queued.drain(..).collect(),
            LinkState::Connecting | LinkState::Closed => Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queued.len()
    }
}
