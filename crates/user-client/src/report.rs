//! Output sinks for exchange progress.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::pb::{StatusResponse, User};

/// Receives every request as it is sent and every response as it arrives.
///
/// Streaming calls report from two tasks at once, so implementations take
/// `&self` and must be shareable.
pub trait Reporter: Send + Sync + 'static {
    fn sending(&self, user: &User);
    fn received(&self, response: &StatusResponse);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn sending(&self, user: &User) {
        (**self).sending(user)
    }

    fn received(&self, response: &StatusResponse) {
        (**self).received(response)
    }
}

pub fn sending_line(user: &User) -> String {
    format!("Sending user: {}", user.name)
}

pub fn received_line(response: &StatusResponse) -> String {
    let name = response.user.as_ref().map(|u| u.name.as_str()).unwrap_or("-");
    format!("Receiving user {} with status: {}", name, response.status)
}

/// Prints one line per event to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn sending(&self, user: &User) {
        println!("{}", sending_line(user));
    }

    fn received(&self, response: &StatusResponse) {
        println!("{}", received_line(response));
    }
}

/// One entry in a [`RecordingReporter`] transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Sending(User),
    Received(StatusResponse),
}

/// Keeps an ordered transcript of everything reported.
///
/// Clones share the same transcript.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Users in the order they were reported as sent.
    pub fn requests(&self) -> Vec<User> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Event::Sending(user) => Some(user.clone()),
                Event::Received(_) => None,
            })
            .collect()
    }

    /// Responses in the order they were reported as received.
    pub fn responses(&self) -> Vec<StatusResponse> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                Event::Received(response) => Some(response.clone()),
                Event::Sending(_) => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // A panicking reporter elsewhere must not hide the transcript.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for RecordingReporter {
    fn sending(&self, user: &User) {
        self.lock().push(Event::Sending(user.clone()));
    }

    fn received(&self, response: &StatusResponse) {
        self.lock().push(Event::Received(response.clone()));
    }
}
