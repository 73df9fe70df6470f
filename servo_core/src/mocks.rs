//! Test and helper sinks for servo_core

use std::sync::{Arc, Mutex};

/// A sink that keeps every report; clones share the same buffer so a test can
/// keep one handle after moving the other into a controller.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.lock().ok().and_then(|m| m.last().cloned())
    }
}

impl servo_traits::StateSink for RecordingSink {
    fn send(&mut self, message: &str) {
        if let Ok(mut m) = self.messages.lock() {
            m.push(message.to_string());
        }
    }
}

/// A sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl servo_traits::StateSink for NullSink {
    fn send(&mut self, _message: &str) {}
}
