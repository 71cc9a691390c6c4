use crate::client::{SendError, SendMsg};
use common::messages::Message;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// Records every frame it is given. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MockSender {
    sent: Arc<Mutex<Vec<String>>>,
    broken: Arc<AtomicBool>,
}

impl MockSender {
    pub fn failing() -> Self {
        let sender = MockSender::default();
        sender.disconnect();
        sender
    }

    pub fn disconnect(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl SendMsg for MockSender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(SendError);
        }
        self.sent.lock().unwrap().push(msg.to_string());
        Ok(())
    }
}
