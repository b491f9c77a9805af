use tracing::info;

/// Fire-and-forget sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(target: "lifeorg::notify", "{message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Mutex, PoisonError};

    use super::Notifier;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_string());
        }
    }
}
