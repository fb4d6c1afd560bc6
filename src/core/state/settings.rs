use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out signal the host fires after launcher settings were saved.
///
/// Sessions subscribe at construction and re-read policy on every signal.
#[derive(Debug, Clone)]
pub struct SettingsChangeNotifier {
    tx: broadcast::Sender<()>,
}

impl SettingsChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn notify_saved(&self) {
        let listeners = self.tx.send(()).unwrap_or(0);
        debug!("Settings saved, notified {} session(s)", listeners);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for SettingsChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_the_signal() {
        let notifier = SettingsChangeNotifier::new();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.notify_saved();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn notifying_without_listeners_is_harmless() {
        SettingsChangeNotifier::default().notify_saved();
    }
}
