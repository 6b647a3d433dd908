//! Typed application events.
//!
//! Whoever creates the [`EventBus`] owns it; components that care register
//! with [`EventBus::subscribe`] and get their own receiver. Publishing clones
//! the event to every live receiver and forgets the ones that were dropped.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The session runs without a user; nothing will be persisted.
    GuestModeEntered,
    UpdateAvailable { version: String },
    /// The user's record list changed; `count` is its new length.
    RecordsChanged { count: usize },
    ImportCommitted { created: usize },
    CardExported { file_name: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<AppEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<AppEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn publish(&mut self, event: AppEvent) {
        trace!(?event, "publish");
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_gets_every_event_in_order() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(AppEvent::GuestModeEntered);
        bus.publish(AppEvent::RecordsChanged { count: 3 });

        for rx in [a, b] {
            let got: Vec<AppEvent> = rx.try_iter().collect();
            assert_eq!(
                got,
                vec![
                    AppEvent::GuestModeEntered,
                    AppEvent::RecordsChanged { count: 3 }
                ]
            );
        }
    }

    #[test]
    fn test_late_subscribers_miss_earlier_events() {
        let mut bus = EventBus::new();
        bus.publish(AppEvent::ImportCommitted { created: 1 });
        let rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receivers_are_forgotten() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();
        let _kept = bus.subscribe();
        drop(rx);
        bus.publish(AppEvent::UpdateAvailable {
            version: "0.5.0".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 1);
    }
}
