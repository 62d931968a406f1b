use std::collections::HashMap;

/// A command module registered for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub command: String,
    pub path: String,
}

impl Subscriber {
    pub fn new(command: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            path: path.into(),
        }
    }
}

/// Event name to subscribers, in registration order.
///
/// Registering the same subscriber twice for an event keeps both entries.
#[derive(Debug, Default)]
pub struct SubscriberTable {
    by_event: HashMap<String, Vec<Subscriber>>,
}

impl SubscriberTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, event_name: &str, subscriber: Subscriber) {
        self.by_event
            .entry(event_name.to_string())
            .or_default()
            .push(subscriber);
    }

    /// Subscribers for an event, empty when nothing registered for it
    pub fn subscribers(&self, event_name: &str) -> &[Subscriber] {
        self.by_event
            .get(event_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, event_name: &str, command: &str) -> bool {
        self.subscribers(event_name)
            .iter()
            .any(|s| s.command == command)
    }

    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_registration_order() {
        let mut table = SubscriberTable::new();
        table.register("OnSave", Subscriber::new("b", "cmd/b"));
        table.register("OnSave", Subscriber::new("a", "cmd/a"));
        let commands: Vec<_> = table
            .subscribers("OnSave")
            .iter()
            .map(|s| s.command.as_str())
            .collect();
        assert_eq!(commands, vec!["b", "a"]);
    }

    #[test]
    fn unknown_event_has_no_subscribers() {
        let table = SubscriberTable::new();
        assert!(table.subscribers("OnOpen").is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let mut table = SubscriberTable::new();
        table.register("OnOpen", Subscriber::new("a", "p"));
        table.register("OnOpen", Subscriber::new("a", "p"));
        assert_eq!(table.subscribers("OnOpen").len(), 2);
    }
}
