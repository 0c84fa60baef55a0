use std::collections::VecDeque;
use std::fmt;

use super::error::{StoreError, StoreResult};
use super::event::{StateTransition, UiEvent};
use super::model::{ThemeMode, UiState, HEADER_CONDENSE_OFFSET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&UiState)>;

/// Most recent transitions kept for inspection; older records are dropped first.
pub const TRANSITION_HISTORY_LIMIT: usize = 64;

/// Single owner of UI state. Subscribers are called after every change, in
/// subscription order, until they unsubscribe.
pub struct UiStore {
    state: UiState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    transition_history: VecDeque<StateTransition>,
}

impl UiStore {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            state: UiState::with_theme(theme),
            subscribers: Vec::new(),
            next_subscription: 1,
            transition_history: VecDeque::with_capacity(TRANSITION_HISTORY_LIMIT),
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn next_state(&self, event: UiEvent) -> UiState {
        let mut next = self.state;
        match event {
            UiEvent::ToggleTheme => next.theme = next.theme.toggled(),
            UiEvent::SetTheme(theme) => next.theme = theme,
            UiEvent::Scrolled { offset } => {
                next.scroll_offset = offset;
                next.header_condensed = offset > HEADER_CONDENSE_OFFSET;
            }
        }
        next
    }

    pub fn dispatch(&mut self, event: UiEvent) -> UiState {
        let next = self.next_state(event);
        let record = StateTransition::new(self.state, event, next);
        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(record);
        if !record.changed() {
            return self.state;
        }

        tracing::debug!(from = ?self.state, event = ?event, to = ?next, "ui state changed");
        self.state = next;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&next);
        }
        self.state
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&UiState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> StoreResult<()> {
        let index = self
            .subscribers
            .iter()
            .position(|(subscription, _)| *subscription == id)
            .ok_or(StoreError::UnknownSubscription { id })?;
        self.subscribers.remove(index);
        Ok(())
    }
}

#[cfg(test)]
impl UiStore {
    fn history(&self) -> Vec<StateTransition> {
        self.transition_history.iter().copied().collect()
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl fmt::Debug for UiStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("transitions", &self.transition_history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_subscriber(store: &mut UiStore) -> (SubscriptionId, Rc<RefCell<Vec<UiState>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state| sink.borrow_mut().push(*state));
        (id, seen)
    }

    #[test]
    fn toggle_theme_notifies_subscribers() {
        let mut store = UiStore::new(ThemeMode::Light);
        let (_, seen) = recording_subscriber(&mut store);

        let state = store.dispatch(UiEvent::ToggleTheme);
        assert_eq!(state.theme, ThemeMode::Dark);
        assert_eq!(seen.borrow().as_slice(), &[state]);
    }

    #[test]
    fn scrolling_past_threshold_condenses_header() {
        let mut store = UiStore::default();
        assert!(!store.dispatch(UiEvent::Scrolled { offset: 50 }).header_condensed);
        assert!(store.dispatch(UiEvent::Scrolled { offset: 51 }).header_condensed);
        assert!(!store.dispatch(UiEvent::Scrolled { offset: 0 }).header_condensed);
    }

    #[test]
    fn unchanged_state_does_not_notify_but_is_recorded() {
        let mut store = UiStore::new(ThemeMode::Dark);
        let (_, seen) = recording_subscriber(&mut store);

        store.dispatch(UiEvent::SetTheme(ThemeMode::Dark));
        assert!(seen.borrow().is_empty());
        assert_eq!(store.history().len(), 1);
        assert!(!store.history()[0].changed());
    }

    #[test]
    fn transition_log_keeps_only_the_most_recent_records() {
        let mut store = UiStore::default();
        for offset in 0..(TRANSITION_HISTORY_LIMIT as u32 * 3) {
            store.dispatch(UiEvent::Scrolled { offset });
        }

        let history = store.history();
        assert_eq!(history.len(), TRANSITION_HISTORY_LIMIT);
        let last = history.last().expect("log is not empty");
        assert_eq!(last.to.scroll_offset, TRANSITION_HISTORY_LIMIT as u32 * 3 - 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving_updates() {
        let mut store = UiStore::default();
        let (first, first_seen) = recording_subscriber(&mut store);
        let (_, second_seen) = recording_subscriber(&mut store);

        store.unsubscribe(first).expect("first subscription exists");
        store.dispatch(UiEvent::ToggleTheme);

        assert!(first_seen.borrow().is_empty());
        assert_eq!(second_seen.borrow().len(), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_twice_reports_unknown_subscription() {
        let mut store = UiStore::default();
        let (id, _) = recording_subscriber(&mut store);
        store.unsubscribe(id).expect("first unsubscribe succeeds");

        let err = store
            .unsubscribe(id)
            .expect_err("second unsubscribe should fail");
        assert_eq!(err, StoreError::UnknownSubscription { id });
    }
}
