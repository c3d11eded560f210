//! Append-only audit log of stake / unstake actions.

use govpower_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// A recorded staking action. Observed once, never revised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    Staked {
        staker: Address,
        proxy: Address,
        amount: u128,
        at: Timestamp,
    },
    Unstaked {
        staker: Address,
        proxy: Address,
        amount: u128,
        recipient: Address,
        at: Timestamp,
    },
}

impl StakingEvent {
    pub fn staker(&self) -> &Address {
        match self {
            Self::Staked { staker, .. } | Self::Unstaked { staker, .. } => staker,
        }
    }

    pub fn proxy(&self) -> &Address {
        match self {
            Self::Staked { proxy, .. } | Self::Unstaked { proxy, .. } => proxy,
        }
    }

    pub fn amount(&self) -> u128 {
        match self {
            Self::Staked { amount, .. } | Self::Unstaked { amount, .. } => *amount,
        }
    }

    pub fn at(&self) -> Timestamp {
        match self {
            Self::Staked { at, .. } | Self::Unstaked { at, .. } => *at,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Staked { .. } => "Staked",
            Self::Unstaked { .. } => "Unstaked",
        }
    }
}

/// Callback invoked for every appended event.
pub type Listener = Box<dyn Fn(&StakingEvent) + Send + Sync>;

/// Ordered, append-only event log with synchronous fan-out.
///
/// Listeners are invoked inline on the mutating call; keep them fast.
#[derive(Default)]
pub struct EventLog {
    entries: Vec<StakingEvent>,
    listeners: Vec<Listener>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<StakingEvent>) -> Self {
        Self {
            entries,
            listeners: Vec::new(),
        }
    }

    /// Record `event`, then notify listeners. The entry is in the log before
    /// any listener runs.
    pub(crate) fn append(&mut self, event: StakingEvent) {
        self.entries.push(event);
        if let Some(recorded) = self.entries.last() {
            for listener in &self.listeners {
                listener(recorded);
            }
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StakingEvent> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&StakingEvent> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StakingEvent> {
        self.entries.iter()
    }

    /// Events appended at or after `index`, for observers that poll.
    pub fn since(&self, index: usize) -> &[StakingEvent] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[StakingEvent] {
        &self.entries
    }

    /// JSON array of every event, for off-chain verification.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn staked(amount: u128) -> StakingEvent {
        StakingEvent::Staked {
            staker: Address::new("alice"),
            proxy: Address::new("alice"),
            amount,
            at: Timestamp::new(1),
        }
    }

    #[test]
    fn append_notifies_listeners_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut log = EventLog::new();
        let c = Arc::clone(&counter);
        log.subscribe(Box::new(move |e| {
            c.fetch_add(e.amount() as usize, Ordering::SeqCst);
        }));
        log.append(staked(3));
        log.append(staked(4));
        assert_eq!(counter.load(Ordering::SeqCst), 7);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().amount(), 4);
    }

    #[test]
    fn entry_is_recorded_even_if_a_listener_panics() {
        let mut log = EventLog::new();
        log.subscribe(Box::new(|_| panic!("listener failed")));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.append(staked(5));
        }));
        assert!(result.is_err());
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().amount(), 5);
    }

    #[test]
    fn since_returns_tail() {
        let mut log = EventLog::new();
        log.append(staked(1));
        log.append(staked(2));
        assert_eq!(log.since(1), &[staked(2)]);
        assert!(log.since(2).is_empty());
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn json_export_names_each_event() {
        let mut log = EventLog::new();
        log.append(StakingEvent::Unstaked {
            staker: Address::new("alice"),
            proxy: Address::new("p"),
            amount: 500,
            recipient: Address::new("bob"),
            at: Timestamp::new(9),
        });
        let json = log.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Unstaked"]["recipient"], "bob");
        assert_eq!(value[0]["Unstaked"]["amount"], 500);
    }
}
