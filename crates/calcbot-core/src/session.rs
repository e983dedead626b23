//! Calculator session store.
//!
//! Sessions are keyed by the display message they belong to and created
//! lazily on the first button press. The store is bounded: idle sessions expire
//! after a TTL and the least recently used one is evicted once capacity is
//! reached. Eviction only ever resets a display's state to a fresh session.

use std::{
    collections::{BTreeMap, HashMap},
    time::{Duration, Instant},
};

use crate::{calculator::Session, domain::MessageRef};

pub type SessionKey = MessageRef;

#[derive(Clone, Debug)]
struct Slot {
    session: Session,
    tick: u64,
    last_used: Instant,
}

/// Bounded LRU + idle-TTL map from display message to calculator state.
///
/// Not synchronized: it is owned by the poll loop, the only place sessions
/// are read or written.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    idle_ttl: Duration,
    slots: HashMap<SessionKey, Slot>,
    /// Recency index: tick -> key, oldest first.
    recency: BTreeMap<u64, SessionKey>,
    next_tick: u64,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            idle_ttl,
            slots: HashMap::new(),
            recency: BTreeMap::new(),
            next_tick: 0,
        }
    }

    pub fn get_or_create(&mut self, key: SessionKey) -> &mut Session {
        self.get_or_create_at(key, Instant::now())
    }

    pub fn get_or_create_at(&mut self, key: SessionKey, now: Instant) -> &mut Session {
        let expired = self
            .slots
            .get(&key)
            .is_some_and(|slot| now.saturating_duration_since(slot.last_used) > self.idle_ttl);
        if expired {
            tracing::debug!(
                chat_id = key.chat_id.0,
                message_id = key.message_id.0,
                "session expired"
            );
            self.remove(&key);
        }

        if !self.slots.contains_key(&key) {
            self.evict_expired(now);
            while self.slots.len() >= self.capacity {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let tick = self.next_tick;
        self.next_tick += 1;

        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            session: Session::default(),
            tick,
            last_used: now,
        });
        self.recency.remove(&slot.tick);
        slot.tick = tick;
        slot.last_used = now;
        self.recency.insert(tick, key);

        &mut slot.session
    }

    /// Look up a session without touching its recency.
    pub fn get(&self, key: &SessionKey) -> Option<&Session> {
        self.slots.get(key).map(|slot| &slot.session)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn remove(&mut self, key: &SessionKey) {
        if let Some(slot) = self.slots.remove(key) {
            self.recency.remove(&slot.tick);
        }
    }

    fn evict_oldest(&mut self) -> bool {
        let Some((_, key)) = self.recency.pop_first() else {
            return false;
        };
        tracing::debug!(
            chat_id = key.chat_id.0,
            message_id = key.message_id.0,
            "session evicted"
        );
        self.slots.remove(&key);
        true
    }

    /// Drop sessions idle past the TTL, walking from the oldest.
    fn evict_expired(&mut self, now: Instant) {
        while let Some((_, key)) = self.recency.first_key_value() {
            let key = *key;
            let idle = self
                .slots
                .get(&key)
                .map(|slot| now.saturating_duration_since(slot.last_used));
            if idle.is_some_and(|idle| idle <= self.idle_ttl) {
                break;
            }
            self.recency.pop_first();
            self.slots.remove(&key);
        }
    }
}
