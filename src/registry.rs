// src/registry.rs

// node-wide throttle set: global limits plus one throttle per connection

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::ThrottleConfig;
use crate::connection::ConnectionThrottle;
use crate::errors::ThrottleError;
use crate::throttle::ThrottleEngine;
use dashmap::DashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Traffic direction for the global throttles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Holds the global inbound and outbound throttles and a throttle for each
/// live connection.
/// K is the type used to identify connections (e.g., a socket address or an id).
/// C is the clock type, defaulting to MonotonicClock.
#[derive(Debug)]
pub struct ThrottleRegistry<K, C = MonotonicClock>
where
    K: Hash + Eq + Clone + Debug,
    C: Clock + Clone,
{
    inbound: ConnectionThrottle<C>,
    outbound: ConnectionThrottle<C>,
    connections: DashMap<K, Arc<ConnectionThrottle<C>>>,
    connection_config: ThrottleConfig,
    clock: C,
}

impl<K, C> ThrottleRegistry<K, C>
where
    K: Hash + Eq + Clone + Debug,
    C: Clock + Clone,
{
    /// `global_config` is applied to both global throttles, `connection_config`
    /// to every per-connection throttle created later.
    pub fn new(
        global_config: ThrottleConfig,
        connection_config: ThrottleConfig,
        clock: C,
    ) -> Result<Self, ThrottleError> {
        global_config.validate()?;
        connection_config.validate()?;

        let inbound_name = format!("{}-in", global_config.name);
        let outbound_name = format!("{}-out", global_config.name);
        let inbound = ConnectionThrottle::from_engine(ThrottleEngine::build(
            global_config.clone().name(inbound_name),
            clock.clone(),
        ));
        let outbound = ConnectionThrottle::from_engine(ThrottleEngine::build(
            global_config.name(outbound_name),
            clock.clone(),
        ));

        Ok(Self {
            inbound,
            outbound,
            connections: DashMap::new(),
            connection_config,
            clock,
        })
    }

    pub fn global(&self, direction: Direction) -> &ConnectionThrottle<C> {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    /// Throttle for `id`, created on first use.
    pub fn connection(&self, id: K) -> Arc<ConnectionThrottle<C>> {
        if let Some(throttle) = self.connections.get(&id) {
            return throttle.value().clone();
        }

        let name = format!("{}-{:?}", self.connection_config.name, id);
        self.connections
            .entry(id)
            .or_insert_with(|| {
                debug!(throttle = %name, "creating connection throttle");
                Arc::new(ConnectionThrottle::from_engine(ThrottleEngine::build(
                    self.connection_config.clone().name(name),
                    self.clock.clone(),
                )))
            })
            .value()
            .clone()
    }

    pub fn remove(&self, id: &K) -> Option<Arc<ConnectionThrottle<C>>> {
        self.connections.remove(id).map(|(_, throttle)| throttle)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Drop connection throttles that saw no traffic for more than
    /// `max_idle_seconds`. Throttles that never saw traffic are kept.
    /// Returns how many were removed.
    pub fn cleanup_idle(&self, max_idle_seconds: f64) -> Result<usize, ThrottleError> {
        let current_time = self.clock.now()?;
        let cutoff = current_time - max_idle_seconds;
        let before = self.connections.len();
        self.connections.retain(|_, throttle| {
            throttle
                .last_sample_time()
                .is_none_or(|last| last > cutoff)
        });
        let removed = before.saturating_sub(self.connections.len());
        if removed > 0 {
            debug!(removed, "dropped idle connection throttles");
        }
        Ok(removed)
    }
}
