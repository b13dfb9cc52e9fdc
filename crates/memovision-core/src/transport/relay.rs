//! Single-source time relay.
//!
//! Exactly one track drives the shared cursor at a time. It attaches to the
//! relay and receives a [`Subscription`]; every other track is a passive
//! follower whose position is derived from the source through the sync
//! mapper. Handles carry a generation so a handle kept past its detach can
//! never drive the followers again.

use crate::sync::SyncMapper;
use crate::{Error, Result};

/// Proof of being the relay source.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription handle leaves the relay attached"]
pub struct Subscription {
    source: usize,
    generation: u64,
}

impl Subscription {
    pub fn source(&self) -> usize {
        self.source
    }
}

#[derive(Debug, Default)]
pub struct TimeRelay {
    source: Option<usize>,
    generation: u64,
}

impl TimeRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    /// Makes `track` the source. Refused while another source is attached.
    pub fn attach(&mut self, track: usize) -> Result<Subscription> {
        if let Some(current) = self.source {
            return Err(Error::RelayBusy(current));
        }
        self.generation += 1;
        self.source = Some(track);
        Ok(Subscription {
            source: track,
            generation: self.generation,
        })
    }

    /// Releases the relay. Stale handles are ignored and return `false`.
    pub fn detach(&mut self, subscription: Subscription) -> bool {
        if !self.is_current(&subscription) {
            return false;
        }
        self.source = None;
        true
    }

    pub fn is_current(&self, subscription: &Subscription) -> bool {
        self.source == Some(subscription.source) && self.generation == subscription.generation
    }

    /// Forgets the source, invalidating every outstanding handle.
    pub fn clear(&mut self) {
        self.source = None;
        self.generation += 1;
    }

    /// Publishes the source's `time`: `sink` receives the source position,
    /// then every follower's mapped position, in track order.
    ///
    /// Returns `false` without calling `sink` when `subscription` is stale.
    pub fn publish(
        &self,
        subscription: &Subscription,
        time: f64,
        mapper: &SyncMapper,
        mut sink: impl FnMut(usize, f64),
    ) -> bool {
        if !self.is_current(subscription) {
            return false;
        }
        let source = subscription.source;
        sink(source, time);
        for track in (0..mapper.track_count()).filter(|&t| t != source) {
            sink(track, mapper.follower_time(source, track, time));
        }
        true
    }
}
