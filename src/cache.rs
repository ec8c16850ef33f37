// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Fulfillment-gated resource caches.

A cache owns one slot per class id.  Requiring a set of ids schedules builds for the ones that
are missing and remembers the set; the partition is *fulfilled* once every id in its latest
set holds a built resource.  Builds run elsewhere and report back over a channel, so the map
only changes inside [Cache::pump], on the thread that renders.

Each scheduled build carries a ticket.  [Cache::clear] and [Cache::invalidate] drop slots,
and a completion whose ticket no longer matches its slot is discarded, so a build that
outlives a device loss can never land in the new device's cache.
*/

pub mod shader_cache;
pub mod texture_cache;
pub mod vertex_buffer_cache;

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, channel};

pub use shader_cache::ShaderCache;
pub use texture_cache::{TextureCache, TextureStates};
pub use vertex_buffer_cache::VertexBufferCache;

use crate::resources::{BuildError, Partition, ResourceClass};

/// One failed build.
#[derive(Debug, Clone)]
pub struct BuildFailure {
    pub kind: &'static str,
    pub class: &'static str,
    pub id: u32,
    pub error: BuildError,
}

impl std::fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} (id {}): {}", self.kind, self.class, self.id, self.error)
    }
}

/**
Builds that failed since the last [Cache::pump].

The partitions they belong to stay unfulfilled until the ids are required again.
*/
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} resource build(s) failed; first: {}", .failures.len(), first_failure(.failures))]
pub struct CacheError {
    pub failures: Vec<BuildFailure>,
}

fn first_failure(failures: &[BuildFailure]) -> String {
    failures.first().map(|f| f.to_string()).unwrap_or_default()
}

impl CacheError {
    /// Folds several pump results into one, keeping every failure.
    pub(crate) fn merge(results: impl IntoIterator<Item = Result<(), CacheError>>) -> Result<(), CacheError> {
        let failures: Vec<BuildFailure> = results
            .into_iter()
            .filter_map(Result::err)
            .flat_map(|e| e.failures)
            .collect();
        if failures.is_empty() { Ok(()) } else { Err(CacheError { failures }) }
    }
}

enum Slot<R> {
    Building { ticket: u64 },
    Ready(R),
    Failed,
}

struct Completion<C, R> {
    class: C,
    ticket: u64,
    result: Result<R, BuildError>,
}

/**
The handle a build uses to report its outcome.

Sending to a cache that has since been dropped is harmless.
*/
pub struct BuildTicket<C, R> {
    class: C,
    ticket: u64,
    sender: Sender<Completion<C, R>>,
}

impl<C: ResourceClass, R> BuildTicket<C, R> {
    pub fn class(&self) -> C {
        self.class
    }

    pub fn complete(self, result: Result<R, BuildError>) {
        let _ = self.sender.send(Completion {
            class: self.class,
            ticket: self.ticket,
            result,
        });
    }
}

/**
The shared bookkeeping behind [ShaderCache], [TextureCache] and [VertexBufferCache].
*/
pub struct Cache<C: ResourceClass, R> {
    slots: HashMap<C, Slot<R>>,
    required: [Vec<C>; 2],
    /// Whether each partition was fulfilled at the end of the last pump.
    reported: [bool; 2],
    next_ticket: u64,
    sender: Sender<Completion<C, R>>,
    receiver: Receiver<Completion<C, R>>,
}

impl<C: ResourceClass, R> Default for Cache<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ResourceClass, R> Cache<C, R> {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Cache {
            slots: HashMap::new(),
            required: [Vec::new(), Vec::new()],
            reported: [true, true],
            next_ticket: 0,
            sender,
            receiver,
        }
    }

    /**
    Records `ids` as the required set for `partition` and returns a ticket for each id that
    needs building.

    Ids already built or already building are skipped.  Ids of the other partition are
    ignored with a warning.  The partition reads unfulfilled from the moment this returns
    until every returned ticket has completed and been pumped.
    */
    pub fn begin_require(&mut self, ids: &[C], partition: Partition) -> Vec<BuildTicket<C, R>> {
        let mut required = Vec::with_capacity(ids.len());
        for id in ids {
            if id.partition() != partition {
                logwise::warn_sync!(
                    "{kind} {class} is not in the requested partition; ignoring",
                    kind = C::KIND,
                    class = id.name()
                );
                continue;
            }
            if !required.contains(id) {
                required.push(*id);
            }
        }
        logwise::trace_sync!(
            "Requiring {count} {kind} resource(s) in {partition}",
            count = required.len(),
            kind = C::KIND,
            partition = logwise::privacy::LogIt(&partition)
        );

        let mut tickets = Vec::new();
        for id in &required {
            let needs_build = matches!(self.slots.get(id), None | Some(Slot::Failed));
            if needs_build {
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.slots.insert(*id, Slot::Building { ticket });
                tickets.push(BuildTicket {
                    class: *id,
                    ticket,
                    sender: self.sender.clone(),
                });
            }
        }
        self.required[partition.index()] = required;
        tickets
    }

    /**
    Applies finished builds.  Returns the failures among them.

    A partition that became fulfilled is logged once.
    */
    pub fn pump(&mut self) -> Result<(), CacheError> {
        let mut failures = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            let current = matches!(
                self.slots.get(&completion.class),
                Some(Slot::Building { ticket }) if *ticket == completion.ticket
            );
            if !current {
                logwise::trace_sync!(
                    "Discarding stale {kind} {class}",
                    kind = C::KIND,
                    class = completion.class.name()
                );
                continue;
            }
            match completion.result {
                Ok(resource) => {
                    self.slots.insert(completion.class, Slot::Ready(resource));
                }
                Err(error) => {
                    logwise::error_sync!(
                        "Building {kind} {class} failed: {err}",
                        kind = C::KIND,
                        class = completion.class.name(),
                        err = logwise::privacy::LogIt(&error)
                    );
                    self.slots.insert(completion.class, Slot::Failed);
                    failures.push(BuildFailure {
                        kind: C::KIND,
                        class: completion.class.name(),
                        id: completion.class.id(),
                        error,
                    });
                }
            }
        }
        for partition in Partition::ALL {
            let now = self.is_fulfilled(partition);
            if now && !self.reported[partition.index()] {
                logwise::info_sync!(
                    "{kind} resources fulfilled for {partition}",
                    kind = C::KIND,
                    partition = logwise::privacy::LogIt(&partition)
                );
            }
            self.reported[partition.index()] = now;
        }
        if failures.is_empty() { Ok(()) } else { Err(CacheError { failures }) }
    }

    /// Whether every id in the partition's latest required set is built.
    pub fn is_fulfilled(&self, partition: Partition) -> bool {
        self.required[partition.index()]
            .iter()
            .all(|id| matches!(self.slots.get(id), Some(Slot::Ready(_))))
    }

    /// The built resource for `id`, if there is one.
    pub fn get(&self, id: C) -> Option<&R> {
        match self.slots.get(&id) {
            Some(Slot::Ready(r)) => Some(r),
            _ => None,
        }
    }

    /// Whether `id` has a build outstanding.
    pub fn is_building(&self, id: C) -> bool {
        matches!(self.slots.get(&id), Some(Slot::Building { .. }))
    }

    /// The partition's latest required set.
    pub fn required(&self, partition: Partition) -> &[C] {
        &self.required[partition.index()]
    }

    /**
    Drops every resource and every outstanding build.

    Required sets are kept, so both partitions read unfulfilled until they are required
    again against the new device.
    */
    pub fn clear(&mut self) {
        self.slots.clear();
        self.discard_queued();
    }

    /// Drops the resources of one partition in place, leaving the other untouched.
    pub fn invalidate(&mut self, partition: Partition) {
        self.slots.retain(|id, _| id.partition() != partition);
    }

    fn discard_queued(&mut self) {
        while self.receiver.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::TextureClass;

    type TestCache = Cache<TextureClass, u32>;

    #[test]
    fn empty_requirement_is_fulfilled() {
        let mut cache = TestCache::new();
        assert!(cache.is_fulfilled(Partition::SizeIndependent));
        assert!(cache.begin_require(&[], Partition::SizeIndependent).is_empty());
        assert!(cache.is_fulfilled(Partition::SizeIndependent));
    }

    #[test]
    fn fulfilled_only_after_every_ticket() {
        let mut cache = TestCache::new();
        let tickets = cache.begin_require(&[TextureClass::Wood, TextureClass::Font], Partition::SizeIndependent);
        assert_eq!(tickets.len(), 2);
        assert!(!cache.is_fulfilled(Partition::SizeIndependent));
        let mut tickets = tickets.into_iter();
        tickets.next().unwrap().complete(Ok(1));
        cache.pump().unwrap();
        assert!(!cache.is_fulfilled(Partition::SizeIndependent));
        tickets.next().unwrap().complete(Ok(2));
        cache.pump().unwrap();
        assert!(cache.is_fulfilled(Partition::SizeIndependent));
        assert_eq!(cache.get(TextureClass::Font), Some(&2));
    }

    #[test]
    fn incremental_require_skips_built_ids() {
        let mut cache = TestCache::new();
        for t in cache.begin_require(&[TextureClass::Wood, TextureClass::Font], Partition::SizeIndependent) {
            t.complete(Ok(7));
        }
        cache.pump().unwrap();
        let tickets = cache.begin_require(&[TextureClass::Font, TextureClass::Icons], Partition::SizeIndependent);
        let classes: Vec<_> = tickets.iter().map(BuildTicket::class).collect();
        assert_eq!(classes, vec![TextureClass::Icons]);
        //a building id is not scheduled twice
        assert!(cache.begin_require(&[TextureClass::Icons], Partition::SizeIndependent).is_empty());
    }

    #[test]
    fn wrong_partition_is_ignored() {
        let mut cache = TestCache::new();
        let tickets = cache.begin_require(&[TextureClass::Overlay, TextureClass::Wood], Partition::SizeIndependent);
        assert_eq!(tickets.len(), 1);
        assert_eq!(cache.required(Partition::SizeIndependent), &[TextureClass::Wood]);
    }

    #[test]
    fn failure_is_reported_and_gate_stays_closed() {
        let mut cache = TestCache::new();
        for t in cache.begin_require(&[TextureClass::Wood], Partition::SizeIndependent) {
            t.complete(Err(BuildError::FontUnavailable));
        }
        let err = cache.pump().unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].class, "Wood");
        assert!(!cache.is_fulfilled(Partition::SizeIndependent));
        //requiring again retries
        assert_eq!(cache.begin_require(&[TextureClass::Wood], Partition::SizeIndependent).len(), 1);
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut cache = TestCache::new();
        let tickets = cache.begin_require(&[TextureClass::Overlay], Partition::SizeDependent);
        cache.invalidate(Partition::SizeDependent);
        let fresh = cache.begin_require(&[TextureClass::Overlay], Partition::SizeDependent);
        for t in tickets {
            t.complete(Ok(1));
        }
        cache.pump().unwrap();
        assert_eq!(cache.get(TextureClass::Overlay), None);
        for t in fresh {
            t.complete(Ok(2));
        }
        cache.pump().unwrap();
        assert_eq!(cache.get(TextureClass::Overlay), Some(&2));
    }

    #[test]
    fn invalidate_keeps_other_partition() {
        let mut cache = TestCache::new();
        for t in cache.begin_require(&[TextureClass::Wood], Partition::SizeIndependent) {
            t.complete(Ok(1));
        }
        for t in cache.begin_require(&[TextureClass::Overlay], Partition::SizeDependent) {
            t.complete(Ok(2));
        }
        cache.pump().unwrap();
        cache.invalidate(Partition::SizeDependent);
        assert!(cache.is_fulfilled(Partition::SizeIndependent));
        assert!(!cache.is_fulfilled(Partition::SizeDependent));
        assert_eq!(cache.get(TextureClass::Wood), Some(&1));
    }

    #[test]
    fn clear_keeps_requirements_unfulfilled() {
        let mut cache = TestCache::new();
        for t in cache.begin_require(&[TextureClass::Wood], Partition::SizeIndependent) {
            t.complete(Ok(1));
        }
        cache.pump().unwrap();
        cache.clear();
        assert!(!cache.is_fulfilled(Partition::SizeIndependent));
        assert_eq!(cache.get(TextureClass::Wood), None);
    }
}
