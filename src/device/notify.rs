// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Device-loss observers.

The facade owns the observer list.  Registration hands back a [NotifyToken]; passing it to
[crate::device::DeviceResources::unregister_device_notify] is the only way to remove the
observer.
*/

use crate::device::DeviceResources;
use crate::gpu::Backend;

/**
Told about device loss and recovery.

Both callbacks get the facade itself.  During [DeviceNotify::on_device_lost] the old device
is already unusable; a typical observer clears the caches here.  During
[DeviceNotify::on_device_restored] the new device and swap chain exist and resources can be
required again.
*/
pub trait DeviceNotify<B: Backend> {
    fn on_device_lost(&mut self, resources: &mut DeviceResources<B>);
    fn on_device_restored(&mut self, resources: &mut DeviceResources<B>);
}

/// Identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotifyToken(u64);

pub(crate) struct Observers<B: Backend> {
    next: u64,
    entries: Vec<(NotifyToken, Box<dyn DeviceNotify<B>>)>,
    /// Tokens of the entries lent out to a notification.
    lent: Vec<NotifyToken>,
    deferred_removals: Vec<NotifyToken>,
}

impl<B: Backend> Default for Observers<B> {
    fn default() -> Self {
        Observers {
            next: 0,
            entries: Vec::new(),
            lent: Vec::new(),
            deferred_removals: Vec::new(),
        }
    }
}

impl<B: Backend> Observers<B> {
    pub(crate) fn register(&mut self, observer: Box<dyn DeviceNotify<B>>) -> NotifyToken {
        let token = NotifyToken(self.next);
        self.next += 1;
        self.entries.push((token, observer));
        token
    }

    pub(crate) fn unregister(&mut self, token: NotifyToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| *t != token);
        if self.entries.len() != before {
            return true;
        }
        if self.lent.contains(&token) && !self.deferred_removals.contains(&token) {
            //the observer is lent out; drop it when it comes back
            self.deferred_removals.push(token);
            return true;
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Lends the observers out for a notification.
    pub(crate) fn take(&mut self) -> Vec<(NotifyToken, Box<dyn DeviceNotify<B>>)> {
        let lent = std::mem::take(&mut self.entries);
        self.lent = lent.iter().map(|(t, _)| *t).collect();
        lent
    }

    /// Takes the lent observers back, after any registered meanwhile keeping their order.
    pub(crate) fn restore(&mut self, mut lent: Vec<(NotifyToken, Box<dyn DeviceNotify<B>>)>) {
        let removals = std::mem::take(&mut self.deferred_removals);
        lent.retain(|(t, _)| !removals.contains(t));
        lent.append(&mut self.entries);
        self.entries = lent;
        self.lent.clear();
    }
}
