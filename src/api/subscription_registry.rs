use indexmap::IndexMap;
use tracing::debug;

use crate::extensions::{Subscriber, SubscriptionId};
use crate::interaction::PanConditions;

/// Subscribers keyed by id, kept in registration order.
pub struct SubscriptionRegistry<T> {
    entries: IndexMap<SubscriptionId, Box<dyn Subscriber<T>>>,
    next_id: u64,
}

impl<T> Default for SubscriptionRegistry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 1,
        }
    }
}

impl<T> SubscriptionRegistry<T> {
    pub fn register(&mut self, subscriber: Box<dyn Subscriber<T>>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, subscriber);
        debug!(subscription = id.raw(), count = self.entries.len(), "subscriber added");
        id
    }

    /// Removes a subscriber, keeping the order of the others.
    pub fn unregister(&mut self, id: SubscriptionId) -> Option<Box<dyn Subscriber<T>>> {
        let removed = self.entries.shift_remove(&id);
        if removed.is_some() {
            debug!(subscription = id.raw(), count = self.entries.len(), "subscriber removed");
        }
        removed
    }

    #[must_use]
    pub fn has(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn pan_conditions(&self) -> impl Iterator<Item = PanConditions> + '_ {
        self.entries.values().map(|subscriber| subscriber.pan_conditions())
    }

    /// Most recently registered subscriber that is currently draggable.
    #[must_use]
    pub fn topmost_draggable(&self) -> Option<SubscriptionId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, subscriber)| subscriber.pan_conditions().draggable)
            .map(|(id, _)| *id)
    }

    pub(super) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (&SubscriptionId, &mut Box<dyn Subscriber<T>>)> {
        self.entries.iter_mut()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionRegistry;
    use crate::error::ChartResult;
    use crate::extensions::{DrawRequest, MoreProps, Subscriber};
    use crate::interaction::PanConditions;
    use crate::render::Surface;

    struct Overlay {
        draggable: bool,
    }

    impl Subscriber<f64> for Overlay {
        fn pan_conditions(&self) -> PanConditions {
            PanConditions {
                draggable: self.draggable,
                pan_enabled: true,
            }
        }

        fn draw(
            &mut self,
            _request: DrawRequest,
            _props: &MoreProps<'_, f64>,
            _surface: &mut dyn Surface,
        ) -> ChartResult<()> {
            Ok(())
        }
    }

    #[test]
    fn topmost_draggable_is_last_registered() {
        let mut registry = SubscriptionRegistry::default();
        let first = registry.register(Box::new(Overlay { draggable: true }));
        let second = registry.register(Box::new(Overlay { draggable: true }));
        registry.register(Box::new(Overlay { draggable: false }));
        assert_eq!(registry.topmost_draggable(), Some(second));

        assert!(registry.unregister(second).is_some());
        assert_eq!(registry.topmost_draggable(), Some(first));
        assert!(registry.unregister(second).is_none());
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut registry = SubscriptionRegistry::default();
        let first = registry.register(Box::new(Overlay { draggable: false }));
        registry.unregister(first);
        let second = registry.register(Box::new(Overlay { draggable: false }));
        assert_ne!(first, second);
        assert!(!registry.has(first));
        assert!(registry.has(second));
    }
}
