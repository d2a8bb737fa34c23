//! Pointer capture for in-flight gestures.
//!
//! A drag listens to pointer movement anywhere on screen, not only over the
//! item. Subscribing hands back a [`Subscription`]; dropping it removes the
//! listener, so a finished or abandoned session can never leave one behind.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::ItemId;

/// Registry of items currently listening to global pointer events.
///
/// Cheap to clone; clones share the same registry. Single-threaded.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    listeners: Rc<RefCell<Vec<ItemId>>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing pointer events to `id` until the returned handle drops.
    pub fn subscribe(&self, id: ItemId) -> Subscription {
        self.listeners.borrow_mut().push(id.clone());
        Subscription {
            id,
            listeners: Rc::clone(&self.listeners),
        }
    }

    /// Items to notify about the next pointer event, in subscription order.
    pub fn listeners(&self) -> Vec<ItemId> {
        self.listeners.borrow().clone()
    }

    pub fn is_listening(&self, id: &ItemId) -> bool {
        self.listeners.borrow().contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// A handle to a pointer subscription. When dropped, the listener is removed.
#[must_use]
#[derive(Debug)]
pub struct Subscription {
    id: ItemId,
    listeners: Rc<RefCell<Vec<ItemId>>>,
}

impl Subscription {
    pub fn id(&self) -> &ItemId {
        &self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(pos) = listeners.iter().position(|id| *id == self.id) {
            listeners.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_unsubscribes() {
        let capture = PointerCapture::new();
        let a = capture.subscribe(ItemId::from("a"));
        let b = capture.subscribe(ItemId::from("b"));
        assert_eq!(capture.listeners(), vec![ItemId::from("a"), ItemId::from("b")]);

        drop(a);
        assert!(!capture.is_listening(&ItemId::from("a")));
        assert!(capture.is_listening(b.id()));

        drop(b);
        assert!(capture.is_empty());
    }

    #[test]
    fn clones_share_registry() {
        let capture = PointerCapture::new();
        let other = capture.clone();
        let _sub = other.subscribe(ItemId::from("x"));
        assert!(capture.is_listening(&ItemId::from("x")));
    }
}
