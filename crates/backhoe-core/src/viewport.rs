//! Viewport width and resize notifications.
//!
//! Listeners register with [`Viewport::subscribe`] and get back a
//! [`ResizeListener`] guard; dropping the guard unregisters the callback.
//! A component that is mounted, dropped, and mounted again therefore never
//! leaves a stale handler behind.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback = Arc<dyn Fn(u32) + Send + Sync>;

/// A resizable viewport, shared behind an `Arc`.
pub struct Viewport {
    width: AtomicU32,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Callback)>>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("width", &self.width())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32) -> Arc<Self> {
        Arc::new(Self {
            width: AtomicU32::new(width),
            next_id: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Current width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.load(Ordering::Acquire)
    }

    /// Register `callback` to run on every resize until the guard is dropped.
    #[must_use = "dropping the guard unregisters the listener immediately"]
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> ResizeListener
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(callback)));
        ResizeListener {
            viewport: Arc::downgrade(self),
            id,
        }
    }

    /// Set the width and notify every listener once.
    ///
    /// Callbacks run outside the registry lock, so a callback may subscribe
    /// or drop guards without deadlocking.
    pub fn resize(&self, width: u32) {
        self.width.store(width, Ordering::Release);
        let callbacks: Vec<Callback> = self.lock().iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for callback in callbacks {
            callback(width);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Callback)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registration guard returned by [`Viewport::subscribe`].
#[derive(Debug)]
pub struct ResizeListener {
    viewport: Weak<Viewport>,
    id: u64,
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Some(viewport) = self.viewport.upgrade() {
            viewport.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(viewport: &Arc<Viewport>, hits: &Arc<AtomicUsize>) -> ResizeListener {
        let hits = Arc::clone(hits);
        viewport.subscribe(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn each_resize_reaches_each_listener_once() {
        let viewport = Viewport::new(1024);
        let hits = Arc::new(AtomicUsize::new(0));
        let _guard = counter(&viewport, &hits);

        viewport.resize(800);
        viewport.resize(600);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(viewport.width(), 600);
    }

    #[test]
    fn dropping_the_guard_unregisters() {
        let viewport = Viewport::new(1024);
        let hits = Arc::new(AtomicUsize::new(0));

        let guard = counter(&viewport, &hits);
        assert_eq!(viewport.listener_count(), 1);
        drop(guard);
        assert_eq!(viewport.listener_count(), 0);

        viewport.resize(500);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remounting_does_not_duplicate_handlers() {
        let viewport = Viewport::new(1024);
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let guard = counter(&viewport, &hits);
            drop(guard);
        }
        let _mounted = counter(&viewport, &hits);

        for w in [900, 800, 700] {
            viewport.resize(w);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn guard_outliving_viewport_is_harmless() {
        let viewport = Viewport::new(10);
        let guard = viewport.subscribe(|_| {});
        drop(viewport);
        drop(guard);
    }
}
