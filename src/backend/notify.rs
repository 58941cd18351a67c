use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::backend::{sleep, spawn_detached};

pub const TOAST_TTL: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible notifications, oldest first. Each one removes itself after its own
/// delay regardless of what else is showing.
#[derive(Clone)]
pub struct Toaster {
    next_id: Arc<AtomicU64>,
    tx: Arc<watch::Sender<Vec<Toast>>>,
    ttl: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toaster {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            tx: Arc::new(tx),
            ttl,
        }
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        self.tx.send_modify(|toasts| toasts.push(toast));

        let this = self.clone();
        spawn_detached(async move {
            sleep(this.ttl).await;
            this.dismiss(id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(ToastKind::Error, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.tx.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        });
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(toaster: &Toaster) -> Vec<u64> {
        toaster.visible().iter().map(|t| t.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn toast_is_visible_then_expires() {
        let toaster = Toaster::default();
        let id = toaster.success("Course created");

        let visible = toaster.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, id);
        assert_eq!(visible[0].kind, ToastKind::Success);
        assert_eq!(visible[0].message, "Course created");

        tokio::time::sleep(TOAST_TTL - Duration::from_millis(1)).await;
        assert_eq!(ids(&toaster), vec![id]);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(toaster.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_independently_in_fifo_order() {
        let toaster = Toaster::default();
        let first = toaster.error("Failed to delete course");
        tokio::time::sleep(Duration::from_secs(2)).await;
        let second = toaster.success("Course deleted");
        assert_eq!(ids(&toaster), vec![first, second]);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(ids(&toaster), vec![second]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(toaster.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_push_and_expiry() {
        let toaster = Toaster::new(Duration::from_millis(100));
        let mut rx = toaster.subscribe();

        toaster.success("Enrolled");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn manual_dismiss_removes_only_that_toast() {
        let toaster = Toaster::default();
        let a = toaster.success("a");
        let b = toaster.success("b");
        toaster.dismiss(a);
        assert_eq!(ids(&toaster), vec![b]);
        toaster.dismiss(a);
        assert_eq!(ids(&toaster), vec![b]);
    }
}
