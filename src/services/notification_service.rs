//! Notification Service
//!
//! The header bell and the notifications page: list, unread count, read marks.

use crate::models::Notification;
use crate::services::store::CrmStore;
use crate::services::{ServiceError, ServiceResult};

/// Notification service
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: CrmStore,
}

impl NotificationService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    /// Newest first, as stored
    pub async fn list(&self) -> Vec<Notification> {
        self.store.list().await
    }

    pub async fn unread_count(&self) -> usize {
        self.store
            .read(|data| data.notifications.iter().filter(|n| !n.read).count())
            .await
    }

    pub async fn mark_as_read(&self, id: &str) -> ServiceResult<Notification> {
        self.store
            .mutate(|data| {
                let notification = data
                    .notifications
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or_else(|| ServiceError::not_found::<Notification>(id))?;
                notification.mark_read();
                Ok(notification.clone())
            })
            .await
    }

    /// Returns how many notifications changed
    pub async fn mark_all_as_read(&self) -> ServiceResult<usize> {
        self.store
            .mutate(|data| {
                let mut changed = 0;
                for notification in data.notifications.iter_mut().filter(|n| !n.read) {
                    notification.mark_read();
                    changed += 1;
                }
                Ok(changed)
            })
            .await
    }

    /// Add a notification at the top of the list
    pub async fn push(&self, notification: Notification) -> ServiceResult<Notification> {
        self.store.prepend(notification).await
    }
}
