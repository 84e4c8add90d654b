use chrono::{DateTime, Duration, Utc};
use contracts::shared::notice::{Notice, NoticeKind};
use tokio::sync::RwLock;

/// Последнее уведомление для пользователя; гаснет по истечении TTL
pub struct NoticeBoard {
    current: RwLock<Option<Notice>>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            ttl,
        }
    }

    pub async fn success(&self, message: impl Into<String>) -> Notice {
        self.post_for(NoticeKind::Success, message, self.ttl).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Notice {
        self.post_for(NoticeKind::Error, message, self.ttl).await
    }

    /// Опубликовать уведомление с собственным временем жизни
    pub async fn post_for(
        &self,
        kind: NoticeKind,
        message: impl Into<String>,
        ttl: Duration,
    ) -> Notice {
        let now = Utc::now();
        let notice = Notice {
            message: message.into(),
            kind,
            posted_at: now,
            expires_at: now + ttl,
        };
        tracing::debug!("Notice ({:?}): {}", kind, notice.message);
        *self.current.write().await = Some(notice.clone());
        notice
    }

    pub async fn current(&self) -> Option<Notice> {
        self.current_at(Utc::now()).await
    }

    pub async fn current_at(&self, now: DateTime<Utc>) -> Option<Notice> {
        let mut guard = self.current.write().await;
        match guard.as_ref() {
            Some(notice) if notice.is_active_at(now) => Some(notice.clone()),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notice_expires() {
        let board = NoticeBoard::new(Duration::seconds(5));
        let notice = board.success("Booking cancelled successfully.").await;
        assert_eq!(notice.kind, NoticeKind::Success);

        let shown = board.current_at(notice.posted_at + Duration::seconds(4)).await;
        assert_eq!(shown.as_ref().map(|n| n.message.as_str()), Some("Booking cancelled successfully."));

        assert!(board.current_at(notice.posted_at + Duration::seconds(5)).await.is_none());
        // истёкшее уведомление удаляется
        assert!(board.current_at(notice.posted_at).await.is_none());
    }

    #[tokio::test]
    async fn test_latest_notice_wins() {
        let board = NoticeBoard::new(Duration::seconds(5));
        board.success("first").await;
        board.error("second").await;
        let current = board.current().await.unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NoticeKind::Error);
    }
}
