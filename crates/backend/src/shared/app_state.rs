use std::sync::Arc;

use chrono::Duration;

use crate::domain::a001_company::ledger::Ledger;
use crate::domain::a001_company::repository::LedgerStore;
use crate::domain::a003_insight::generator::{InsightGenerator, LlmInsightGenerator};
use crate::domain::a003_insight::tracker::InsightTracker;
use crate::shared::config::Config;
use crate::shared::notification::NoticeBoard;
use crate::system::auth::AccessGate;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LedgerStore>,
    pub notices: Arc<NoticeBoard>,
    pub insights: Arc<InsightTracker>,
    pub gate: Arc<AccessGate>,
}

impl AppState {
    pub fn new(
        ledger: Ledger,
        gate: AccessGate,
        generator: Arc<dyn InsightGenerator>,
        notice_ttl: Duration,
    ) -> Self {
        Self {
            store: Arc::new(LedgerStore::new(ledger)),
            notices: Arc::new(NoticeBoard::new(notice_ttl)),
            insights: Arc::new(InsightTracker::new(generator)),
            gate: Arc::new(gate),
        }
    }

    /// Ошибки конфигурации всплывают при старте
    pub fn from_config(config: &Config, ledger: Ledger) -> anyhow::Result<Self> {
        let notice_ttl = config.notifications.ttl()?;
        let gate = AccessGate::from_config(&config.auth)
            .map_err(|e| anyhow::anyhow!("auth init failed: {e}"))?;
        let generator = Arc::new(LlmInsightGenerator::from_config(&config.insight));
        Ok(Self::new(ledger, gate, generator, notice_ttl))
    }
}
