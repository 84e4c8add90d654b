use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use contracts::domain::a001_company::aggregate::{Company, CompanyId};
use contracts::domain::a003_insight::{InsightStatus, InsightView};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::generator::InsightGenerator;

/// Предел числа зрителей; сверх него вытесняется самый давний выбор
const MAX_VIEWERS: usize = 1024;
/// Выбор без обновлений дольше этого срока удаляется
const SELECTION_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
struct Selection {
    company_id: CompanyId,
    status: InsightStatus,
    selected_at: DateTime<Utc>,
}

/// Выбранная компания и её описание для каждого зрителя.
///
/// Генерация идёт в фоне; результат применяется, только если зритель
/// всё ещё смотрит ту же компанию.
pub struct InsightTracker {
    generator: Arc<dyn InsightGenerator>,
    selections: Arc<RwLock<HashMap<String, Selection>>>,
    max_viewers: usize,
    ttl: Duration,
}

impl InsightTracker {
    pub fn new(generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            generator,
            selections: Arc::new(RwLock::new(HashMap::new())),
            max_viewers: MAX_VIEWERS,
            ttl: Duration::minutes(SELECTION_TTL_MINUTES),
        }
    }

    pub fn with_limits(mut self, max_viewers: usize, ttl: Duration) -> Self {
        self.max_viewers = max_viewers.max(1);
        self.ttl = ttl;
        self
    }

    /// Убрать устаревшие выборы и освободить место под ещё одного зрителя
    fn evict(
        &self,
        selections: &mut HashMap<String, Selection>,
        viewer_id: &str,
        now: DateTime<Utc>,
    ) {
        selections.retain(|_, s| s.selected_at + self.ttl > now);
        if selections.contains_key(viewer_id) {
            return;
        }
        while selections.len() >= self.max_viewers {
            let oldest = selections
                .iter()
                .min_by_key(|(_, s)| s.selected_at)
                .map(|(viewer, _)| viewer.clone());
            match oldest {
                Some(viewer) => {
                    tracing::debug!("Evicting insight selection of {}", viewer);
                    selections.remove(&viewer);
                }
                None => break,
            }
        }
    }

    /// Запомнить выбор и запустить генерацию.
    /// Задача возвращает `true`, если результат был применён.
    pub async fn select(&self, viewer_id: &str, company: &Company) -> (InsightView, JoinHandle<bool>) {
        let now = Utc::now();
        let selection = Selection {
            company_id: company.id.clone(),
            status: InsightStatus::Loading,
            selected_at: now,
        };
        {
            let mut selections = self.selections.write().await;
            self.evict(&mut selections, viewer_id, now);
            selections.insert(viewer_id.to_string(), selection.clone());
        }

        let generator = self.generator.clone();
        let selections = self.selections.clone();
        let viewer = viewer_id.to_string();
        let requested = company.id.clone();
        let name = company.details.name.clone();
        let industry = company.details.industry.clone();

        let task = tokio::spawn(async move {
            let text = generator.generate(&name, &industry).await;
            let mut guard = selections.write().await;
            match guard.get_mut(&viewer) {
                Some(current) if current.company_id == requested => {
                    current.status = InsightStatus::Ready { text };
                    true
                }
                _ => {
                    tracing::debug!("Discarding stale insight for {} ({})", viewer, requested);
                    false
                }
            }
        });

        (view(viewer_id, selection), task)
    }

    pub async fn get(&self, viewer_id: &str) -> Option<InsightView> {
        let now = Utc::now();
        self.selections
            .read()
            .await
            .get(viewer_id)
            .filter(|s| s.selected_at + self.ttl > now)
            .cloned()
            .map(|selection| view(viewer_id, selection))
    }

    /// Закрыть карточку: выбор сбрасывается, незавершённый ответ будет отброшен
    pub async fn clear(&self, viewer_id: &str) -> bool {
        self.selections.write().await.remove(viewer_id).is_some()
    }
}

fn view(viewer_id: &str, selection: Selection) -> InsightView {
    InsightView {
        viewer_id: viewer_id.to_string(),
        company_id: selection.company_id,
        status: selection.status,
    }
}
