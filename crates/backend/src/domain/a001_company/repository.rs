use std::sync::Arc;

use tokio::sync::RwLock;

use super::ledger::{Ledger, LedgerError};
use crate::shared::ids::IdClock;

/// Хранилище текущего снимка реестра (в памяти, без персистентности)
pub struct LedgerStore {
    current: RwLock<Arc<Ledger>>,
    clock: IdClock,
}

impl LedgerStore {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            current: RwLock::new(Arc::new(ledger)),
            clock: IdClock::new(),
        }
    }

    /// Текущий снимок; последующие мутации его не затрагивают
    pub async fn snapshot(&self) -> Arc<Ledger> {
        self.current.read().await.clone()
    }

    /// Применить мутацию под эксклюзивной блокировкой.
    ///
    /// Проверка и запись выполняются атомарно относительно других
    /// мутаций. При ошибке текущий снимок остаётся прежним.
    pub async fn apply<T, F>(&self, mutation: F) -> Result<(Arc<Ledger>, T), LedgerError>
    where
        F: FnOnce(&Ledger, &IdClock) -> Result<(Ledger, T), LedgerError>,
    {
        let mut guard = self.current.write().await;
        let current: &Ledger = &guard;
        let (next, output) = mutation(current, &self.clock)?;
        let next = Arc::new(next);
        *guard = next.clone();
        Ok((next, output))
    }
}
