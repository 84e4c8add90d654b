use contracts::domain::a001_company::aggregate::{Company, CompanyDto, CompanyId};
use contracts::domain::common::{AggregateId, AggregateRoot};

use super::ledger::LedgerError;
use super::repository::LedgerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Получение списка всех компаний в исходном порядке
pub async fn list_all(store: &LedgerStore) -> Vec<Company> {
    store.snapshot().await.companies().cloned().collect()
}

/// Поиск по подстроке; пустой запрос возвращает все компании
pub async fn search(store: &LedgerStore, query: &str) -> Vec<Company> {
    store.snapshot().await.filter(query).cloned().collect()
}

/// Получение компании по ID
pub async fn get_by_id(store: &LedgerStore, id: &CompanyId) -> Option<Company> {
    store.snapshot().await.get(id).cloned()
}

/// Создание (без ID) или обновление (с ID) компании
pub async fn upsert(
    store: &LedgerStore,
    dto: CompanyDto,
) -> Result<(CompanyId, UpsertOutcome), LedgerError> {
    let target = dto
        .id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(CompanyId::from_string)
        .transpose()
        .map_err(LedgerError::Validation)?;
    let outcome = match target {
        Some(_) => UpsertOutcome::Updated,
        None => UpsertOutcome::Created,
    };

    let details = dto.details;
    let (_, id) = store
        .apply(|ledger, clock| ledger.upsert_company(details, target.as_ref(), clock))
        .await?;

    tracing::info!("{}: {:?} {}", Company::full_name(), outcome, id);
    Ok((id, outcome))
}
