use contracts::domain::a001_company::aggregate::{Company, CompanyId, SlotId};
use contracts::domain::a002_booking::{
    BookSlotRequest, BookingHistoryEntry, CancelSlotRequest, LedgerSummary,
};

use crate::domain::a001_company::ledger::{Ledger, LedgerError};
use crate::domain::a001_company::repository::LedgerStore;

fn company_in(ledger: &Ledger, id: &CompanyId) -> Result<Company, LedgerError> {
    ledger
        .get(id)
        .cloned()
        .ok_or_else(|| LedgerError::CompanyNotFound(id.clone()))
}

/// Бронирование слота. Возвращает компанию после изменения.
pub async fn book(
    store: &LedgerStore,
    company_id: &CompanyId,
    slot_id: &SlotId,
    request: BookSlotRequest,
) -> Result<Company, LedgerError> {
    let (ledger, ()) = store
        .apply(|ledger, _| {
            ledger
                .book_slot(
                    company_id,
                    slot_id,
                    request.occupant,
                    request.expected_version,
                )
                .map(|next| (next, ()))
        })
        .await?;

    tracing::info!("Slot {} at {} booked", slot_id, company_id);
    company_in(&ledger, company_id)
}

/// Отмена бронирования. Возвращает компанию после изменения.
pub async fn cancel(
    store: &LedgerStore,
    company_id: &CompanyId,
    slot_id: &SlotId,
    request: CancelSlotRequest,
) -> Result<Company, LedgerError> {
    let (ledger, ()) = store
        .apply(|ledger, _| {
            ledger
                .cancel_slot(company_id, slot_id, request.expected_version)
                .map(|next| (next, ()))
        })
        .await?;

    tracing::info!("Slot {} at {} released", slot_id, company_id);
    company_in(&ledger, company_id)
}

/// История: все занятые слоты по всем компаниям
pub async fn history(store: &LedgerStore) -> Vec<BookingHistoryEntry> {
    store.snapshot().await.bookings().collect()
}

pub async fn summary(store: &LedgerStore) -> LedgerSummary {
    store.snapshot().await.summary()
}
