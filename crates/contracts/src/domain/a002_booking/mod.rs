//! Запросы и представления бронирований

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a001_company::aggregate::{CompanyId, SlotId};
use crate::domain::a001_company::occupant::OccupantDetails;

/// Запрос на бронирование слота
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub occupant: OccupantDetails,

    /// Ожидаемая версия слота; при несовпадении бронирование отклоняется
    #[serde(rename = "expectedVersion", default)]
    pub expected_version: Option<u32>,
}

/// Запрос на отмену бронирования
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CancelSlotRequest {
    #[serde(rename = "expectedVersion", default)]
    pub expected_version: Option<u32>,
}

/// Строка истории бронирований
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryEntry {
    pub company_id: CompanyId,
    pub company_name: String,
    pub company_industry: String,
    pub slot_id: SlotId,
    pub occupant_name: String,
    pub booking_id: Uuid,
    pub booked_at: DateTime<Utc>,
}

/// Сводка по всем компаниям (для бейджа с количеством бронирований)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_booked: usize,
    pub total_slots: usize,
    pub companies: usize,
}
