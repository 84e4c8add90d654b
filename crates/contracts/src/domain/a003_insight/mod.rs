//! Описание компании, сгенерированное внешним сервисом

use serde::{Deserialize, Serialize};

use crate::domain::a001_company::aggregate::CompanyId;

/// Выбор компании в карточке просмотра
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCompanyRequest {
    pub viewer_id: String,
    pub company_id: CompanyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InsightStatus {
    Loading,
    Ready { text: String },
}

/// Текущее состояние описания для конкретного зрителя
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightView {
    pub viewer_id: String,
    pub company_id: CompanyId,
    #[serde(flatten)]
    pub status: InsightStatus,
}
