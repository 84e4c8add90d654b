use serde::{Deserialize, Serialize};

use super::occupant::Occupant;
use crate::domain::common::aggregate_id::parse_prefixed;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

/// Сколько слотов получает компания при создании
pub const SLOTS_PER_COMPANY: usize = 3;

// ============================================================================
// ID Types
// ============================================================================

/// Уникальный идентификатор компании (`c-<stamp>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    /// ID для компании, созданной в момент `stamp` (unix millis)
    pub fn from_stamp(stamp: i64) -> Self {
        Self(format!("c-{}", stamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AggregateId for CompanyId {
    fn as_string(&self) -> String {
        self.0.clone()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        parse_prefixed(s, "c").map(CompanyId)
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Уникальный идентификатор слота (`s-<stamp>-<n>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    /// ID слота номер `index` (с единицы) компании, созданной в момент `stamp`
    pub fn from_stamp(stamp: i64, index: usize) -> Self {
        Self(format!("s-{}-{}", stamp, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AggregateId for SlotId {
    fn as_string(&self) -> String {
        self.0.clone()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        parse_prefixed(s, "s").map(SlotId)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Slot
// ============================================================================

/// Слот бронирования.
///
/// `occupant` заполнен тогда и только тогда, когда `is_booked == true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,

    #[serde(rename = "isBooked")]
    pub is_booked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<Occupant>,

    /// Растёт при каждом бронировании и отмене
    #[serde(default)]
    pub version: u32,
}

impl Slot {
    /// Свободный слот
    pub fn vacant(id: SlotId) -> Self {
        Self {
            id,
            is_booked: false,
            occupant: None,
            version: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.is_booked
    }

    /// Занять слот. Проверка доступности лежит на вызывающем коде.
    pub fn occupy(&mut self, occupant: Occupant) {
        self.is_booked = true;
        self.occupant = Some(occupant);
        self.version += 1;
    }

    /// Освободить слот. Данные прежнего жильца не сохраняются.
    pub fn release(&mut self) {
        self.is_booked = false;
        self.occupant = None;
        self.version += 1;
    }

    pub fn is_consistent(&self) -> bool {
        self.is_booked == self.occupant.is_some()
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Описательные поля компании, редактируемые администратором
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompanyDetails {
    pub name: String,
    pub industry: String,
    pub location: String,
    pub website: String,
    pub established: String,
    pub description: String,
}

impl CompanyDetails {
    /// Все поля обязательны
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("industry", &self.industry),
            ("location", &self.location),
            ("website", &self.website),
            ("established", &self.established),
            ("description", &self.description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Field '{}' is required", field));
            }
        }
        Ok(())
    }

    fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.industry,
            &self.location,
            &self.website,
            &self.description,
        ]
    }
}

/// Компания с фиксированным набором слотов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,

    #[serde(flatten)]
    pub details: CompanyDetails,

    pub slots: Vec<Slot>,

    pub metadata: EntityMetadata,
}

impl Company {
    /// Новая компания с тремя свободными слотами; ID выводятся из `stamp`
    pub fn new_for_insert(stamp: i64, details: CompanyDetails) -> Self {
        let slots = (1..=SLOTS_PER_COMPANY)
            .map(|index| Slot::vacant(SlotId::from_stamp(stamp, index)))
            .collect();
        Self::new_with_id(CompanyId::from_stamp(stamp), details, slots)
    }

    /// Компания с заданными ID и слотами (для начальных данных)
    pub fn new_with_id(id: CompanyId, details: CompanyDetails, slots: Vec<Slot>) -> Self {
        Self {
            id,
            details,
            slots,
            metadata: EntityMetadata::new(),
        }
    }

    /// Обновить описательные поля. Слоты не трогаются.
    pub fn update(&mut self, details: CompanyDetails) {
        self.details = details;
        self.metadata.record_change();
    }

    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.id == id)
    }

    pub fn slot_mut(&mut self, id: &SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| &s.id == id)
    }

    pub fn available_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_available()).count()
    }

    pub fn booked_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_booked).count()
    }

    /// Поиск подстроки без учёта регистра по названию, отрасли, городу,
    /// сайту и описанию. `needle` должен быть уже в нижнем регистре.
    pub fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .details
                .searchable_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }

    /// Ссылка на сайт: без пробелов по краям и с протоколом
    pub fn website_url(&self) -> String {
        let clean = self.details.website.trim();
        if clean.is_empty() {
            "#".to_string()
        } else if clean.starts_with("http") {
            clean.to_string()
        } else {
            format!("https://{}", clean)
        }
    }

    /// Ссылка на поиск локации в Google Maps
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={}",
            urlencoding::encode(&self.details.location)
        )
    }
}

impl AggregateRoot for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.details.name
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "company"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления компании
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyDto {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(flatten)]
    pub details: CompanyDetails,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_company::occupant::{ContactDetails, OccupantDetails};

    fn details(name: &str) -> CompanyDetails {
        CompanyDetails {
            name: name.into(),
            industry: "Fintech".into(),
            location: "Pune, Maharashtra".into(),
            website: " acme.example ".into(),
            established: "2012".into(),
            description: "Payments infrastructure".into(),
        }
    }

    #[test]
    fn test_new_for_insert_has_three_vacant_slots() {
        let company = Company::new_for_insert(1_700_000_000_000, details("Acme"));
        assert_eq!(company.id.as_str(), "c-1700000000000");
        assert_eq!(company.slots.len(), SLOTS_PER_COMPANY);
        assert_eq!(company.slots[2].id.as_str(), "s-1700000000000-3");
        assert!(company.slots.iter().all(|s| s.is_available() && s.is_consistent()));
        assert_eq!(company.available_slots(), 3);
    }

    #[test]
    fn test_occupy_and_release_keep_invariant() {
        let mut slot = Slot::vacant(SlotId("s-1-1".into()));
        let occupant = Occupant::new(OccupantDetails::Contact(ContactDetails::named("Jane")));
        slot.occupy(occupant);
        assert!(slot.is_booked && slot.is_consistent());
        assert_eq!(slot.version, 1);

        slot.release();
        assert!(!slot.is_booked && slot.occupant.is_none());
        assert_eq!(slot.version, 2);
    }

    #[test]
    fn test_matches_query_fields() {
        let company = Company::new_for_insert(1, details("Acme"));
        assert!(company.matches_query(""));
        assert!(company.matches_query("acme"));
        assert!(company.matches_query("fintech"));
        assert!(company.matches_query("pune"));
        assert!(company.matches_query("example"));
        assert!(company.matches_query("payments"));
        // established не участвует в поиске
        assert!(!company.matches_query("2012"));
    }

    #[test]
    fn test_validate_requires_every_field() {
        assert!(details("Acme").validate().is_ok());
        let mut d = details("Acme");
        d.location = "   ".into();
        assert_eq!(d.validate().unwrap_err(), "Field 'location' is required");
    }

    #[test]
    fn test_urls() {
        let mut company = Company::new_for_insert(1, details("Acme"));
        assert_eq!(company.website_url(), "https://acme.example");
        company.details.website = "http://acme.example".into();
        assert_eq!(company.website_url(), "http://acme.example");
        company.details.website = "  ".into();
        assert_eq!(company.website_url(), "#");
        assert_eq!(
            company.maps_url(),
            "https://www.google.com/maps/search/?api=1&query=Pune%2C%20Maharashtra"
        );
    }

    #[test]
    fn test_company_json_shape() {
        let company = Company::new_for_insert(5, details("Acme"));
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["id"], "c-5");
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["slots"][0]["isBooked"], false);
        assert!(json["slots"][0].get("occupant").is_none());

        let back: Company = serde_json::from_value(json).unwrap();
        assert_eq!(back, company);
    }

    #[test]
    fn test_id_from_string() {
        assert_eq!(
            CompanyId::from_string("c-42").unwrap(),
            CompanyId("c-42".into())
        );
        assert!(CompanyId::from_string("s-42-1").is_err());
        assert!(SlotId::from_string("s-42-1").is_ok());
        assert_eq!(Company::full_name(), "a001_company");
    }
}
