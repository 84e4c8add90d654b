use std::collections::HashSet;
use std::sync::Arc;

use contracts::domain::a001_company::aggregate::{Company, CompanyDetails, CompanyId, Slot, SlotId};
use contracts::domain::a001_company::occupant::{Occupant, OccupantDetails};
use contracts::domain::a002_booking::{BookingHistoryEntry, LedgerSummary};
use thiserror::Error;

use crate::shared::ids::IdClock;

/// Ошибки операций над реестром. При любой ошибке снимок не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Company {0} not found")]
    CompanyNotFound(CompanyId),

    #[error("Slot {slot} not found at company {company}")]
    SlotNotFound { company: CompanyId, slot: SlotId },

    #[error("Slot {0} is already booked")]
    AlreadyBooked(SlotId),

    #[error("Slot {0} is not booked")]
    NotBooked(SlotId),

    #[error("Slot {slot} was modified (version {actual}, expected {expected})")]
    VersionConflict {
        slot: SlotId,
        expected: u32,
        actual: u32,
    },

    #[error("Duplicate company id {0}")]
    DuplicateCompany(CompanyId),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Неизменяемый снимок всех компаний и их слотов.
///
/// Каждая мутация возвращает новый снимок. Незатронутые компании
/// разделяются между старым и новым снимком через `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    companies: Vec<Arc<Company>>,
}

impl Ledger {
    pub fn new(companies: Vec<Company>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::new();
        for company in &companies {
            if !seen.insert(company.id.clone()) {
                return Err(LedgerError::DuplicateCompany(company.id.clone()));
            }
            if let Some(slot) = company.slots.iter().find(|s| !s.is_consistent()) {
                return Err(LedgerError::Validation(format!(
                    "Slot {} booked state does not match its occupant",
                    slot.id
                )));
            }
        }
        Ok(Self {
            companies: companies.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.companies.iter().map(|c| c.as_ref())
    }

    pub fn get(&self, id: &CompanyId) -> Option<&Company> {
        self.companies().find(|c| &c.id == id)
    }

    fn position(&self, id: &CompanyId) -> Result<usize, LedgerError> {
        self.companies
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| LedgerError::CompanyNotFound(id.clone()))
    }

    /// Копия снимка с заменой одной компании
    fn with_company(&self, index: usize, company: Company) -> Ledger {
        let mut companies = self.companies.clone();
        companies[index] = Arc::new(company);
        Ledger { companies }
    }

    /// Применить изменение к одному слоту компании
    fn modify_slot<F>(
        &self,
        company_id: &CompanyId,
        slot_id: &SlotId,
        expected_version: Option<u32>,
        change: F,
    ) -> Result<Ledger, LedgerError>
    where
        F: FnOnce(&mut Slot) -> Result<(), LedgerError>,
    {
        let index = self.position(company_id)?;
        let mut company = Company::clone(&self.companies[index]);
        let slot = company
            .slot_mut(slot_id)
            .ok_or_else(|| LedgerError::SlotNotFound {
                company: company_id.clone(),
                slot: slot_id.clone(),
            })?;
        if let Some(expected) = expected_version {
            if slot.version != expected {
                return Err(LedgerError::VersionConflict {
                    slot: slot_id.clone(),
                    expected,
                    actual: slot.version,
                });
            }
        }
        change(slot)?;
        company.metadata.record_change();
        Ok(self.with_company(index, company))
    }

    /// Забронировать свободный слот (check-and-set).
    ///
    /// Каждый вызов создаёт новую запись `Occupant`.
    pub fn book_slot(
        &self,
        company_id: &CompanyId,
        slot_id: &SlotId,
        details: OccupantDetails,
        expected_version: Option<u32>,
    ) -> Result<Ledger, LedgerError> {
        details.validate().map_err(LedgerError::Validation)?;
        self.modify_slot(company_id, slot_id, expected_version, |slot| {
            if slot.is_booked {
                return Err(LedgerError::AlreadyBooked(slot.id.clone()));
            }
            slot.occupy(Occupant::new(details));
            Ok(())
        })
    }

    /// Снять бронь. Прежний жилец не сохраняется.
    pub fn cancel_slot(
        &self,
        company_id: &CompanyId,
        slot_id: &SlotId,
        expected_version: Option<u32>,
    ) -> Result<Ledger, LedgerError> {
        self.modify_slot(company_id, slot_id, expected_version, |slot| {
            if !slot.is_booked {
                return Err(LedgerError::NotBooked(slot.id.clone()));
            }
            slot.release();
            Ok(())
        })
    }

    /// Создать компанию (`id == None`) или обновить описательные поля
    /// существующей. Слоты при обновлении не меняются.
    pub fn upsert_company(
        &self,
        details: CompanyDetails,
        id: Option<&CompanyId>,
        clock: &IdClock,
    ) -> Result<(Ledger, CompanyId), LedgerError> {
        details.validate().map_err(LedgerError::Validation)?;

        match id {
            Some(id) => {
                let index = self.position(id)?;
                let mut company = Company::clone(&self.companies[index]);
                company.update(details);
                Ok((self.with_company(index, company), id.clone()))
            }
            None => {
                let company = Company::new_for_insert(clock.next_stamp(), details);
                if self.get(&company.id).is_some() {
                    return Err(LedgerError::DuplicateCompany(company.id));
                }
                let id = company.id.clone();
                let mut companies = self.companies.clone();
                companies.push(Arc::new(company));
                Ok((Ledger { companies }, id))
            }
        }
    }

    /// Ленивый фильтр по подстроке без учёта регистра.
    /// Пустой запрос пропускает все компании; порядок сохраняется.
    pub fn filter(&self, query: &str) -> Filter<'_> {
        Filter {
            needle: query.to_lowercase(),
            inner: self.companies.iter(),
        }
    }

    /// Количество занятых слотов по всем компаниям
    pub fn total_booked(&self) -> usize {
        self.companies().map(Company::booked_slots).sum()
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_booked: self.total_booked(),
            total_slots: self.companies().map(|c| c.slots.len()).sum(),
            companies: self.len(),
        }
    }

    /// Все бронирования в порядке компаний и слотов
    pub fn bookings(&self) -> impl Iterator<Item = BookingHistoryEntry> + '_ {
        self.companies().flat_map(|company| {
            company.slots.iter().filter_map(move |slot| {
                let occupant = slot.occupant.as_ref()?;
                Some(BookingHistoryEntry {
                    company_id: company.id.clone(),
                    company_name: company.details.name.clone(),
                    company_industry: company.details.industry.clone(),
                    slot_id: slot.id.clone(),
                    occupant_name: occupant.display_name().to_string(),
                    booking_id: occupant.booking_id,
                    booked_at: occupant.booked_at,
                })
            })
        })
    }
}

/// Итератор результата поиска; клонируется для повторного прохода
#[derive(Debug, Clone)]
pub struct Filter<'a> {
    needle: String,
    inner: std::slice::Iter<'a, Arc<Company>>,
}

impl<'a> Iterator for Filter<'a> {
    type Item = &'a Company;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.inner
            .find(|c| c.matches_query(needle))
            .map(|c| c.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_company::aggregate::SLOTS_PER_COMPANY;
    use contracts::domain::a001_company::occupant::ContactDetails;

    fn details(name: &str, industry: &str) -> CompanyDetails {
        CompanyDetails {
            name: name.into(),
            industry: industry.into(),
            location: "Bengaluru, Karnataka".into(),
            website: format!("{}.example", name.to_lowercase()),
            established: "2010".into(),
            description: format!("{} builds things", name),
        }
    }

    fn company(n: usize, name: &str, industry: &str) -> Company {
        let slots = (1..=SLOTS_PER_COMPANY)
            .map(|k| Slot::vacant(SlotId(format!("s-{}-{}", n, k))))
            .collect();
        Company::new_with_id(CompanyId(format!("c-{}", n)), details(name, industry), slots)
    }

    fn ledger() -> Ledger {
        Ledger::new(vec![
            company(1, "Acme", "Fintech"),
            company(2, "Globex", "Logistics"),
            company(3, "Initech", "Software"),
        ])
        .unwrap()
    }

    fn jane() -> OccupantDetails {
        OccupantDetails::Contact(ContactDetails::named("Jane"))
    }

    fn a() -> CompanyId {
        CompanyId("c-1".into())
    }

    fn slot(k: usize) -> SlotId {
        SlotId(format!("s-1-{}", k))
    }

    #[test]
    fn test_book_then_cancel_scenario() {
        let l0 = ledger();
        let l1 = l0.book_slot(&a(), &slot(1), jane(), None).unwrap();

        let company = l1.get(&a()).unwrap();
        let booked = company.slot(&slot(1)).unwrap();
        assert!(booked.is_booked);
        assert_eq!(booked.occupant.as_ref().unwrap().display_name(), "Jane");
        assert!(!company.slot(&slot(2)).unwrap().is_booked);
        assert!(!company.slot(&slot(3)).unwrap().is_booked);

        // исходный снимок не изменился
        assert_eq!(l0.total_booked(), 0);

        let l2 = l1.cancel_slot(&a(), &slot(1), None).unwrap();
        let cancelled = l2.get(&a()).unwrap().slot(&slot(1)).unwrap();
        assert!(!cancelled.is_booked);
        assert!(cancelled.occupant.is_none());
    }

    #[test]
    fn test_untouched_companies_are_shared() {
        let l0 = ledger();
        let l1 = l0.book_slot(&a(), &slot(1), jane(), None).unwrap();
        assert!(!Arc::ptr_eq(&l0.companies[0], &l1.companies[0]));
        assert!(Arc::ptr_eq(&l0.companies[1], &l1.companies[1]));
        assert!(Arc::ptr_eq(&l0.companies[2], &l1.companies[2]));
    }

    #[test]
    fn test_double_booking_is_rejected() {
        let l1 = ledger().book_slot(&a(), &slot(1), jane(), None).unwrap();
        let before = l1.get(&a()).unwrap().clone();

        let err = l1
            .book_slot(&a(), &slot(1), OccupantDetails::Contact(ContactDetails::named("Bob")), None)
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyBooked(slot(1)));
        assert_eq!(l1.get(&a()).unwrap(), &before);
    }

    #[test]
    fn test_lookup_misses() {
        let l = ledger();
        let missing = CompanyId("c-404".into());
        assert_eq!(
            l.book_slot(&missing, &slot(1), jane(), None).unwrap_err(),
            LedgerError::CompanyNotFound(missing.clone())
        );
        assert_eq!(
            l.cancel_slot(&a(), &slot(9), None).unwrap_err(),
            LedgerError::SlotNotFound {
                company: a(),
                slot: slot(9)
            }
        );
        // слот другой компании не ищется в этой
        assert!(matches!(
            l.book_slot(&a(), &SlotId("s-2-1".into()), jane(), None),
            Err(LedgerError::SlotNotFound { .. })
        ));
    }

    #[test]
    fn test_cancel_unbooked_is_rejected() {
        assert_eq!(
            ledger().cancel_slot(&a(), &slot(2), None).unwrap_err(),
            LedgerError::NotBooked(slot(2))
        );
    }

    #[test]
    fn test_rebook_gets_fresh_occupant() {
        let l1 = ledger().book_slot(&a(), &slot(1), jane(), None).unwrap();
        let first = l1.get(&a()).unwrap().slot(&slot(1)).unwrap().occupant.clone().unwrap();

        let l2 = l1.cancel_slot(&a(), &slot(1), None).unwrap();
        let l3 = l2
            .book_slot(&a(), &slot(1), OccupantDetails::Contact(ContactDetails::named("Ravi")), None)
            .unwrap();
        let second = l3.get(&a()).unwrap().slot(&slot(1)).unwrap().occupant.clone().unwrap();

        assert_ne!(first.booking_id, second.booking_id);
        assert_eq!(second.display_name(), "Ravi");
    }

    #[test]
    fn test_expected_version_check() {
        let l0 = ledger();
        let l1 = l0.book_slot(&a(), &slot(1), jane(), Some(0)).unwrap();
        assert_eq!(l1.get(&a()).unwrap().slot(&slot(1)).unwrap().version, 1);

        // устаревшая версия
        assert_eq!(
            l1.cancel_slot(&a(), &slot(1), Some(0)).unwrap_err(),
            LedgerError::VersionConflict {
                slot: slot(1),
                expected: 0,
                actual: 1
            }
        );
        let l2 = l1.cancel_slot(&a(), &slot(1), Some(1)).unwrap();
        assert_eq!(l2.get(&a()).unwrap().slot(&slot(1)).unwrap().version, 2);
    }

    #[test]
    fn test_invalid_occupant_is_rejected() {
        let err = ledger()
            .book_slot(&a(), &slot(1), OccupantDetails::Contact(ContactDetails::named("  ")), None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_total_booked_tracks_changes() {
        let l = ledger();
        assert_eq!(l.total_booked(), 0);
        let l = l.book_slot(&a(), &slot(1), jane(), None).unwrap();
        let l = l.book_slot(&a(), &slot(3), jane(), None).unwrap();
        let l = l
            .book_slot(&CompanyId("c-2".into()), &SlotId("s-2-2".into()), jane(), None)
            .unwrap();
        assert_eq!(l.total_booked(), 3);

        let counted: usize = l
            .companies()
            .flat_map(|c| c.slots.iter())
            .filter(|s| s.is_booked)
            .count();
        assert_eq!(l.total_booked(), counted);

        let l = l.cancel_slot(&a(), &slot(3), None).unwrap();
        assert_eq!(l.total_booked(), 2);
        assert_eq!(
            l.summary(),
            LedgerSummary {
                total_booked: 2,
                total_slots: 9,
                companies: 3
            }
        );
    }

    #[test]
    fn test_upsert_creates_company_with_three_slots() {
        let clock = IdClock::new();
        let l0 = ledger();
        let (l1, id) = l0.upsert_company(details("Acme", "Fintech"), None, &clock).unwrap();

        assert_eq!(l1.len(), 4);
        let created = l1.get(&id).unwrap();
        assert_eq!(created.slots.len(), SLOTS_PER_COMPANY);
        assert!(created.slots.iter().all(Slot::is_available));
        assert_eq!(l1.companies().last().map(|c| &c.id), Some(&id));

        let (l2, id2) = l1.upsert_company(details("Acme", "Fintech"), None, &clock).unwrap();
        assert_ne!(id, id2);
        assert_eq!(l2.len(), 5);
    }

    #[test]
    fn test_upsert_updates_details_only() {
        let clock = IdClock::new();
        let l1 = ledger().book_slot(&a(), &slot(2), jane(), None).unwrap();
        let before = l1.get(&a()).unwrap().clone();

        let (l2, id) = l1
            .upsert_company(details("Acme Renamed", "Fintech"), Some(&a()), &clock)
            .unwrap();
        assert_eq!(id, a());
        let after = l2.get(&a()).unwrap();
        assert_eq!(after.details.name, "Acme Renamed");
        assert_eq!(after.slots, before.slots);
        assert_eq!(after.metadata.version, before.metadata.version + 1);
        assert_eq!(l2.len(), l1.len());
    }

    #[test]
    fn test_upsert_unknown_id_and_validation() {
        let clock = IdClock::new();
        let missing = CompanyId("c-404".into());
        assert_eq!(
            ledger()
                .upsert_company(details("X", "Y"), Some(&missing), &clock)
                .unwrap_err(),
            LedgerError::CompanyNotFound(missing)
        );

        let mut blank = details("X", "Y");
        blank.name = String::new();
        assert!(matches!(
            ledger().upsert_company(blank, None, &clock),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_filter_semantics() {
        let l = ledger();
        let all: Vec<&CompanyId> = l.filter("").map(|c| &c.id).collect();
        assert_eq!(all, l.companies().map(|c| &c.id).collect::<Vec<_>>());

        let upper: Vec<&CompanyId> = l.filter("ACME").map(|c| &c.id).collect();
        let lower: Vec<&CompanyId> = l.filter("acme").map(|c| &c.id).collect();
        assert_eq!(upper, lower);
        assert_eq!(lower, vec![&a()]);

        // по отрасли и описанию
        assert_eq!(l.filter("logist").count(), 1);
        assert_eq!(l.filter("builds").count(), 3);
        assert_eq!(l.filter("bengaluru").count(), 3);
        assert_eq!(l.filter("nothing matches").count(), 0);

        for query in ["a", "tech", "x", "SOFT"] {
            let subset: Vec<&CompanyId> = l.filter(query).map(|c| &c.id).collect();
            assert!(subset.iter().all(|id| all.contains(id)));
        }
    }

    #[test]
    fn test_filter_is_restartable() {
        let l = ledger();
        let filter = l.filter("e");
        let first: Vec<_> = filter.clone().map(|c| c.id.clone()).collect();
        let second: Vec<_> = filter.map(|c| c.id.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bookings_history() {
        let l = ledger()
            .book_slot(&CompanyId("c-2".into()), &SlotId("s-2-3".into()), jane(), None)
            .unwrap()
            .book_slot(&a(), &slot(2), OccupantDetails::Contact(ContactDetails::named("Ravi")), None)
            .unwrap();
        let history: Vec<BookingHistoryEntry> = l.bookings().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].company_name, "Acme");
        assert_eq!(history[0].occupant_name, "Ravi");
        assert_eq!(history[1].company_industry, "Logistics");
        assert_eq!(history[1].slot_id, SlotId("s-2-3".into()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Ledger::new(vec![company(1, "A", "B"), company(1, "C", "D")]).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateCompany(a()));
    }

    #[test]
    fn test_inconsistent_slot_rejected() {
        let mut broken = company(1, "Acme", "Fintech");
        broken.slots[0].is_booked = true;
        assert!(matches!(
            Ledger::new(vec![broken]),
            Err(LedgerError::Validation(_))
        ));
        assert!(Ledger::new(Vec::new()).unwrap().is_empty());
    }
}
