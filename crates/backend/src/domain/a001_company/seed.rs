//! Начальный список компаний, которым заполняется реестр при запуске

use contracts::domain::a001_company::aggregate::{
    Company, CompanyDetails, CompanyId, Slot, SlotId, SLOTS_PER_COMPANY,
};

use super::ledger::{Ledger, LedgerError};

struct SeedCompany {
    name: &'static str,
    industry: &'static str,
    location: &'static str,
    website: &'static str,
    established: &'static str,
    description: &'static str,
}

const SEED: &[SeedCompany] = &[
    SeedCompany {
        name: "Nimbus Analytics",
        industry: "Data & AI",
        location: "Bengaluru, Karnataka",
        website: "www.nimbusanalytics.example",
        established: "2014",
        description: "Builds forecasting and reporting platforms for retail and logistics chains.",
    },
    SeedCompany {
        name: "Kaveri Systems",
        industry: "Enterprise Software",
        location: "Hyderabad, Telangana",
        website: "kaverisystems.example",
        established: "2009",
        description: "ERP integration and payroll automation for mid-sized manufacturers.",
    },
    SeedCompany {
        name: "Bluepeak Fintech",
        industry: "Financial Services",
        location: "Mumbai, Maharashtra",
        website: "https://bluepeak.example",
        established: "2017",
        description: "Digital lending and UPI payment rails for small businesses.",
    },
    SeedCompany {
        name: "Sahyadri Labs",
        industry: "Cloud Infrastructure",
        location: "Pune, Maharashtra",
        website: "sahyadrilabs.example",
        established: "2012",
        description: "Managed Kubernetes and observability services for product teams.",
    },
    SeedCompany {
        name: "Orbitline Logistics",
        industry: "Supply Chain",
        location: "Chennai, Tamil Nadu",
        website: "orbitline.example",
        established: "2005",
        description: "Fleet tracking and warehouse robotics across southern India.",
    },
    SeedCompany {
        name: "Verdant Health Tech",
        industry: "Healthcare",
        location: "Noida, Uttar Pradesh",
        website: "verdanthealth.example",
        established: "2019",
        description: "Telemedicine scheduling and electronic health records for clinics.",
    },
];

/// Компании по умолчанию: ID `c-<n>`, слоты `s-<n>-<k>`
pub fn initial_companies() -> Vec<Company> {
    SEED.iter()
        .enumerate()
        .map(|(i, seed)| {
            let n = i + 1;
            let slots = (1..=SLOTS_PER_COMPANY)
                .map(|k| Slot::vacant(SlotId(format!("s-{}-{}", n, k))))
                .collect();
            Company::new_with_id(
                CompanyId(format!("c-{}", n)),
                CompanyDetails {
                    name: seed.name.into(),
                    industry: seed.industry.into(),
                    location: seed.location.into(),
                    website: seed.website.into(),
                    established: seed.established.into(),
                    description: seed.description.into(),
                },
                slots,
            )
        })
        .collect()
}

pub fn initial_ledger() -> Result<Ledger, LedgerError> {
    Ledger::new(initial_companies())
}
