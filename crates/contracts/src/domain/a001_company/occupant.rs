use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Запись о занявшем слот человеке.
///
/// Каждое бронирование создаёт новую запись со своим `booking_id`,
/// поэтому два слота никогда не делят одну и ту же запись.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    #[serde(rename = "bookingId")]
    pub booking_id: Uuid,

    #[serde(rename = "bookedAt")]
    pub booked_at: DateTime<Utc>,

    pub details: OccupantDetails,
}

impl Occupant {
    pub fn new(details: OccupantDetails) -> Self {
        Self {
            booking_id: Uuid::new_v4(),
            booked_at: Utc::now(),
            details,
        }
    }

    pub fn display_name(&self) -> &str {
        self.details.display_name()
    }
}

/// Данные, переданные при бронировании: короткий контакт или полная анкета
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OccupantDetails {
    Contact(ContactDetails),
    Registration(Box<RegistrationForm>),
}

impl OccupantDetails {
    pub fn display_name(&self) -> &str {
        match self {
            OccupantDetails::Contact(c) => &c.name,
            OccupantDetails::Registration(r) => &r.full_name,
        }
    }

    /// Проверка обязательных полей
    pub fn validate(&self) -> Result<(), String> {
        match self {
            OccupantDetails::Contact(c) => c.validate(),
            OccupantDetails::Registration(r) => r.validate(),
        }
    }
}

/// Имя и контакты
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Field 'name' is required".into());
        }
        Ok(())
    }
}

/// Регистрационная анкета кандидата
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub company_name: String,
    pub full_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub pan_number: String,
    pub dob: String,
    pub uan_number: String,
    pub permanent_address: String,
    pub offer_date: String,
    pub joining_date: String,
    #[serde(rename = "joiningCTC")]
    pub joining_ctc: String,
    pub joining_designation: String,
    #[serde(default)]
    pub hike_date: String,
    #[serde(rename = "currentCTC")]
    pub current_ctc: String,
    pub current_designation: String,
    #[serde(default)]
    pub resignation_date: String,
    #[serde(rename = "relivingDate", default)]
    pub relieving_date: String,
    pub pf_required: String,
    pub highest_qualification: String,
    pub year_of_pass: String,
    pub technology: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub bank_branch: String,
    #[serde(rename = "bankIFSCCode")]
    pub bank_ifsc_code: String,
    pub gender: String,
    pub marriage_status: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            full_name: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            pan_number: String::new(),
            dob: String::new(),
            uan_number: String::new(),
            permanent_address: String::new(),
            offer_date: String::new(),
            joining_date: String::new(),
            joining_ctc: String::new(),
            joining_designation: String::new(),
            hike_date: String::new(),
            current_ctc: String::new(),
            current_designation: String::new(),
            resignation_date: String::new(),
            relieving_date: String::new(),
            pf_required: "No".into(),
            highest_qualification: String::new(),
            year_of_pass: String::new(),
            technology: String::new(),
            bank_name: String::new(),
            bank_account_number: String::new(),
            bank_branch: String::new(),
            bank_ifsc_code: String::new(),
            gender: "Male".into(),
            marriage_status: "Single".into(),
        }
    }
}

impl RegistrationForm {
    /// Обязательны все поля, кроме дат повышения, заявления и увольнения.
    /// Формат (PAN, IFSC, даты) не проверяется.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("companyName", &self.company_name),
            ("fullName", &self.full_name),
            ("fatherName", &self.father_name),
            ("motherName", &self.mother_name),
            ("panNumber", &self.pan_number),
            ("dob", &self.dob),
            ("uanNumber", &self.uan_number),
            ("permanentAddress", &self.permanent_address),
            ("offerDate", &self.offer_date),
            ("joiningDate", &self.joining_date),
            ("joiningCTC", &self.joining_ctc),
            ("joiningDesignation", &self.joining_designation),
            ("currentCTC", &self.current_ctc),
            ("currentDesignation", &self.current_designation),
            ("pfRequired", &self.pf_required),
            ("highestQualification", &self.highest_qualification),
            ("yearOfPass", &self.year_of_pass),
            ("technology", &self.technology),
            ("bankName", &self.bank_name),
            ("bankAccountNumber", &self.bank_account_number),
            ("bankBranch", &self.bank_branch),
            ("bankIFSCCode", &self.bank_ifsc_code),
            ("gender", &self.gender),
            ("marriageStatus", &self.marriage_status),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("Field '{}' is required", field));
            }
        }
        Ok(())
    }
}
