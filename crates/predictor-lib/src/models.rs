//! Core data models for the financial inclusion predictor

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// Survey years the model was trained on
pub const VALID_YEARS: [u16; 3] = [2016, 2017, 2018];

/// Valid household size range, inclusive
pub const HOUSEHOLD_SIZE_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

/// Valid respondent age range, inclusive
pub const AGE_RANGE: std::ops::RangeInclusive<u8> = 16..=100;

/// A categorical survey attribute with a closed value set and an explicit
/// reference level.
///
/// The reference level is the category the trained schema omits under the
/// drop-first one-hot convention: it is represented by all of the attribute's
/// one-hot columns being zero. Naming it per attribute keeps the encoding
/// independent of which columns happen to exist in a given schema artifact.
pub trait Categorical: Sized + Copy + PartialEq + 'static {
    /// Attribute name as it appears in trained column names
    const ATTRIBUTE: &'static str;

    /// Level omitted from the trained schema
    const REFERENCE: Self;

    /// Human-readable label, exactly as it appears in the survey data
    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self>;

    /// All levels of this attribute, reference level included
    fn levels() -> &'static [Self];

    fn is_reference(&self) -> bool {
        *self == Self::REFERENCE
    }

    /// One-hot column name for this level, e.g. `country_Rwanda`
    fn column_name(&self) -> String {
        format!("{}_{}", Self::ATTRIBUTE, self.label())
    }

    /// Parse a caller-supplied label, identifying the attribute and its
    /// allowed domain on failure.
    fn parse(label: &str) -> Result<Self, PredictionError> {
        Self::from_label(label).ok_or_else(|| PredictionError::Validation {
            attribute: Self::ATTRIBUTE,
            value: label.to_string(),
            reason: format!(
                "expected one of: {}",
                Self::levels()
                    .iter()
                    .map(|level| level.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, attribute = $attribute:literal, reference = $reference:ident {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl Categorical for $name {
            const ATTRIBUTE: &'static str = $attribute;
            const REFERENCE: Self = Self::$reference;

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn levels() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }
        }
    };
}

categorical! {
    /// Survey country
    Country, attribute = "country", reference = Kenya {
        Kenya => "Kenya",
        Rwanda => "Rwanda",
        Tanzania => "Tanzania",
        Uganda => "Uganda",
    }
}

categorical! {
    LocationType, attribute = "location_type", reference = Rural {
        Rural => "Rural",
        Urban => "Urban",
    }
}

categorical! {
    CellphoneAccess, attribute = "cellphone_access", reference = No {
        Yes => "Yes",
        No => "No",
    }
}

categorical! {
    Gender, attribute = "gender_of_respondent", reference = Female {
        Female => "Female",
        Male => "Male",
    }
}

categorical! {
    RelationshipWithHead, attribute = "relationship_with_head", reference = HeadOfHousehold {
        HeadOfHousehold => "Head of Household",
        Spouse => "Spouse",
        Child => "Child",
        Parent => "Parent",
        OtherRelative => "Other relative",
        OtherNonRelatives => "Other non-relatives",
    }
}

categorical! {
    MaritalStatus, attribute = "marital_status", reference = DivorcedSeparated {
        MarriedLivingTogether => "Married/Living together",
        DivorcedSeparated => "Divorced/Separated",
        Widowed => "Widowed",
        SingleNeverMarried => "Single/Never Married",
        DontKnow => "Dont know",
    }
}

categorical! {
    EducationLevel, attribute = "education_level", reference = NoFormalEducation {
        NoFormalEducation => "No formal education",
        PrimaryEducation => "Primary education",
        SecondaryEducation => "Secondary education",
        VocationalTraining => "Vocational/Specialised training",
        TertiaryEducation => "Tertiary education",
        OtherDontKnow => "Other/Dont know/RTA",
    }
}

categorical! {
    JobType, attribute = "job_type", reference = SelfEmployed {
        SelfEmployed => "Self employed",
        GovernmentDependent => "Government Dependent",
        FormallyEmployedPrivate => "Formally employed Private",
        InformallyEmployed => "Informally employed",
        FormallyEmployedGovernment => "Formally employed Government",
        FarmingAndFishing => "Farming and Fishing",
        RemittanceDependent => "Remittance Dependent",
        OtherIncome => "Other Income",
        DontKnowRefuse => "Dont Know/Refuse to answer",
        NoIncome => "No Income",
    }
}

/// Demographic and financial-behavior attributes for one individual,
/// after validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub country: Country,
    pub year: u16,
    pub location_type: LocationType,
    pub cellphone_access: CellphoneAccess,
    pub household_size: u8,
    pub age_of_respondent: u8,
    pub gender_of_respondent: Gender,
    pub relationship_with_head: RelationshipWithHead,
    pub marital_status: MaritalStatus,
    pub education_level: EducationLevel,
    pub job_type: JobType,
}

/// Wire shape of a prediction request: categorical attributes as their
/// human-readable labels, numeric attributes as plain integers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputForm {
    pub country: String,
    pub year: i64,
    pub location_type: String,
    pub cellphone_access: String,
    pub household_size: i64,
    pub age_of_respondent: i64,
    pub gender_of_respondent: String,
    pub relationship_with_head: String,
    pub marital_status: String,
    pub education_level: String,
    pub job_type: String,
}

impl RawInput {
    /// Validate a wire-level form into a typed input, failing on the first
    /// attribute outside its domain.
    pub fn from_form(form: &InputForm) -> Result<Self, PredictionError> {
        let raw = Self {
            country: Country::parse(&form.country)?,
            year: narrow(form.year, "year")?,
            location_type: LocationType::parse(&form.location_type)?,
            cellphone_access: CellphoneAccess::parse(&form.cellphone_access)?,
            household_size: narrow(form.household_size, "household_size")?,
            age_of_respondent: narrow(form.age_of_respondent, "age_of_respondent")?,
            gender_of_respondent: Gender::parse(&form.gender_of_respondent)?,
            relationship_with_head: RelationshipWithHead::parse(&form.relationship_with_head)?,
            marital_status: MaritalStatus::parse(&form.marital_status)?,
            education_level: EducationLevel::parse(&form.education_level)?,
            job_type: JobType::parse(&form.job_type)?,
        };
        raw.validate()?;
        Ok(raw)
    }

    /// Check numeric attributes against their documented ranges, failing on
    /// the first violation.
    pub fn validate(&self) -> Result<(), PredictionError> {
        if !VALID_YEARS.contains(&self.year) {
            return Err(PredictionError::Validation {
                attribute: "year",
                value: self.year.to_string(),
                reason: "expected one of: 2016, 2017, 2018".to_string(),
            });
        }
        if !HOUSEHOLD_SIZE_RANGE.contains(&self.household_size) {
            return Err(PredictionError::Validation {
                attribute: "household_size",
                value: self.household_size.to_string(),
                reason: "expected a value between 1 and 20".to_string(),
            });
        }
        if !AGE_RANGE.contains(&self.age_of_respondent) {
            return Err(PredictionError::Validation {
                attribute: "age_of_respondent",
                value: self.age_of_respondent.to_string(),
                reason: "expected a value between 16 and 100".to_string(),
            });
        }
        Ok(())
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, attribute: &'static str) -> Result<T, PredictionError> {
    T::try_from(value).map_err(|_| PredictionError::Validation {
        attribute,
        value: value.to_string(),
        reason: "value out of range".to_string(),
    })
}

/// Feature vector aligned to the expected schema, in schema order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value under a named column, resolved through the schema the vector
    /// was aligned to
    pub fn value(&self, schema: &crate::schema::ExpectedSchema, column: &str) -> Option<f32> {
        schema
            .position(column)
            .and_then(|position| self.values.get(position).copied())
    }
}

/// Binary classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountLabel {
    NoAccount,
    HasAccount,
}

impl AccountLabel {
    pub fn index(&self) -> usize {
        match self {
            Self::NoAccount => 0,
            Self::HasAccount => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::NoAccount),
            1 => Some(Self::HasAccount),
            _ => None,
        }
    }

    /// Human-readable label text
    pub fn text(&self) -> &'static str {
        match self {
            Self::NoAccount => "does not have a bank account",
            Self::HasAccount => "has a bank account",
        }
    }
}

/// Classifier output: the predicted label and the class-conditional
/// probability distribution, indexed by label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: AccountLabel,
    pub probabilities: [f32; 2],
}

impl Prediction {
    pub fn class_probability(&self, label: AccountLabel) -> f32 {
        self.probabilities[label.index()]
    }
}

/// Caller-facing prediction report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub label: AccountLabel,
    pub label_text: String,
    pub probability_no_account: f32,
    pub probability_has_account: f32,
    pub percent_no_account: String,
    pub percent_has_account: String,
    pub generated_at: i64,
}
