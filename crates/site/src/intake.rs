//! Intake questionnaire: raw form, field validation, and the submitted record.
//!
//! Validation is a pure function of [`IntakeForm`] driven by the
//! [`FIELD_VALIDATORS`] table. Only a form with no violations can become an
//! [`IntakeRecord`], which is what gets posted to the forms endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

use prana_core::{Email, Goal, GoalSet, Phone};

/// Questionnaire fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Age,
}

impl Field {
    /// The form input name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Age => "age",
        }
    }
}

/// One validation rule: a field, the message shown when it is violated, and
/// the check itself.
pub struct FieldValidator {
    pub field: Field,
    pub message: &'static str,
    pub is_valid: fn(&IntakeForm) -> bool,
}

/// Every rule a questionnaire must satisfy before it is submitted.
///
/// Gender, goals and the free-text answers are optional and unchecked.
pub const FIELD_VALIDATORS: &[FieldValidator] = &[
    FieldValidator {
        field: Field::Name,
        message: "Name required",
        is_valid: |form| !form.name.trim().is_empty(),
    },
    FieldValidator {
        field: Field::Email,
        message: "Valid email required",
        is_valid: |form| Email::parse(&form.email).is_ok(),
    },
    FieldValidator {
        field: Field::Phone,
        message: "Valid 10-digit Indian phone required",
        is_valid: |form| Phone::parse(&form.phone).is_ok(),
    },
    FieldValidator {
        field: Field::Age,
        message: "Valid age required",
        is_valid: |form| parse_age(&form.age).is_some(),
    },
];

/// Violated fields and their messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    /// Message for a field, if it is invalid.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Whether the form passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over violations in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// The questionnaire exactly as the visitor filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
    pub goals: GoalSet,
    pub health_conditions: String,
    pub dietary_restrictions: String,
    pub experience: String,
    pub availability: String,
}

impl IntakeForm {
    /// Build a form from urlencoded `(name, value)` pairs.
    ///
    /// `goals` may repeat, one pair per checked box. Unknown goal labels and
    /// unknown fields are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "age" => form.age = value,
                "gender" => form.gender = value,
                "goals" => {
                    if let Ok(goal) = value.parse::<Goal>() {
                        form.goals.insert(goal);
                    }
                }
                "healthConditions" => form.health_conditions = value,
                "dietaryRestrictions" => form.dietary_restrictions = value,
                "experience" => form.experience = value,
                "availability" => form.availability = value,
                _ => {}
            }
        }

        form
    }

    /// Run every rule in [`FIELD_VALIDATORS`].
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        ValidationErrors(
            FIELD_VALIDATORS
                .iter()
                .filter(|validator| !(validator.is_valid)(self))
                .map(|validator| (validator.field, validator.message))
                .collect(),
        )
    }

    /// Validate and convert into the record that gets submitted.
    ///
    /// # Errors
    ///
    /// Returns every violated field when any rule fails.
    pub fn into_record(self) -> Result<IntakeRecord, ValidationErrors> {
        let errors = self.validate();

        let (Ok(email), Ok(phone), Some(age)) = (
            Email::parse(&self.email),
            Phone::parse(&self.phone),
            parse_age(&self.age),
        ) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(IntakeRecord {
            name: self.name.trim().to_string(),
            email,
            phone,
            age,
            gender: self.gender,
            goals: self.goals,
            health_conditions: self.health_conditions,
            dietary_restrictions: self.dietary_restrictions,
            experience: self.experience,
            availability: self.availability,
        })
    }
}

/// Whole years, at least one.
fn parse_age(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|age| *age >= 1)
}

/// A validated questionnaire, posted to the forms endpoint as one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub age: u32,
    pub gender: String,
    pub goals: GoalSet,
    pub health_conditions: String,
    pub dietary_restrictions: String,
    pub experience: String,
    pub availability: String,
}
