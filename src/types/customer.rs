//! Customer attributes collected by the prediction form

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Answer to a two-option question on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl YesNo {
    /// Options in the order they are offered on the form
    pub const OPTIONS: [YesNo; 2] = [YesNo::No, YesNo::Yes];

    /// Label shown to the user and accepted on the wire
    pub fn label(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }

    /// Numeric code seen by the classifier
    pub fn code(self) -> f32 {
        match self {
            YesNo::No => 0.0,
            YesNo::Yes => 1.0,
        }
    }
}

/// Contract duration class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContractType {
    #[default]
    #[serde(rename = "Month-to-month")]
    MonthToMonth,
    #[serde(rename = "One year")]
    OneYear,
    #[serde(rename = "Two year")]
    TwoYear,
}

impl ContractType {
    /// Options in the order they are offered on the form
    pub const OPTIONS: [ContractType; 3] = [
        ContractType::MonthToMonth,
        ContractType::OneYear,
        ContractType::TwoYear,
    ];

    /// Label shown to the user and accepted on the wire
    pub fn label(self) -> &'static str {
        match self {
            ContractType::MonthToMonth => "Month-to-month",
            ContractType::OneYear => "One year",
            ContractType::TwoYear => "Two year",
        }
    }

    /// Numeric code seen by the classifier (0 = month-to-month, 1 = one year, 2 = two year)
    pub fn code(self) -> f32 {
        match self {
            ContractType::MonthToMonth => 0.0,
            ContractType::OneYear => 1.0,
            ContractType::TwoYear => 2.0,
        }
    }
}

/// Rejected form value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidField {
    #[error("{field}: unknown option {value:?}")]
    UnknownOption { field: &'static str, value: String },
    #[error("{field}: {value:?} is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{field} is missing")]
    Missing { field: &'static str },
}

impl FromStr for YesNo {
    type Err = InvalidField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|option| option.label() == s)
            .ok_or_else(|| InvalidField::UnknownOption {
                field: "yes/no",
                value: s.to_string(),
            })
    }
}

impl FromStr for ContractType {
    type Err = InvalidField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|option| option.label() == s)
            .ok_or_else(|| InvalidField::UnknownOption {
                field: "Contract",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One customer as entered on the form.
///
/// Field names on the wire match the columns the classifier was trained on,
/// so the same record deserializes from the HTML form and from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer is a senior citizen
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: YesNo,

    /// Customer has a partner
    #[serde(rename = "Partner")]
    pub partner: YesNo,

    /// Customer has dependents
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,

    /// Months with the company
    #[serde(rename = "tenure")]
    pub tenure_months: u32,

    /// Subscribed to online security
    #[serde(rename = "OnlineSecurity")]
    pub online_security: YesNo,

    /// Subscribed to tech support
    #[serde(rename = "TechSupport")]
    pub tech_support: YesNo,

    /// Contract duration class
    #[serde(rename = "Contract")]
    pub contract: ContractType,

    /// Receives paperless bills
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,

    /// Current monthly charge
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,

    /// Total charged over the tenure
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Check the numeric fields the type system cannot constrain.
    ///
    /// Categorical fields are already restricted by their enum types and
    /// `tenure` by being unsigned. Charges must also survive the narrowing
    /// to the classifier's `f32` input.
    pub fn validate(&self) -> Result<(), InvalidField> {
        for (field, value) in [
            ("MonthlyCharges", self.monthly_charges),
            ("TotalCharges", self.total_charges),
        ] {
            if !value.is_finite() || value < 0.0 || !(value as f32).is_finite() {
                return Err(InvalidField::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Read a record from raw form fields.
    ///
    /// Fields that parse are kept and the rest stay at their defaults, so a
    /// rejected form can be shown again with the user's answers. Each error
    /// names the field it came from.
    pub fn from_form_fields(fields: &HashMap<String, String>) -> (Self, Vec<InvalidField>) {
        let mut record = Self::default();
        let mut errors = Vec::new();

        keep(option_field(fields, "SeniorCitizen"), &mut record.senior_citizen, &mut errors);
        keep(option_field(fields, "Partner"), &mut record.partner, &mut errors);
        keep(option_field(fields, "Dependents"), &mut record.dependents, &mut errors);
        keep(number_field(fields, "tenure"), &mut record.tenure_months, &mut errors);
        keep(option_field(fields, "OnlineSecurity"), &mut record.online_security, &mut errors);
        keep(option_field(fields, "TechSupport"), &mut record.tech_support, &mut errors);
        keep(option_field(fields, "Contract"), &mut record.contract, &mut errors);
        keep(option_field(fields, "PaperlessBilling"), &mut record.paperless_billing, &mut errors);
        keep(number_field(fields, "MonthlyCharges"), &mut record.monthly_charges, &mut errors);
        keep(number_field(fields, "TotalCharges"), &mut record.total_charges, &mut errors);

        (record, errors)
    }
}

fn form_value<'a>(
    fields: &'a HashMap<String, String>,
    field: &'static str,
) -> Result<&'a str, InvalidField> {
    fields
        .get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or(InvalidField::Missing { field })
}

fn option_field<T: FromStr>(
    fields: &HashMap<String, String>,
    field: &'static str,
) -> Result<T, InvalidField> {
    let value = form_value(fields, field)?;
    value.parse().map_err(|_| InvalidField::UnknownOption {
        field,
        value: value.to_string(),
    })
}

fn number_field<T: FromStr>(
    fields: &HashMap<String, String>,
    field: &'static str,
) -> Result<T, InvalidField> {
    let value = form_value(fields, field)?;
    value.parse().map_err(|_| InvalidField::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn keep<T>(parsed: Result<T, InvalidField>, slot: &mut T, errors: &mut Vec<InvalidField>) {
    match parsed {
        Ok(value) => *slot = value,
        Err(e) => errors.push(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for option in YesNo::OPTIONS {
            assert_eq!(option.label().parse::<YesNo>().unwrap(), option);
        }
        for option in ContractType::OPTIONS {
            assert_eq!(option.label().parse::<ContractType>().unwrap(), option);
        }
        assert!("yes".parse::<YesNo>().is_err());
        assert!("Three year".parse::<ContractType>().is_err());
    }

    #[test]
    fn test_record_json_uses_training_column_names() {
        let json = r#"{
            "SeniorCitizen": "Yes",
            "Partner": "No",
            "Dependents": "No",
            "tenure": 12,
            "OnlineSecurity": "No",
            "TechSupport": "No",
            "Contract": "Month-to-month",
            "PaperlessBilling": "Yes",
            "MonthlyCharges": 70.5,
            "TotalCharges": 846.0
        }"#;

        let record: CustomerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.senior_citizen, YesNo::Yes);
        assert_eq!(record.tenure_months, 12);
        assert_eq!(record.contract, ContractType::MonthToMonth);
        assert_eq!(record.paperless_billing, YesNo::Yes);
        assert_eq!(record.total_charges, 846.0);
    }

    #[test]
    fn test_unknown_contract_is_rejected() {
        let json = r#"{
            "SeniorCitizen": "No", "Partner": "No", "Dependents": "No",
            "tenure": 1, "OnlineSecurity": "No", "TechSupport": "No",
            "Contract": "Three year", "PaperlessBilling": "No",
            "MonthlyCharges": 1.0, "TotalCharges": 1.0
        }"#;

        assert!(serde_json::from_str::<CustomerRecord>(json).is_err());
    }

    #[test]
    fn test_default_matches_initial_form_state() {
        let record = CustomerRecord::default();
        assert_eq!(record.senior_citizen, YesNo::No);
        assert_eq!(record.contract, ContractType::MonthToMonth);
        assert_eq!(record.tenure_months, 0);
        assert_eq!(record.monthly_charges, 0.0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_and_nan_charges() {
        let record = CustomerRecord {
            monthly_charges: -1.0,
            ..Default::default()
        };
        assert_eq!(
            record.validate(),
            Err(InvalidField::OutOfRange {
                field: "MonthlyCharges",
                value: -1.0
            })
        );

        let record = CustomerRecord {
            total_charges: f64::NAN,
            ..Default::default()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_charges_beyond_f32() {
        let record = CustomerRecord {
            total_charges: 1e39,
            ..Default::default()
        };
        assert_eq!(
            record.validate(),
            Err(InvalidField::OutOfRange {
                field: "TotalCharges",
                value: 1e39
            })
        );

        let record = CustomerRecord {
            monthly_charges: f64::from(f32::MAX),
            ..Default::default()
        };
        assert!(record.validate().is_ok());
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const EXAMPLE_FIELDS: [(&str, &str); 10] = [
        ("SeniorCitizen", "Yes"),
        ("Partner", "No"),
        ("Dependents", "No"),
        ("tenure", "12"),
        ("OnlineSecurity", "No"),
        ("TechSupport", "No"),
        ("Contract", "Month-to-month"),
        ("PaperlessBilling", "Yes"),
        ("MonthlyCharges", "70.5"),
        ("TotalCharges", "846.0"),
    ];

    #[test]
    fn test_from_form_fields() {
        let (record, errors) = CustomerRecord::from_form_fields(&form(&EXAMPLE_FIELDS));

        assert!(errors.is_empty());
        assert_eq!(record.senior_citizen, YesNo::Yes);
        assert_eq!(record.tenure_months, 12);
        assert_eq!(record.paperless_billing, YesNo::Yes);
        assert_eq!(record.monthly_charges, 70.5);
    }

    #[test]
    fn test_from_form_fields_names_bad_fields_and_keeps_the_rest() {
        let mut fields = form(&EXAMPLE_FIELDS);
        fields.insert("Contract".to_string(), "Weekly".to_string());
        fields.insert("tenure".to_string(), "-1".to_string());
        fields.remove("TechSupport");

        let (record, errors) = CustomerRecord::from_form_fields(&fields);

        assert_eq!(
            errors,
            vec![
                InvalidField::InvalidNumber {
                    field: "tenure",
                    value: "-1".to_string()
                },
                InvalidField::Missing {
                    field: "TechSupport"
                },
                InvalidField::UnknownOption {
                    field: "Contract",
                    value: "Weekly".to_string()
                },
            ]
        );
        assert_eq!(errors[0].to_string(), "tenure: \"-1\" is not a valid number");
        // Answers that parsed survive
        assert_eq!(record.senior_citizen, YesNo::Yes);
        assert_eq!(record.total_charges, 846.0);
        assert_eq!(record.contract, ContractType::MonthToMonth);
    }
}
