//! Raw input collection and typed usage records
//!
//! `RawInput` carries the ten form fields exactly as the user typed them.
//! `UsageRecord` is the parsed observation shared by the training and
//! prediction paths. Parsing failures name the offending field so the
//! hosting UI can show a precise message.

use crate::error::PredictError;

/// Column names of the source dataset.
///
/// The identifier column is dropped before any processing; the remaining
/// ten columns are the record schema.
pub mod columns {
    pub const USER_ID: &str = "User ID";
    pub const DEVICE_MODEL: &str = "Device Model";
    pub const OPERATING_SYSTEM: &str = "Operating System";
    pub const APP_USAGE: &str = "App Usage Time (min/day)";
    pub const SCREEN_ON: &str = "Screen On Time (hours/day)";
    pub const BATTERY_DRAIN: &str = "Battery Drain (mAh/day)";
    pub const APPS_INSTALLED: &str = "Number of Apps Installed";
    pub const DATA_USAGE: &str = "Data Usage (MB/day)";
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const BEHAVIOR_CLASS: &str = "User Behavior Class";

    /// Numeric feature columns, in scaler order.
    pub const NUMERIC: [&str; 7] = [
        APP_USAGE,
        SCREEN_ON,
        BATTERY_DRAIN,
        APPS_INSTALLED,
        DATA_USAGE,
        AGE,
        BEHAVIOR_CLASS,
    ];

    /// Categorical columns with a fitted encoder each.
    pub const CATEGORICAL: [&str; 3] = [DEVICE_MODEL, OPERATING_SYSTEM, GENDER];

    /// Model feature columns, in the fixed order the model was fit with.
    pub const FEATURES: [&str; 8] = [
        APP_USAGE,
        SCREEN_ON,
        BATTERY_DRAIN,
        APPS_INSTALLED,
        DATA_USAGE,
        AGE,
        GENDER,
        BEHAVIOR_CLASS,
    ];
}

/// Width of the model feature vector.
pub const FEATURE_COUNT: usize = columns::FEATURES.len();

/// Raw form fields as entered by the user, prior to any validation.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub app_usage_min_per_day: String,
    pub screen_on_hours_per_day: String,
    pub battery_drain_mah_per_day: String,
    pub apps_installed: String,
    pub data_usage_mb_per_day: String,
    pub age: String,
    pub gender: String,
    pub user_behavior_class: String,
    pub device_model: String,
    pub operating_system: String,
}

/// One fully parsed phone-user observation.
///
/// Numeric fields are `f64` because training-time mean imputation can leave
/// fractional values in otherwise integer columns. Form input for the
/// integer-only fields is still required to parse as an integer.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub app_usage_min_per_day: f64,
    pub screen_on_hours_per_day: f64,
    pub battery_drain_mah_per_day: f64,
    pub apps_installed: f64,
    pub data_usage_mb_per_day: f64,
    pub age: f64,
    pub gender: String,
    pub user_behavior_class: f64,
    pub device_model: String,
    pub operating_system: String,
}

impl UsageRecord {
    /// Parse raw form fields into a typed record.
    ///
    /// The first unparsable field aborts with an error naming it.
    pub fn from_raw(raw: &RawInput) -> Result<Self, PredictError> {
        Ok(Self {
            app_usage_min_per_day: parse_int(columns::APP_USAGE, &raw.app_usage_min_per_day)?
                as f64,
            screen_on_hours_per_day: parse_float(
                columns::SCREEN_ON,
                &raw.screen_on_hours_per_day,
            )?,
            battery_drain_mah_per_day: parse_int(
                columns::BATTERY_DRAIN,
                &raw.battery_drain_mah_per_day,
            )? as f64,
            apps_installed: parse_int(columns::APPS_INSTALLED, &raw.apps_installed)? as f64,
            data_usage_mb_per_day: parse_int(columns::DATA_USAGE, &raw.data_usage_mb_per_day)?
                as f64,
            age: parse_int(columns::AGE, &raw.age)? as f64,
            gender: raw.gender.trim().to_string(),
            user_behavior_class: parse_int(columns::BEHAVIOR_CLASS, &raw.user_behavior_class)?
                as f64,
            device_model: raw.device_model.trim().to_string(),
            operating_system: raw.operating_system.trim().to_string(),
        })
    }

    /// Numeric feature values in scaler order (`columns::NUMERIC`).
    pub fn numeric_values(&self) -> [f64; columns::NUMERIC.len()] {
        [
            self.app_usage_min_per_day,
            self.screen_on_hours_per_day,
            self.battery_drain_mah_per_day,
            self.apps_installed,
            self.data_usage_mb_per_day,
            self.age,
            self.user_behavior_class,
        ]
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, PredictError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PredictError::invalid_input(field, "value is empty"));
    }
    trimmed.parse::<i64>().map_err(|_| {
        PredictError::invalid_input(field, format!("`{trimmed}` is not a whole number"))
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, PredictError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PredictError::invalid_input(field, "value is empty"));
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(PredictError::invalid_input(
            field,
            format!("`{trimmed}` is not a number"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw_input() -> RawInput {
        RawInput {
            app_usage_min_per_day: "220".into(),
            screen_on_hours_per_day: "4.5".into(),
            battery_drain_mah_per_day: "1200".into(),
            apps_installed: "58".into(),
            data_usage_mb_per_day: "900".into(),
            age: "31".into(),
            gender: "Female".into(),
            user_behavior_class: "3".into(),
            device_model: "Google Pixel 5".into(),
            operating_system: "Android".into(),
        }
    }

    #[test]
    fn test_parse_valid_input() {
        let record = UsageRecord::from_raw(&valid_raw_input()).unwrap();
        assert_eq!(record.app_usage_min_per_day, 220.0);
        assert_eq!(record.screen_on_hours_per_day, 4.5);
        assert_eq!(record.gender, "Female");
        assert_eq!(record.device_model, "Google Pixel 5");
    }

    #[test]
    fn test_non_numeric_integer_field_names_the_field() {
        let mut raw = valid_raw_input();
        raw.age = "abc".into();

        let err = UsageRecord::from_raw(&raw).unwrap_err();
        match err {
            PredictError::InvalidInput { field, .. } => assert_eq!(field, columns::AGE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_value_in_integer_field_is_rejected() {
        let mut raw = valid_raw_input();
        raw.battery_drain_mah_per_day = "1200.5".into();

        let err = UsageRecord::from_raw(&raw).unwrap_err();
        match err {
            PredictError::InvalidInput { field, .. } => {
                assert_eq!(field, columns::BATTERY_DRAIN)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let mut raw = valid_raw_input();
        raw.data_usage_mb_per_day = "  ".into();

        let err = UsageRecord::from_raw(&raw).unwrap_err();
        match err {
            PredictError::InvalidInput { field, .. } => assert_eq!(field, columns::DATA_USAGE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_float_field_accepts_integers() {
        let mut raw = valid_raw_input();
        raw.screen_on_hours_per_day = "6".into();

        let record = UsageRecord::from_raw(&raw).unwrap();
        assert_eq!(record.screen_on_hours_per_day, 6.0);
    }

    #[test]
    fn test_numeric_values_order_matches_numeric_columns() {
        let record = UsageRecord::from_raw(&valid_raw_input()).unwrap();
        let values = record.numeric_values();
        assert_eq!(values.len(), columns::NUMERIC.len());
        assert_eq!(values[0], 220.0); // App Usage Time (min/day)
        assert_eq!(values[2], 1200.0); // Battery Drain (mAh/day)
        assert_eq!(values[6], 3.0); // User Behavior Class
    }
}
