use serde::{Deserialize, Serialize};

const COVERAGE_TYPE: &str = "coverage_type";
const COVERAGE_AMOUNT: &str = "coverage_amount";

/// Attributes of an application that drive the context search.
///
/// `attributes` keeps insertion order so the generated query is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProfile {
    pub coverage_type: String,
    pub coverage_amount: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
}

impl ApplicationProfile {
    pub fn new(coverage_type: impl Into<String>, coverage_amount: impl Into<String>) -> Self {
        Self {
            coverage_type: coverage_type.into(),
            coverage_amount: coverage_amount.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Build a profile from flat `key = value` pairs.
    ///
    /// `coverage_type` and `coverage_amount` fill the dedicated fields; every
    /// other pair becomes an attribute in the order given.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut profile = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            match key.as_str() {
                COVERAGE_TYPE => profile.coverage_type = value,
                COVERAGE_AMOUNT => profile.coverage_amount = value,
                _ => profile.attributes.push((key, value)),
            }
        }
        profile
    }

    pub fn query(&self) -> String {
        build_query(self)
    }
}

/// `"Application for {type} coverage amount {amount}. k1: v1, k2: v2"`.
pub fn build_query(profile: &ApplicationProfile) -> String {
    let mut query = format!(
        "Application for {} coverage amount {}.",
        profile.coverage_type, profile.coverage_amount
    );
    if !profile.attributes.is_empty() {
        let others: Vec<String> = profile.attributes.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        query.push(' ');
        query.push_str(&others.join(", "));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_application_query() {
        let profile = ApplicationProfile::new("Home", "750000").with_attribute("year_built", "1990");
        assert_eq!(build_query(&profile), "Application for Home coverage amount 750000. year_built: 1990");
    }

    #[test]
    fn attributes_keep_order() {
        let profile = ApplicationProfile::new("Auto", "25000")
            .with_attribute("vehicle", "sedan")
            .with_attribute("driver_age", "42");
        assert_eq!(profile.query(), "Application for Auto coverage amount 25000. vehicle: sedan, driver_age: 42");
    }

    #[test]
    fn no_attributes_has_no_trailing_space() {
        assert_eq!(ApplicationProfile::new("Home", "1").query(), "Application for Home coverage amount 1.");
    }

    #[test]
    fn pairs_split_coverage_from_attributes() {
        let profile = ApplicationProfile::from_pairs([
            ("roof_age", "12"),
            ("coverage_type", "Home"),
            ("coverage_amount", "500000"),
            ("pool", "yes"),
        ]);
        assert_eq!(profile.coverage_type, "Home");
        assert_eq!(profile.coverage_amount, "500000");
        assert_eq!(
            profile.attributes,
            vec![("roof_age".to_string(), "12".to_string()), ("pool".to_string(), "yes".to_string())]
        );
    }
}
