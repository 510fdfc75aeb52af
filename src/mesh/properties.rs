//! Shared property records referenced by mesh entities.

use std::collections::BTreeMap;

/// Material/integration record shared by many entities.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Properties {
    id: usize,
    integration_method: Option<i32>,
    values: BTreeMap<String, f64>,
}

impl Properties {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum integration method requested by this record, if any.
    #[inline]
    pub fn integration_method(&self) -> Option<i32> {
        self.integration_method
    }

    pub fn with_integration_method(mut self, method: i32) -> Self {
        self.integration_method = Some(method);
        self
    }

    pub fn set_integration_method(&mut self, method: Option<i32>) {
        self.integration_method = method;
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_values() {
        let mut p = Properties::new(2).with_integration_method(3);
        p.set_value("YOUNG_MODULUS", 2.1e11);
        assert_eq!(p.id(), 2);
        assert_eq!(p.integration_method(), Some(3));
        assert_eq!(p.value("YOUNG_MODULUS"), Some(2.1e11));
        assert_eq!(p.value("DENSITY"), None);

        let json = serde_json::to_string(&p).unwrap();
        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
