//! Reference records resolved from the Webin service.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub name: String,
    pub tax_id: Option<i32>,
    pub organism: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Sample {
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}

/// Free-form `TAG`/`VALUE`/`UNITS` triple attached to a sample.
///
/// `value_uri` and `units_uri` hold ontology term references. Sample XML never
/// carries them, so records built from it leave both unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    tag: String,
    value: Option<String>,
    value_uri: Option<String>,
    units: Option<String>,
    units_uri: Option<String>,
}

impl Attribute {
    pub fn new(
        tag: impl Into<String>,
        value: Option<String>,
        value_uri: Option<String>,
        units: Option<String>,
        units_uri: Option<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            value,
            value_uri,
            units,
            units_uri,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn value_uri(&self) -> Option<&str> {
        self.value_uri.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn units_uri(&self) -> Option<&str> {
        self.units_uri.as_deref()
    }
}
