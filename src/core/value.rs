use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    Map(IndexMap<String, String>),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Map(v) => v.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, String>> for Value {
    fn from(value: IndexMap<String, String>) -> Self {
        Self::Map(value)
    }
}

/// Accumulated form state a wizard carries across its steps.
///
/// `merge` must be a shallow per-field overwrite: fields present in `patch`
/// replace the stored ones, everything else is retained.
pub trait FormRecord: Clone + Default + Serialize + DeserializeOwned {
    fn merge(&mut self, patch: Self);
}

/// Field-name keyed form record. Insertion order is kept so persisted
/// snapshots read in the order fields were first entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: IndexMap<String, Value>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Text value of `key`, empty when missing or not text.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_text).unwrap_or("")
    }

    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(Value::as_list).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Decodes the record into a typed form. Missing fields fall back to the
    /// form's serde defaults.
    pub fn to_form<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

impl FormRecord for FormData {
    fn merge(&mut self, patch: Self) {
        for (key, value) in patch.fields {
            self.fields.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.set(key, value);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::{FormData, FormRecord, Value};

    #[test]
    fn merge_keeps_fields_not_in_patch() {
        let mut data = FormData::new().with("amount", "10").with("description", "Tuinwerk");
        data.merge(FormData::new().with("amount", "12.50"));

        assert_eq!(data.text("amount"), "12.50");
        assert_eq!(data.text("description"), "Tuinwerk");
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn serializes_as_plain_json_object() {
        let data = FormData::new()
            .with("amount", "22.50")
            .with("payment_methods", vec!["tikkie".to_string()])
            .with("terms", true);

        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "amount": "22.50",
                "payment_methods": ["tikkie"],
                "terms": true,
            })
        );

        let back: FormData = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, data);
        assert_eq!(back.get("terms").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn null_fields_decode_to_none() {
        let data: FormData =
            serde_json::from_value(serde_json::json!({ "phone": null })).expect("deserialize");
        assert_eq!(data.get("phone"), Some(&Value::None));
        assert!(data.get("phone").is_some_and(Value::is_empty));
    }

    #[test]
    fn integers_and_floats_decode_separately() {
        let data: FormData =
            serde_json::from_value(serde_json::json!({ "count": 3, "rate": 2.5 })).expect("deserialize");
        assert_eq!(data.get("count"), Some(&Value::Number(3)));
        assert_eq!(data.get("rate"), Some(&Value::Float(2.5)));
        assert_eq!(serde_json::to_value(&data).expect("serialize")["rate"], 2.5);
    }

    #[test]
    fn typed_accessors_fall_back_to_empty() {
        let data = FormData::new().with("count", 3_i64);
        assert_eq!(data.text("count"), "");
        assert_eq!(data.text("missing"), "");
        assert!(data.list("missing").is_empty());
    }
}
