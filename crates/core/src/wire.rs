//! Serde helpers for loosely typed backend fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::RecordId;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Decimal columns arrive either as JSON numbers or as strings such as
/// `"1500.00"`. Blank strings and `null` decode as `None`.
pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not a decimal: {s:?}"))),
    }
}

/// A reference field the backend sends either as a bare id or, when the
/// query populated it, as the referenced document. Only the id and a
/// human-readable name are kept. Serializes back as the bare id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub id: RecordId,
    pub name: Option<String>,
}

impl RecordRef {
    pub fn new(id: RecordId) -> Self {
        Self { id, name: None }
    }

    /// The populated name, falling back to the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

impl From<RecordId> for RecordRef {
    fn from(id: RecordId) -> Self {
        Self::new(id)
    }
}

impl Serialize for RecordRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

#[derive(Deserialize)]
struct Populated {
    #[serde(alias = "_id")]
    id: RecordId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "firstName")]
    first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    last_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RefShape {
    Id(RecordId),
    Document(Populated),
}

impl<'de> Deserialize<'de> for RecordRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RefShape::deserialize(deserializer)? {
            RefShape::Id(id) => RecordRef::new(id),
            RefShape::Document(doc) => {
                let person = [doc.first_name, doc.last_name]
                    .into_iter()
                    .flatten()
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                let name = doc
                    .name
                    .or(doc.title)
                    .or_else(|| (!person.is_empty()).then_some(person));
                RecordRef { id: doc.id, name }
            }
        })
    }
}
