//! Справочные данные для выпадающих списков (`GET /api/v1/user`, `/api/v1/product`, ...)

use serde::{Deserialize, Deserializer, Serialize};

/// Один элемент справочника `{id, name}`.
///
/// Сервер отдаёт `id` то числом, то строкой, поэтому при чтении он
/// всегда приводится к строке.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
}

impl ReferenceItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(v) => v.to_string(),
        RawId::Uint(v) => v.to_string(),
        RawId::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        RawId::Float(v) => v.to_string(),
        RawId::Text(v) => v,
    })
}
