//! Record types for the chat log and the property catalogue.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The role of a message in a conversation.
///
/// Persisted with the Spanish identifiers the wire format uses
/// (`usuario`, `asistente`, `sistema`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "usuario")]
    User,
    #[serde(rename = "asistente")]
    Assistant,
    #[serde(rename = "sistema")]
    System,
}

impl Role {
    /// The identifier stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "usuario",
            Role::Assistant => "asistente",
            Role::System => "sistema",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "usuario" => Ok(Role::User),
            "asistente" => Ok(Role::Assistant),
            "sistema" => Ok(Role::System),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub fecha_creacion: NaiveDateTime,
}

/// A conversation owned by a user.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: i64,
    pub usuario_id: i64,
    pub titulo: Option<String>,
    pub fecha_creacion: NaiveDateTime,
    pub fecha_actualizacion: NaiveDateTime,
}

/// A message persisted in a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMessage {
    pub id: i64,
    pub conversacion_id: i64,
    pub rol: Role,
    pub contenido: String,
    pub fecha_creacion: NaiveDateTime,
}

/// A property listing from the catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub id: i64,
    pub tipo: String,
    pub ciudad: String,
    pub zona: Option<String>,
    pub precio: f64,
    pub dormitorios: Option<i64>,
    pub descripcion: Option<String>,
}

/// Search criteria for the property catalogue.
///
/// `tipo` and `ciudad` match anywhere in the column (LIKE-contains);
/// `precio_max` is an inclusive upper bound. Only available listings are
/// ever returned.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub tipo: Option<String>,
    pub ciudad: Option<String>,
    pub precio_max: Option<f64>,
}

/// Availability counts, total and broken down by property type.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCount {
    pub total: i64,
    pub por_tipo: std::collections::BTreeMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciudad: Option<String>,
}
