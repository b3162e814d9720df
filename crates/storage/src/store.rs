//! SQLite store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::types::{
    Conversation, Property, PropertyCount, PropertyFilter, Role, StoredMessage, User,
};
use crate::Result;

/// Default identity used when a chat request carries no user id.
pub const DEMO_USER_NAME: &str = "Usuario Demo";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";

const DEFAULT_CONVERSATION_TITLE: &str = "Nueva conversación";

/// SQLite-backed store for users, conversations, messages, and properties.
pub struct ChatStore {
    conn: Mutex<Connection>,
}

impl ChatStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS propiedades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tipo TEXT NOT NULL,
                ciudad TEXT NOT NULL,
                zona TEXT,
                precio REAL NOT NULL,
                dormitorios INTEGER,
                banos INTEGER,
                area_m2 REAL,
                descripcion TEXT,
                disponible INTEGER DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS usuarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT,
                email TEXT UNIQUE,
                fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS conversaciones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                usuario_id INTEGER NOT NULL,
                titulo TEXT,
                fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                fecha_actualizacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (usuario_id) REFERENCES usuarios(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS mensajes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversacion_id INTEGER NOT NULL,
                rol TEXT NOT NULL CHECK(rol IN ('usuario', 'asistente', 'sistema')),
                contenido TEXT NOT NULL,
                fecha_creacion TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (conversacion_id) REFERENCES conversaciones(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_conversaciones_usuario
                ON conversaciones(usuario_id);
            CREATE INDEX IF NOT EXISTS idx_mensajes_conversacion
                ON mensajes(conversacion_id);
            "#,
        )?;
        Ok(())
    }

    /// Insert the sample property catalogue and the demo user if the
    /// database is empty. Idempotent; returns how many properties were
    /// inserted.
    pub fn seed_demo_data(&self) -> Result<usize> {
        let conn = self.conn();

        let existing: i64 =
            conn.query_row("SELECT COUNT(*) FROM propiedades", [], |row| row.get(0))?;

        let mut inserted = 0;
        if existing == 0 {
            let sample: &[(&str, &str, &str, f64, i64, i64, f64, &str)] = &[
                ("Casa", "La Paz", "Calacoto", 250000.0, 4, 3, 180.0, "Casa moderna con jardín"),
                ("Departamento", "La Paz", "Sopocachi", 120000.0, 2, 2, 85.0, "Departamento céntrico"),
                ("Casa", "La Paz", "Achumani", 350000.0, 5, 4, 250.0, "Casa con vista panorámica"),
                ("Departamento", "Santa Cruz", "Equipetrol", 180000.0, 3, 2, 110.0, "Depa amoblado"),
                ("Casa", "Cochabamba", "Cala Cala", 200000.0, 3, 2, 150.0, "Casa con piscina"),
                ("Terreno", "La Paz", "Mallasa", 80000.0, 0, 0, 500.0, "Terreno para construir"),
            ];

            let mut stmt = conn.prepare(
                "INSERT INTO propiedades
                 (tipo, ciudad, zona, precio, dormitorios, banos, area_m2, descripcion, disponible)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
            )?;
            for &(tipo, ciudad, zona, precio, dormitorios, banos, area, descripcion) in sample {
                stmt.execute(params![
                    tipo,
                    ciudad,
                    zona,
                    precio,
                    dormitorios,
                    banos,
                    area,
                    descripcion
                ])?;
                inserted += 1;
            }
        }

        conn.execute(
            "INSERT OR IGNORE INTO usuarios (nombre, email) VALUES (?1, ?2)",
            params![DEMO_USER_NAME, DEMO_USER_EMAIL],
        )?;

        Ok(inserted)
    }

    // ----- Users -----

    /// Return the id of the user with the given email, creating the user
    /// first if needed.
    pub fn get_or_create_user(&self, nombre: &str, email: &str) -> Result<i64> {
        let conn = self.conn();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM usuarios WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO usuarios (nombre, email) VALUES (?1, ?2)",
            params![nombre, email],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, nombre, email, fecha_creacion FROM usuarios WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        nombre: row.get(1)?,
                        email: row.get(2)?,
                        fecha_creacion: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    // ----- Conversations -----

    /// Create a conversation for a user, optionally titled.
    pub fn create_conversation(&self, usuario_id: i64, titulo: Option<&str>) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO conversaciones (usuario_id, titulo) VALUES (?1, ?2)",
            params![usuario_id, titulo.unwrap_or(DEFAULT_CONVERSATION_TITLE)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        let conversation = self
            .conn()
            .query_row(
                "SELECT id, usuario_id, titulo, fecha_creacion, fecha_actualizacion
                 FROM conversaciones WHERE id = ?1",
                params![id],
                map_conversation,
            )
            .optional()?;
        Ok(conversation)
    }

    /// List a user's conversations, most recently active first.
    pub fn list_conversations(&self, usuario_id: i64, limit: usize) -> Result<Vec<Conversation>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, usuario_id, titulo, fecha_creacion, fecha_actualizacion
             FROM conversaciones
             WHERE usuario_id = ?1
             ORDER BY fecha_actualizacion DESC, id DESC
             LIMIT ?2",
        )?;
        let conversations = stmt
            .query_map(params![usuario_id, limit as i64], map_conversation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(conversations)
    }

    /// Delete a conversation and all its messages (cascade).
    pub fn delete_conversation(&self, id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM conversaciones WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ----- Messages -----

    /// Append a message and bump the conversation's last-activity stamp.
    pub fn append_message(&self, conversacion_id: i64, rol: Role, contenido: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO mensajes (conversacion_id, rol, contenido) VALUES (?1, ?2, ?3)",
            params![conversacion_id, rol.as_str(), contenido],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE conversaciones SET fecha_actualizacion = CURRENT_TIMESTAMP WHERE id = ?1",
            params![conversacion_id],
        )?;
        Ok(id)
    }

    /// List a conversation's messages in chronological order. With a
    /// limit, the most recent N messages are returned, still oldest
    /// first.
    pub fn list_messages(
        &self,
        conversacion_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>> {
        let conn = self.conn();

        let raw: Vec<(i64, i64, String, String, chrono::NaiveDateTime)> = match limit {
            Some(n) => {
                let mut stmt = conn.prepare(
                    "SELECT id, conversacion_id, rol, contenido, fecha_creacion
                     FROM mensajes
                     WHERE conversacion_id = ?1
                     ORDER BY fecha_creacion DESC, id DESC
                     LIMIT ?2",
                )?;
                let mut rows = stmt
                    .query_map(params![conversacion_id, n as i64], map_message_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows.reverse();
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, conversacion_id, rol, contenido, fecha_creacion
                     FROM mensajes
                     WHERE conversacion_id = ?1
                     ORDER BY fecha_creacion ASC, id ASC",
                )?;
                stmt.query_map(params![conversacion_id], map_message_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        raw.into_iter()
            .map(|(id, conversacion_id, rol, contenido, fecha_creacion)| {
                Ok(StoredMessage {
                    id,
                    conversacion_id,
                    rol: Role::parse(&rol)?,
                    contenido,
                    fecha_creacion,
                })
            })
            .collect()
    }

    pub fn count_messages(&self, conversacion_id: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM mensajes WHERE conversacion_id = ?1",
            params![conversacion_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ----- Properties -----

    /// Search available properties matching the filter.
    pub fn search_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let conn = self.conn();

        let mut sql = String::from(
            "SELECT id, tipo, ciudad, zona, precio, dormitorios, descripcion
             FROM propiedades WHERE disponible = 1",
        );
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(tipo) = &filter.tipo {
            sql.push_str(" AND tipo LIKE ?");
            values.push(SqlValue::Text(format!("%{tipo}%")));
        }
        if let Some(ciudad) = &filter.ciudad {
            sql.push_str(" AND ciudad LIKE ?");
            values.push(SqlValue::Text(format!("%{ciudad}%")));
        }
        if let Some(precio_max) = filter.precio_max {
            sql.push_str(" AND precio <= ?");
            values.push(SqlValue::Real(precio_max));
        }

        let mut stmt = conn.prepare(&sql)?;
        let properties = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(Property {
                    id: row.get(0)?,
                    tipo: row.get(1)?,
                    ciudad: row.get(2)?,
                    zona: row.get(3)?,
                    precio: row.get(4)?,
                    dormitorios: row.get(5)?,
                    descripcion: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(properties)
    }

    /// Count available properties, total and per type, optionally
    /// restricted to a city.
    pub fn count_properties(&self, ciudad: Option<&str>) -> Result<PropertyCount> {
        let conn = self.conn();

        let mut sql = String::from(
            "SELECT tipo, COUNT(*) FROM propiedades WHERE disponible = 1",
        );
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(ciudad) = ciudad {
            sql.push_str(" AND ciudad LIKE ?");
            values.push(SqlValue::Text(format!("%{ciudad}%")));
        }
        sql.push_str(" GROUP BY tipo");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut count = PropertyCount {
            total: 0,
            por_tipo: std::collections::BTreeMap::new(),
            ciudad: ciudad.map(str::to_string),
        };
        for (tipo, cantidad) in rows {
            count.total += cantidad;
            count.por_tipo.insert(tipo, cantidad);
        }
        Ok(count)
    }
}

fn map_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        usuario_id: row.get(1)?,
        titulo: row.get(2)?,
        fecha_creacion: row.get(3)?,
        fecha_actualizacion: row.get(4)?,
    })
}

#[allow(clippy::type_complexity)]
fn map_message_row(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(i64, i64, String, String, chrono::NaiveDateTime)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ChatStore {
        let store = ChatStore::in_memory().unwrap();
        store.seed_demo_data().unwrap();
        store
    }

    #[test]
    fn get_or_create_user_is_idempotent() {
        let store = store();
        let first = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        let second = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        assert_eq!(first, second);

        let user = store.get_user(first).unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn seed_runs_once() {
        let store = ChatStore::in_memory().unwrap();
        assert_eq!(store.seed_demo_data().unwrap(), 6);
        assert_eq!(store.seed_demo_data().unwrap(), 0);
    }

    #[test]
    fn conversation_round_trip() {
        let store = store();
        let user = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        let id = store.create_conversation(user, Some("Propiedades")).unwrap();

        let conversation = store.get_conversation(id).unwrap().unwrap();
        assert_eq!(conversation.usuario_id, user);
        assert_eq!(conversation.titulo.as_deref(), Some("Propiedades"));

        let untitled = store.create_conversation(user, None).unwrap();
        let conversation = store.get_conversation(untitled).unwrap().unwrap();
        assert_eq!(conversation.titulo.as_deref(), Some("Nueva conversación"));
    }

    #[test]
    fn messages_append_and_list_in_order() {
        let store = store();
        let user = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        let conversation = store.create_conversation(user, None).unwrap();

        store.append_message(conversation, Role::User, "Hola").unwrap();
        store
            .append_message(conversation, Role::Assistant, "¡Hola! ¿En qué puedo ayudarte?")
            .unwrap();
        store.append_message(conversation, Role::User, "¿Qué es Rekaliber?").unwrap();

        let all = store.list_messages(conversation, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].rol, Role::User);
        assert_eq!(all[0].contenido, "Hola");
        assert_eq!(all[2].contenido, "¿Qué es Rekaliber?");

        // A limit keeps the most recent messages, still oldest first.
        let recent = store.list_messages(conversation, Some(2)).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].contenido, "¡Hola! ¿En qué puedo ayudarte?");
        assert_eq!(recent[1].contenido, "¿Qué es Rekaliber?");

        assert_eq!(store.count_messages(conversation).unwrap(), 3);
    }

    #[test]
    fn deleting_a_conversation_cascades_to_messages() {
        let store = store();
        let user = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        let conversation = store.create_conversation(user, None).unwrap();
        store.append_message(conversation, Role::User, "Hola").unwrap();

        store.delete_conversation(conversation).unwrap();

        assert!(store.get_conversation(conversation).unwrap().is_none());
        assert_eq!(store.count_messages(conversation).unwrap(), 0);
    }

    #[test]
    fn list_conversations_orders_by_activity() {
        let store = store();
        let user = store.get_or_create_user("Ana", "ana@example.com").unwrap();
        let first = store.create_conversation(user, Some("primera")).unwrap();
        let second = store.create_conversation(user, Some("segunda")).unwrap();

        let listed = store.list_conversations(user, 10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);
    }

    #[test]
    fn property_search_applies_all_filters() {
        let store = store();

        let casas = store
            .search_properties(&PropertyFilter {
                tipo: Some("Casa".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(casas.len(), 3);
        assert!(casas.iter().all(|p| p.tipo == "Casa"));

        let cochabamba = store
            .search_properties(&PropertyFilter {
                tipo: Some("Casa".into()),
                ciudad: Some("Cochabamba".into()),
                precio_max: Some(200000.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(cochabamba.len(), 1);
        assert_eq!(cochabamba[0].zona.as_deref(), Some("Cala Cala"));

        let nothing = store
            .search_properties(&PropertyFilter {
                ciudad: Some("Tarija".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn property_count_groups_by_type() {
        let store = store();

        let all = store.count_properties(None).unwrap();
        assert_eq!(all.total, 6);
        assert_eq!(all.por_tipo.get("Casa"), Some(&3));
        assert_eq!(all.por_tipo.get("Departamento"), Some(&2));
        assert_eq!(all.por_tipo.get("Terreno"), Some(&1));
        assert!(all.ciudad.is_none());

        let la_paz = store.count_properties(Some("La Paz")).unwrap();
        assert_eq!(la_paz.total, 4);
        assert_eq!(la_paz.ciudad.as_deref(), Some("La Paz"));
    }
}
