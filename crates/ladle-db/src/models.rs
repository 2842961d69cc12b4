//! Row types read back from SQLite. The API layer converts these into its
//! own types; nothing here is serialized.

/// The columns login needs. `password` holds the PHC-format Argon2 hash.
pub struct UserRow {
    pub id: String,
    pub password: String,
}
