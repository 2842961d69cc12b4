use anyhow::Result;
use rusqlite::OptionalExtension;

use ladle_types::api::RecipeId;

use crate::Database;

/// Outcome of adding a recipe to a user's favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteInsert {
    /// The user had no list yet; it was created holding this recipe.
    ListCreated,
    /// The recipe was appended to the end of an existing list.
    Appended,
    /// The recipe was already in the list. Nothing was written.
    AlreadyPresent,
}

impl Database {
    /// Add `recipe_id` to the end of the user's list, creating the list on
    /// first use. Runs as one transaction.
    pub fn add_favorite(&self, user_id: &str, recipe_id: RecipeId) -> Result<FavoriteInsert> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let list_created = tx.execute(
                "INSERT INTO favorite_lists (user_id) VALUES (?1)
                 ON CONFLICT(user_id) DO NOTHING",
                [user_id],
            )? == 1;

            // Position is one past the current tail. The aggregate always
            // yields a row, and the WHERE keeps the upsert parse unambiguous.
            let inserted = tx.execute(
                "INSERT INTO favorite_recipes (user_id, recipe_id, position)
                 SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
                 FROM favorite_recipes WHERE user_id = ?1
                 ON CONFLICT(user_id, recipe_id) DO NOTHING",
                rusqlite::params![user_id, recipe_id],
            )?;

            tx.commit()?;

            Ok(match (inserted, list_created) {
                (0, _) => FavoriteInsert::AlreadyPresent,
                (_, true) => FavoriteInsert::ListCreated,
                (_, false) => FavoriteInsert::Appended,
            })
        })
    }

    /// Recipe ids in insertion order, or `None` when the user never added a
    /// favorite.
    pub fn get_favorites(&self, user_id: &str) -> Result<Option<Vec<RecipeId>>> {
        self.with_conn(|conn| {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM favorite_lists WHERE user_id = ?1",
                    [user_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();

            if !exists {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                "SELECT recipe_id FROM favorite_recipes
                 WHERE user_id = ?1
                 ORDER BY position",
            )?;

            let ids = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<RecipeId>, _>>()?;

            Ok(Some(ids))
        })
    }
}
