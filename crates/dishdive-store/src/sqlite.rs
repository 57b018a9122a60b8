//! SQLite store for the catalogue, keyword vocabulary, review links and
//! per-user settings.
//!
//! One connection behind a mutex. Callers on async runtimes wrap calls in
//! `spawn_blocking`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::{
    majority_sql, CATALOGUE_SQL, KEYWORD_SQL, RECOMPUTE_DISH_SCORES_SQL, RECOMPUTE_MENU_SIZE_SQL,
    REVIEW_SQL, USER_SQL,
};
use crate::types::*;
use dishdive_core::{Error, Result};

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

const LINK_KEYWORD_SQL: &str =
    "INSERT OR IGNORE INTO review_dish_keywords (review_dish_id, keyword_id) VALUES (?1, ?2)";

const BUMP_FREQUENCY_SQL: &str =
    "INSERT INTO dish_keywords (dish_id, keyword_id, frequency) VALUES (?1, ?2, 1)
     ON CONFLICT(dish_id, keyword_id) DO UPDATE SET frequency = frequency + 1";

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store. The file is `db_dir/dishdive.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir)?;
        let db_path = db_dir.join("dishdive.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let stats = store.get_stats()?;
        info!(
            "SqliteStore initialized: {} restaurants, {} dishes, {} keywords, {} reviews, path={}",
            stats.restaurants,
            stats.dishes,
            stats.keywords,
            stats.reviews,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(db_err)?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        let full_schema = format!("{}\n{}\n{}\n{}", CATALOGUE_SQL, KEYWORD_SQL, USER_SQL, REVIEW_SQL);
        conn.execute_batch(&full_schema)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ---------------------------------------------------------------
    // Catalogue
    // ---------------------------------------------------------------

    /// Insert a restaurant, or return the existing one with the same name.
    pub fn add_restaurant(
        &self,
        name: &str,
        cuisine: Option<&str>,
        restriction: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR IGNORE INTO restaurants (res_name, res_cuisine, res_restriction) VALUES (?1, ?2, ?3)",
        )
        .map_err(db_err)?
        .execute(params![name, cuisine, restriction])
        .map_err(db_err)?;
        let id = conn
            .query_row(
                "SELECT res_id FROM restaurants WHERE res_name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(id)
    }

    pub fn get_restaurant(&self, res_id: i64) -> Result<Option<Restaurant>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM restaurants WHERE res_id = ?1")
            .map_err(db_err)?
            .query_row(params![res_id], Self::row_to_restaurant)
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM restaurants ORDER BY res_id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], Self::row_to_restaurant)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    pub fn add_location(
        &self,
        res_id: i64,
        name: &str,
        address: Option<&str>,
        latitude: f64,
        longitude: f64,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO restaurant_locations (res_id, location_name, address, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(db_err)?
            .insert(params![res_id, name, address, latitude, longitude])
            .map_err(db_err)?;
        Ok(id)
    }

    /// All branches of one restaurant.
    pub fn locations_for_restaurant(&self, res_id: i64) -> Result<Vec<RestaurantLocation>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM restaurant_locations WHERE res_id = ?1 ORDER BY rl_id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![res_id], Self::row_to_location)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    pub fn add_dish(
        &self,
        res_id: i64,
        name: &str,
        cuisine: Option<&str>,
        restriction: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO dishes (res_id, dish_name, cuisine, restriction) VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(db_err)?
            .insert(params![res_id, name, cuisine, restriction])
            .map_err(db_err)?;
        Ok(id)
    }

    pub fn get_dish(&self, dish_id: i64) -> Result<Option<Dish>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM dishes WHERE dish_id = ?1")
            .map_err(db_err)?
            .query_row(params![dish_id], Self::row_to_dish)
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// Dishes in id order. `res_id` restricts to one restaurant; `name_query`
    /// keeps dishes whose name contains it.
    pub fn list_dishes(&self, res_id: Option<i64>, name_query: Option<&str>) -> Result<Vec<Dish>> {
        let pattern = name_query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q));
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM dishes
                 WHERE (?1 IS NULL OR res_id = ?1)
                   AND (?2 IS NULL OR dish_name LIKE ?2)
                 ORDER BY dish_id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![res_id, pattern], Self::row_to_dish)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    pub fn add_favorite(&self, user_id: i64, dish_id: i64) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT OR IGNORE INTO favorites (user_id, dish_id) VALUES (?1, ?2)")
            .map_err(db_err)?
            .execute(params![user_id, dish_id])
            .map_err(db_err)?;
        Ok(())
    }

    pub fn favorites(&self, user_id: i64) -> Result<HashSet<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT dish_id FROM favorites WHERE user_id = ?1")
            .map_err(db_err)?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<HashSet<i64>>>()
            .map_err(db_err)?;
        Ok(ids)
    }

    // ---------------------------------------------------------------
    // Keywords
    // ---------------------------------------------------------------

    /// Find or create a keyword by its (text, category, sentiment) triple.
    /// The flag is true when a new row was inserted.
    pub fn get_or_create_keyword(
        &self,
        text: &str,
        category: Category,
        sentiment: Sentiment,
    ) -> Result<(Keyword, bool)> {
        let conn = self.conn.lock();
        let inserted = conn
            .prepare_cached(
                "INSERT OR IGNORE INTO keywords (keyword, category, sentiment) VALUES (?1, ?2, ?3)",
            )
            .map_err(db_err)?
            .execute(params![text, category.as_str(), sentiment.as_str()])
            .map_err(db_err)?;
        let keyword = conn
            .prepare_cached(
                "SELECT * FROM keywords WHERE keyword = ?1 AND category = ?2 AND sentiment = ?3",
            )
            .map_err(db_err)?
            .query_row(
                params![text, category.as_str(), sentiment.as_str()],
                Self::row_to_keyword,
            )
            .map_err(db_err)?;
        Ok((keyword, inserted > 0))
    }

    /// First keyword with this text in a category, any sentiment.
    pub fn find_keyword(&self, text: &str, category: Category) -> Result<Option<Keyword>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT * FROM keywords WHERE keyword = ?1 AND category = ?2 ORDER BY keyword_id LIMIT 1",
            )
            .map_err(db_err)?
            .query_row(params![text, category.as_str()], Self::row_to_keyword)
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// All keywords whose stored category parses to one of `categories`.
    /// Legacy category spellings are matched through [`Category::parse`].
    pub fn keywords_by_category(&self, categories: &[Category]) -> Result<Vec<Keyword>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM keywords ORDER BY keyword_id")
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], Self::row_to_keyword)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .filter(|k| categories.contains(&k.category))
            .collect())
    }

    pub fn add_keyword_alias(&self, keyword_id: i64, alt_word: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached("INSERT INTO keyword_aliases (keyword_id, alt_word) VALUES (?1, ?2)")
            .map_err(db_err)?
            .insert(params![keyword_id, alt_word])
            .map_err(db_err)?;
        Ok(id)
    }

    /// The full alias table as (alternative text, canonical keyword text).
    pub fn keyword_aliases(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT ka.alt_word, k.keyword
                 FROM keyword_aliases ka
                 JOIN keywords k ON k.keyword_id = ka.keyword_id
                 ORDER BY ka.ka_id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    // ---------------------------------------------------------------
    // Reviews and extracts
    // ---------------------------------------------------------------

    pub fn add_review(&self, user_id: i64, dish_id: i64, res_id: i64, text: &str) -> Result<Review> {
        let created_at = now_millis();
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO user_reviews (user_id, dish_id, res_id, user_rev, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(db_err)?
            .insert(params![user_id, dish_id, res_id, text, created_at])
            .map_err(db_err)?;
        Ok(Review {
            id,
            user_id,
            dish_id,
            restaurant_id: res_id,
            text: text.to_string(),
            created_at,
        })
    }

    pub fn get_review(&self, review_id: i64) -> Result<Option<Review>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM user_reviews WHERE user_rev_id = ?1")
            .map_err(db_err)?
            .query_row(params![review_id], |row| {
                Ok(Review {
                    id: row.get("user_rev_id")?,
                    user_id: row.get("user_id")?,
                    dish_id: row.get("dish_id")?,
                    restaurant_id: row.get("res_id")?,
                    text: row.get("user_rev")?,
                    created_at: row.get("created_at")?,
                })
            })
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// Insert or overwrite the extraction payload for one review source.
    pub fn upsert_review_extract(
        &self,
        source_id: i64,
        source_type: SourceType,
        payload: &str,
    ) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO review_extracts (source_id, source_type, data_extract, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(source_id, source_type)
             DO UPDATE SET data_extract = excluded.data_extract, updated_at = excluded.updated_at",
        )
        .map_err(db_err)?
        .execute(params![source_id, source_type.as_str(), payload, now_millis()])
        .map_err(db_err)?;
        debug!("Upserted extract for {}:{}", source_type, source_id);
        Ok(())
    }

    pub fn review_extract(&self, source_id: i64, source_type: SourceType) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT data_extract FROM review_extracts WHERE source_id = ?1 AND source_type = ?2",
            )
            .map_err(db_err)?
            .query_row(params![source_id, source_type.as_str()], |row| row.get(0))
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    pub fn has_review_extract(&self, source_id: i64, source_type: SourceType) -> Result<bool> {
        Ok(self.review_extract(source_id, source_type)?.is_some())
    }

    // ---------------------------------------------------------------
    // Review links
    // ---------------------------------------------------------------

    /// Look up or create the review↔dish link. The flag is true when created.
    pub fn get_or_create_review_dish(
        &self,
        source_id: i64,
        source_type: SourceType,
        dish_id: i64,
        res_id: i64,
    ) -> Result<(ReviewDish, bool)> {
        let conn = self.conn.lock();
        let inserted = conn
            .prepare_cached(
                "INSERT OR IGNORE INTO review_dishes (source_id, source_type, dish_id, res_id)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .map_err(db_err)?
            .execute(params![source_id, source_type.as_str(), dish_id, res_id])
            .map_err(db_err)?;
        let id: i64 = conn
            .prepare_cached(
                "SELECT review_dish_id FROM review_dishes
                 WHERE source_id = ?1 AND source_type = ?2 AND dish_id = ?3 AND res_id = ?4",
            )
            .map_err(db_err)?
            .query_row(params![source_id, source_type.as_str(), dish_id, res_id], |row| {
                row.get(0)
            })
            .map_err(db_err)?;
        Ok((
            ReviewDish {
                id,
                source_id,
                source_type,
                dish_id,
                restaurant_id: res_id,
            },
            inserted > 0,
        ))
    }

    pub fn has_review_dish(&self, source_id: i64, source_type: SourceType) -> Result<bool> {
        let conn = self.conn.lock();
        let found = conn
            .prepare_cached(
                "SELECT 1 FROM review_dishes WHERE source_id = ?1 AND source_type = ?2 LIMIT 1",
            )
            .map_err(db_err)?
            .query_row(params![source_id, source_type.as_str()], |_| Ok(()))
            .optional()
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    /// Link a keyword to a review-dish. Returns true only when the link is new.
    pub fn ensure_review_dish_keyword(&self, review_dish_id: i64, keyword_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let inserted = conn
            .prepare_cached(LINK_KEYWORD_SQL)
            .map_err(db_err)?
            .execute(params![review_dish_id, keyword_id])
            .map_err(db_err)?;
        Ok(inserted > 0)
    }

    /// Link a keyword to a review-dish and, when the link is new, bump the
    /// dish↔keyword frequency. Both writes commit together or not at all.
    pub fn link_and_bump(&self, review_dish_id: i64, dish_id: i64, keyword_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        let inserted = tx
            .prepare_cached(LINK_KEYWORD_SQL)
            .map_err(db_err)?
            .execute(params![review_dish_id, keyword_id])
            .map_err(db_err)?;
        if inserted > 0 {
            tx.prepare_cached(BUMP_FREQUENCY_SQL)
                .map_err(db_err)?
                .execute(params![dish_id, keyword_id])
                .map_err(db_err)?;
        }
        tx.commit().map_err(db_err)?;
        Ok(inserted > 0)
    }

    pub fn dish_keyword_frequency(&self, dish_id: i64, keyword_id: i64) -> Result<Option<i64>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT frequency FROM dish_keywords WHERE dish_id = ?1 AND keyword_id = ?2",
            )
            .map_err(db_err)?
            .query_row(params![dish_id, keyword_id], |row| row.get(0))
            .optional()
            .map_err(db_err)?;
        Ok(row)
    }

    /// Keyword ids linked to a dish, in id order.
    pub fn dish_keywords(&self, dish_id: i64) -> Result<Vec<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT keyword_id FROM dish_keywords WHERE dish_id = ?1 ORDER BY keyword_id",
            )
            .map_err(db_err)?;
        let ids = stmt
            .query_map(params![dish_id], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(db_err)?;
        Ok(ids)
    }

    // ---------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------

    /// Recompute every derived dish and restaurant field from the link
    /// tables in one transaction.
    pub fn recompute_aggregates(&self) -> Result<AggregateCounts> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;

        let dishes_scored = tx.execute(RECOMPUTE_DISH_SCORES_SQL, []).map_err(db_err)?;
        let menus_sized = tx.execute(RECOMPUTE_MENU_SIZE_SQL, []).map_err(db_err)?;
        tx.execute(&majority_sql("cuisine", "res_cuisine"), [])
            .map_err(db_err)?;
        tx.execute(&majority_sql("restriction", "res_restriction"), [])
            .map_err(db_err)?;

        let (cuisines, restrictions): (i64, i64) = tx
            .query_row(
                "SELECT COUNT(res_cuisine), COUNT(res_restriction) FROM restaurants",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(db_err)?;

        tx.commit().map_err(db_err)?;

        Ok(AggregateCounts {
            dishes_scored,
            menus_sized,
            cuisines_assigned: cuisines as usize,
            restrictions_assigned: restrictions as usize,
        })
    }

    /// (positive, negative, total) review counts as last recomputed.
    pub fn review_counts(&self, dish_id: i64) -> Result<(i64, i64, i64)> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT positive_score, negative_score, total_score FROM dishes WHERE dish_id = ?1",
            )
            .map_err(db_err)?
            .query_row(params![dish_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .optional()
            .map_err(db_err)?
            .ok_or_else(|| Error::NotFound(format!("dish {}", dish_id)))?;
        Ok(row)
    }

    // ---------------------------------------------------------------
    // User settings
    // ---------------------------------------------------------------

    /// Every stored preference/blacklist row for a user, with its keyword.
    pub fn user_settings(&self, user_id: i64) -> Result<Vec<KeywordSetting>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT k.*, pb.preference, pb.blacklist
                 FROM preference_blacklists pb
                 JOIN keywords k ON k.keyword_id = pb.keyword_id
                 WHERE pb.user_id = ?1
                 ORDER BY k.keyword_id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(KeywordSetting {
                    keyword: Self::row_to_keyword(row)?,
                    preference: row.get("preference")?,
                    blacklist: row.get("blacklist")?,
                })
            })
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    /// Upsert a batch of per-keyword values for one user atomically.
    pub fn upsert_user_settings(&self, user_id: i64, rows: &[PreferenceBlacklist]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO preference_blacklists (user_id, keyword_id, preference, blacklist)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(user_id, keyword_id)
                     DO UPDATE SET preference = excluded.preference, blacklist = excluded.blacklist",
                )
                .map_err(db_err)?;
            for row in rows {
                stmt.execute(params![
                    user_id,
                    row.keyword_id,
                    row.preference.clamp(0.0, 1.0),
                    row.blacklist.clamp(0.0, 1.0)
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        Ok(rows.len())
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let count = |table: &str| -> Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
                .map_err(db_err)
        };
        Ok(StoreStats {
            restaurants: count("restaurants")?,
            dishes: count("dishes")?,
            keywords: count("keywords")?,
            reviews: count("user_reviews")?,
            extracts: count("review_extracts")?,
            review_links: count("review_dishes")?,
            db_path: self.db_path.display().to_string(),
        })
    }

    // ---------------------------------------------------------------
    // Row mapping
    // ---------------------------------------------------------------

    fn row_to_restaurant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Restaurant> {
        Ok(Restaurant {
            id: row.get("res_id")?,
            name: row.get("res_name")?,
            cuisine: row.get("res_cuisine")?,
            restriction: row.get("res_restriction")?,
            menu_size: row.get("menu_size")?,
        })
    }

    fn row_to_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<RestaurantLocation> {
        Ok(RestaurantLocation {
            id: row.get("rl_id")?,
            restaurant_id: row.get("res_id")?,
            name: row.get("location_name")?,
            address: row.get("address")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        })
    }

    fn row_to_dish(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dish> {
        Ok(Dish {
            id: row.get("dish_id")?,
            restaurant_id: row.get("res_id")?,
            name: row.get("dish_name")?,
            cuisine: row.get("cuisine")?,
            restriction: row.get("restriction")?,
            positive_score: row.get("positive_score")?,
            negative_score: row.get("negative_score")?,
            total_score: row.get("total_score")?,
        })
    }

    fn row_to_keyword(row: &rusqlite::Row<'_>) -> rusqlite::Result<Keyword> {
        let category: String = row.get("category")?;
        let sentiment: String = row.get("sentiment")?;
        Ok(Keyword {
            id: row.get("keyword_id")?,
            text: row.get("keyword")?,
            category: Category::parse(&category),
            sentiment: Sentiment::parse(&sentiment),
        })
    }
}
