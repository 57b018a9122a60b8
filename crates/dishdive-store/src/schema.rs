//! Database schema SQL.

/// Catalogue tables: restaurants, branches, dishes.
pub const CATALOGUE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS restaurants (
    res_id INTEGER PRIMARY KEY AUTOINCREMENT,
    res_name TEXT NOT NULL UNIQUE,
    res_cuisine TEXT,
    res_restriction TEXT,
    menu_size INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS restaurant_locations (
    rl_id INTEGER PRIMARY KEY AUTOINCREMENT,
    res_id INTEGER NOT NULL REFERENCES restaurants(res_id) ON DELETE CASCADE,
    location_name TEXT NOT NULL,
    address TEXT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS dishes (
    dish_id INTEGER PRIMARY KEY AUTOINCREMENT,
    res_id INTEGER NOT NULL REFERENCES restaurants(res_id) ON DELETE CASCADE,
    dish_name TEXT NOT NULL,
    cuisine TEXT,
    restriction TEXT,
    positive_score INTEGER NOT NULL DEFAULT 0,
    negative_score INTEGER NOT NULL DEFAULT 0,
    total_score INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_locations_res ON restaurant_locations(res_id);
CREATE INDEX IF NOT EXISTS idx_dishes_res ON dishes(res_id);
"#;

/// Keyword vocabulary, aliases and per-dish frequencies.
pub const KEYWORD_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS keywords (
    keyword_id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL,
    category TEXT NOT NULL,
    sentiment TEXT NOT NULL,
    UNIQUE(keyword, category, sentiment)
);

CREATE TABLE IF NOT EXISTS keyword_aliases (
    ka_id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword_id INTEGER NOT NULL REFERENCES keywords(keyword_id) ON DELETE CASCADE,
    alt_word TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dish_keywords (
    dish_id INTEGER NOT NULL REFERENCES dishes(dish_id) ON DELETE CASCADE,
    keyword_id INTEGER NOT NULL REFERENCES keywords(keyword_id) ON DELETE CASCADE,
    frequency INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (dish_id, keyword_id)
);

CREATE INDEX IF NOT EXISTS idx_keywords_category ON keywords(category);
"#;

/// Per-user tables: favorites and taste settings.
pub const USER_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    user_id INTEGER NOT NULL,
    dish_id INTEGER NOT NULL REFERENCES dishes(dish_id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, dish_id)
);

CREATE TABLE IF NOT EXISTS preference_blacklists (
    user_id INTEGER NOT NULL,
    keyword_id INTEGER NOT NULL REFERENCES keywords(keyword_id) ON DELETE CASCADE,
    preference REAL NOT NULL DEFAULT 0,
    blacklist REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, keyword_id)
);
"#;

/// Review tables: raw reviews, extraction payloads and normalized links.
pub const REVIEW_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user_reviews (
    user_rev_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    dish_id INTEGER NOT NULL,
    res_id INTEGER NOT NULL,
    user_rev TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS review_extracts (
    rev_ext_id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL,
    source_type TEXT NOT NULL,
    data_extract TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(source_id, source_type)
);

CREATE TABLE IF NOT EXISTS review_dishes (
    review_dish_id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL,
    source_type TEXT NOT NULL DEFAULT 'user',
    dish_id INTEGER NOT NULL REFERENCES dishes(dish_id) ON DELETE CASCADE,
    res_id INTEGER NOT NULL,
    UNIQUE(source_id, source_type, dish_id, res_id)
);

CREATE TABLE IF NOT EXISTS review_dish_keywords (
    review_dish_keyword_id INTEGER PRIMARY KEY AUTOINCREMENT,
    review_dish_id INTEGER NOT NULL REFERENCES review_dishes(review_dish_id) ON DELETE CASCADE,
    keyword_id INTEGER NOT NULL REFERENCES keywords(keyword_id) ON DELETE CASCADE,
    UNIQUE(review_dish_id, keyword_id)
);

CREATE INDEX IF NOT EXISTS idx_review_dishes_dish ON review_dishes(dish_id);
CREATE INDEX IF NOT EXISTS idx_rdk_review_dish ON review_dish_keywords(review_dish_id);
"#;

/// Per-dish review counts. A review counts once as positive if any of its
/// linked keywords is positive (likewise negative); total is the number of
/// linked reviews. Dishes with no links reset to zero.
pub const RECOMPUTE_DISH_SCORES_SQL: &str = r#"
WITH per_review AS (
    SELECT rd.dish_id, rd.review_dish_id,
           MAX(CASE WHEN k.sentiment = 'positive' THEN 1 ELSE 0 END) AS has_pos,
           MAX(CASE WHEN k.sentiment = 'negative' THEN 1 ELSE 0 END) AS has_neg
    FROM review_dishes rd
    LEFT JOIN review_dish_keywords rdk ON rdk.review_dish_id = rd.review_dish_id
    LEFT JOIN keywords k ON k.keyword_id = rdk.keyword_id
    GROUP BY rd.dish_id, rd.review_dish_id
), agg AS (
    SELECT dish_id, SUM(has_pos) AS pos, SUM(has_neg) AS neg, COUNT(*) AS total
    FROM per_review
    GROUP BY dish_id
)
UPDATE dishes SET
    positive_score = COALESCE((SELECT pos FROM agg WHERE agg.dish_id = dishes.dish_id), 0),
    negative_score = COALESCE((SELECT neg FROM agg WHERE agg.dish_id = dishes.dish_id), 0),
    total_score = COALESCE((SELECT total FROM agg WHERE agg.dish_id = dishes.dish_id), 0)
"#;

pub const RECOMPUTE_MENU_SIZE_SQL: &str = r#"
UPDATE restaurants SET
    menu_size = (SELECT COUNT(*) FROM dishes d WHERE d.res_id = restaurants.res_id)
"#;

/// Majority attribute over a restaurant's dishes: the most common non-empty
/// value wins if it covers at least 80% of the dishes that have one
/// (`cnt * 5 >= total * 4`), otherwise the field is cleared.
/// `{col}` is the dish column, `{target}` the restaurant column.
const MAJORITY_TEMPLATE: &str = r#"
WITH per_res AS (
    SELECT res_id, {col} AS value, COUNT(*) AS cnt,
           SUM(COUNT(*)) OVER (PARTITION BY res_id) AS total
    FROM dishes
    WHERE {col} IS NOT NULL AND {col} <> ''
    GROUP BY res_id, {col}
), pick AS (
    SELECT res_id, value, cnt, total,
           ROW_NUMBER() OVER (PARTITION BY res_id ORDER BY cnt DESC, value) AS rn
    FROM per_res
)
UPDATE restaurants SET
    {target} = (
        SELECT CASE WHEN p.cnt * 5 >= p.total * 4 THEN p.value ELSE NULL END
        FROM pick p
        WHERE p.res_id = restaurants.res_id AND p.rn = 1
    )
"#;

pub fn majority_sql(dish_column: &str, restaurant_column: &str) -> String {
    MAJORITY_TEMPLATE
        .replace("{col}", dish_column)
        .replace("{target}", restaurant_column)
}
