//! Row types and domain enums for restaurants, dishes, keywords and reviews.

use serde::{Deserialize, Serialize};

/// Keyword category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flavor,
    Cost,
    Cuisine,
    Restriction,
    System,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flavor => "flavor",
            Self::Cost => "cost",
            Self::Cuisine => "cuisine",
            Self::Restriction => "restriction",
            Self::System => "system",
            Self::Others => "others",
        }
    }

    /// Parse a stored category. Legacy synonyms fold in (`taste` → flavor,
    /// `price` → cost); anything unknown is `Others`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "flavor" | "taste" => Self::Flavor,
            "cost" | "price" => Self::Cost,
            "cuisine" => Self::Cuisine,
            "restriction" => Self::Restriction,
            "system" => Self::System,
            _ => Self::Others,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Anything other than positive/negative is neutral.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a review text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Submitted through the app.
    User,
    /// Scraped from an external review site.
    Web,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Web => "web",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "web" => Ok(Self::Web),
            other => Err(format!("unknown source type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,
    pub menu_size: i64,
}

/// A physical branch of a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantLocation {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A dish row. The three scores are derived by the aggregate recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,
    pub positive_score: i64,
    pub negative_score: i64,
    pub total_score: i64,
}

/// A canonical keyword. Identity is the (text, category, sentiment) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub text: String,
    pub category: Category,
    pub sentiment: Sentiment,
}

/// A user-submitted review row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub dish_id: i64,
    pub restaurant_id: i64,
    pub text: String,
    pub created_at: i64,
}

/// Link between one review source and the dish it talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDish {
    pub id: i64,
    pub source_id: i64,
    pub source_type: SourceType,
    pub dish_id: i64,
    pub restaurant_id: i64,
}

/// Per-user preference/blacklist values for one keyword. 0 means unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceBlacklist {
    pub keyword_id: i64,
    pub preference: f64,
    pub blacklist: f64,
}

/// A user's stored setting joined with the keyword it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSetting {
    pub keyword: Keyword,
    pub preference: f64,
    pub blacklist: f64,
}

/// Rows touched by one aggregate recompute pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounts {
    #[serde(rename = "dishesScored")]
    pub dishes_scored: usize,
    #[serde(rename = "menusSized")]
    pub menus_sized: usize,
    #[serde(rename = "cuisinesAssigned")]
    pub cuisines_assigned: usize,
    #[serde(rename = "restrictionsAssigned")]
    pub restrictions_assigned: usize,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub restaurants: i64,
    pub dishes: i64,
    pub keywords: i64,
    pub reviews: i64,
    pub extracts: i64,
    pub review_links: i64,
    pub db_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_synonyms() {
        assert_eq!(Category::parse("Taste"), Category::Flavor);
        assert_eq!(Category::parse(" price "), Category::Cost);
        assert_eq!(Category::parse("ambience"), Category::Others);
        assert_eq!(Category::System.to_string(), "system");
    }

    #[test]
    fn test_sentiment_parse() {
        assert_eq!(Sentiment::parse("POSITIVE"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("mixed"), Sentiment::Neutral);
    }

    #[test]
    fn test_source_type_round_trip() {
        assert_eq!("web".parse::<SourceType>().unwrap(), SourceType::Web);
        assert!("forum".parse::<SourceType>().is_err());
        assert_eq!(SourceType::User.as_str(), "user");
    }
}
