//! Recommendation: per-user dish ranking, preference-aware restaurant
//! search, taste settings and keyword-group mapping.

pub mod booster;
pub mod geo;
pub mod mapping;
pub mod ranker;
pub mod service;
pub mod settings;
pub mod types;

pub use booster::{DistanceSoftBooster, PreferredGroups};
pub use geo::{haversine_km, nearest_km};
pub use mapping::{KeywordGroups, KeywordMapping};
pub use ranker::RecommendationRanker;
pub use service::Recommender;
pub use settings::{KeywordSettingView, KeywordValue, SettingsUpdate, TasteSettings, UserSettings};
pub use types::*;
