//! Game state schema and hardcoded defaults.
//!
//! The structs here define the persisted JSON shape (camelCase keys) and the
//! authoritative default tree the store is created from. The store itself
//! works on a `serde_json::Value` rendering of this schema; the typed structs
//! are the single source of truth for shape and defaults, and give import
//! validation something concrete to check against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current save format version. Bump when the schema changes shape.
pub const STATE_VERSION: &str = "1.0.0";

/// Full game state tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub version: String,
    pub game_progress: GameProgress,
    pub collection: Collection,
    pub purchases: Purchases,
    pub settings: Settings,
    /// RFC 3339 timestamp of the last successful save, empty if never saved.
    pub last_saved: String,
}

/// Point counters and stage progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameProgress {
    pub current_stage: u32,
    /// Sorted, duplicate-free. Stage 1 is always present.
    pub unlocked_stages: Vec<u32>,
    pub total_points: f64,
    pub current_points: f64,
    /// Additive click bonus from purchased upgrades.
    pub total_click_boost: f64,
    /// Idle points per second from purchased upgrades.
    #[serde(rename = "totalCPS")]
    pub total_cps: f64,
}

/// Collected heroine images and reward videos.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    /// Stage key (`stage1`, `stage2`, ...) to insertion-ordered item ids.
    pub heroine: BTreeMap<String, Vec<String>>,
    pub videos: Vec<String>,
    pub current_display_image: String,
}

/// Owned shop items, id to count.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Purchases {
    pub items: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub bgm_volume: f64,
    pub se_volume: f64,
    pub auto_save_enabled: bool,
    /// Seconds between periodic auto-saves.
    pub auto_save_interval: u32,
    pub debug_mode: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            game_progress: GameProgress::default(),
            collection: Collection::default(),
            purchases: Purchases::default(),
            settings: Settings::default(),
            last_saved: String::new(),
        }
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            current_stage: 1,
            unlocked_stages: vec![1],
            total_points: 0.0,
            current_points: 0.0,
            total_click_boost: 0.0,
            total_cps: 0.0,
        }
    }
}

impl Default for Collection {
    fn default() -> Self {
        // A new game starts with the first stage-1 image already revealed,
        // and it doubles as the initial display image.
        let mut heroine = BTreeMap::new();
        heroine.insert("stage1".to_string(), vec!["heroine_1_1".to_string()]);
        Self {
            heroine,
            videos: Vec::new(),
            current_display_image: "heroine_1_1".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bgm_volume: 0.5,
            se_volume: 0.5,
            auto_save_enabled: true,
            auto_save_interval: 60,
            debug_mode: false,
        }
    }
}

impl GameState {
    /// The default tree rendered as a JSON value. The store is seeded from
    /// this, and snapshot merges layer on top of it.
    pub fn default_tree() -> Value {
        serde_json::to_value(GameState::default()).expect("default state serializes")
    }
}

/// Key under `collection.heroine` for a stage number.
pub fn stage_key(stage: u32) -> String {
    format!("stage{stage}")
}

/// Reward video id granted when a stage is first unlocked.
pub fn video_id(stage: u32) -> String {
    format!("video_{stage}")
}
