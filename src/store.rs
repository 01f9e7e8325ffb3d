//! The reactive game-state store.
//!
//! One `Store` instance is the authoritative mutable state for the whole
//! game; hosts pass a shared reference into each component instead of going
//! through a global. All mutation funnels through [`Store::set`] (directly or
//! via the domain methods), which notifies exact and wildcard listeners
//! synchronously and records the change's save class for the save manager.
//!
//! The tree itself is a `serde_json::Value` seeded from the typed default
//! schema in [`crate::state`], which keeps dotted-path access and snapshot
//! merging trivial while the typed structs stay authoritative for shape.

use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Catalog, EffectKind};
use crate::path;
use crate::state::{stage_key, video_id, GameState};

/// Handle returned by [`Store::add_listener`], used for removal.
pub type ListenerId = u64;

type Callback = Box<dyn FnMut(&Value, &Value, &str)>;

struct Listener {
    id: ListenerId,
    pattern: String,
    callback: Callback,
}

/// How urgently a changed path needs persisting.
///
/// Point counters tick constantly and are covered by the periodic timer;
/// purchases, collection changes, stage unlocks and settings are saved on
/// the next pump without waiting for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SaveClass {
    Deferred,
    Immediate,
}

/// Path prefixes whose mutation requests an immediate save.
const IMMEDIATE_SAVE_PREFIXES: &[&str] = &[
    "purchases",
    "collection",
    "gameProgress.unlockedStages",
    "gameProgress.currentStage",
    "settings",
];

/// Classify a changed path for auto-save purposes.
pub fn save_class(changed: &str) -> SaveClass {
    let immediate = IMMEDIATE_SAVE_PREFIXES.iter().any(|prefix| {
        changed
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    });
    if immediate {
        SaveClass::Immediate
    } else {
        SaveClass::Deferred
    }
}

/// Progress of one stage's (or the whole game's) collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionProgress {
    pub collected: u32,
    pub total: u32,
}

#[derive(Debug, Error)]
pub enum StateError {
    /// A snapshot without a string `version` is rejected before any merge.
    #[error("snapshot is missing a version string")]
    MissingVersion,
}

/// The in-memory game-state tree plus its mutation/subscription API.
pub struct Store {
    tree: Value,
    listeners: Vec<Listener>,
    next_listener_id: ListenerId,
    /// Runtime mirror of `settings.debugMode`; short-circuits spend checks.
    debug_mode: bool,
    pending_save: Option<SaveClass>,
}

impl Store {
    /// A fresh store holding the hardcoded default tree.
    pub fn new() -> Self {
        Self {
            tree: GameState::default_tree(),
            listeners: Vec::new(),
            next_listener_id: 0,
            debug_mode: false,
            pending_save: None,
        }
    }

    // ── Path access & subscriptions ───────────────────────

    /// Look up a node. Missing paths yield `None`, never an error.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::get(&self.tree, path)
    }

    /// Numeric convenience lookup; missing or non-numeric reads as 0.
    pub fn get_f64(&self, path: &str) -> f64 {
        self.get(path).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Assign a leaf, creating intermediate nodes as needed, then notify
    /// exact and wildcard listeners and record the path's save class.
    pub fn set(&mut self, path: &str, value: Value) {
        let old = path::get(&self.tree, path)
            .cloned()
            .unwrap_or(Value::Null);
        path::set(&mut self.tree, path, value.clone());
        if path == "settings.debugMode" {
            self.debug_mode = value.as_bool().unwrap_or(false);
        }
        self.notify(path, &value, &old);
        self.pending_save = self.pending_save.max(Some(save_class(path)));
    }

    /// Register a listener for an exact path or a wildcard pattern
    /// (`"collection.*"`, or `"*"` for everything). The callback receives
    /// `(new_value, old_value, changed_path)`.
    pub fn add_listener(
        &mut self,
        pattern: &str,
        callback: impl FnMut(&Value, &Value, &str) + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push(Listener {
            id,
            pattern: pattern.to_string(),
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener by the id `add_listener` returned.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, changed: &str, new: &Value, old: &Value) {
        // Listeners have no store access, so none can be added or removed
        // while the vec is parked here.
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            if path::matches(&listener.pattern, changed) {
                (listener.callback)(new, old, changed);
            }
        }
        self.listeners = listeners;
    }

    /// Fire every registered listener once with the whole tree and path `"*"`.
    /// Used after snapshot loads and resets; delivery is synchronous and
    /// happens exactly once.
    fn broadcast(&mut self, old: &Value) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            (listener.callback)(&self.tree, old, "*");
        }
        self.listeners = listeners;
    }

    // ── Snapshot lifecycle ────────────────────────────────

    /// The current tree, cloned for serialization.
    pub fn snapshot(&self) -> Value {
        self.tree.clone()
    }

    /// Merge a persisted snapshot onto a fresh default tree.
    ///
    /// Object-valued keys merge recursively; arrays and scalars from the
    /// snapshot replace defaults wholesale; schema keys the snapshot lacks
    /// keep their defaults. The runtime debug flag is re-derived from the
    /// merged settings and invariants are re-established before the single
    /// `"*"` broadcast.
    pub fn load_state(&mut self, snapshot: &Value) -> Result<(), StateError> {
        if !snapshot
            .get("version")
            .map(Value::is_string)
            .unwrap_or(false)
        {
            return Err(StateError::MissingVersion);
        }
        let old = std::mem::replace(&mut self.tree, GameState::default_tree());
        path::deep_merge(&mut self.tree, snapshot);
        self.normalize();
        self.debug_mode = self
            .get("settings.debugMode")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        self.broadcast(&old);
        Ok(())
    }

    /// Restore the hardcoded defaults and broadcast once.
    pub fn reset(&mut self) {
        let old = std::mem::replace(&mut self.tree, GameState::default_tree());
        self.debug_mode = false;
        self.broadcast(&old);
    }

    /// Re-establish invariants a merged snapshot may have broken: stage 1
    /// stays unlocked, the current stage must be unlocked, points are never
    /// negative. Runs before the load broadcast, so listeners only ever see
    /// a consistent tree.
    fn normalize(&mut self) {
        let mut unlocked = self.unlocked_stages();
        if !unlocked.contains(&1) {
            unlocked.push(1);
        }
        unlocked.sort_unstable();
        unlocked.dedup();
        path::set(
            &mut self.tree,
            "gameProgress.unlockedStages",
            serde_json::to_value(&unlocked).expect("vec serializes"),
        );

        let current = self
            .get("gameProgress.currentStage")
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32;
        if !unlocked.contains(&current) {
            path::set(&mut self.tree, "gameProgress.currentStage", 1.into());
        }

        for counter in ["gameProgress.currentPoints", "gameProgress.totalPoints"] {
            if self.get_f64(counter) < 0.0 {
                path::set(&mut self.tree, counter, Value::from(0.0));
            }
        }
    }

    // ── Points & spending ─────────────────────────────────

    /// Whether the debug cheat toggle is active. All affordability checks
    /// consult this through `can_afford`/`spend_points`; call sites never
    /// re-check it themselves.
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn add_points(&mut self, amount: f64) {
        let current = self.get_f64("gameProgress.currentPoints");
        let total = self.get_f64("gameProgress.totalPoints");
        self.set("gameProgress.currentPoints", (current + amount).into());
        self.set("gameProgress.totalPoints", (total + amount).into());
    }

    /// Spend points. Insufficient funds reject the spend outright rather
    /// than clamping; with debug mode on the spend trivially succeeds and
    /// the balance is left untouched.
    pub fn spend_points(&mut self, amount: f64) -> bool {
        if self.debug_mode {
            return true;
        }
        let current = self.get_f64("gameProgress.currentPoints");
        if amount > current {
            return false;
        }
        self.set("gameProgress.currentPoints", (current - amount).into());
        true
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.debug_mode || self.get_f64("gameProgress.currentPoints") >= cost
    }

    /// Points gained per manual click.
    pub fn get_click_value(&self) -> f64 {
        1.0 + self.get_f64("gameProgress.totalClickBoost")
    }

    /// Idle points per second.
    pub fn get_points_per_second(&self) -> f64 {
        self.get_f64("gameProgress.totalCPS")
    }

    /// Apply one manual click; returns the points gained.
    pub fn click(&mut self) -> f64 {
        let gain = self.get_click_value();
        self.add_points(gain);
        gain
    }

    /// Idle income for `seconds` of elapsed time.
    pub fn accrue(&mut self, seconds: f64) {
        let gain = self.get_points_per_second() * seconds;
        if gain > 0.0 {
            self.add_points(gain);
        }
    }

    // ── Shop ──────────────────────────────────────────────

    /// Buy one copy of a shop item at its progressive price and apply its
    /// effect. Returns false for unknown ids or insufficient points.
    pub fn purchase_item(&mut self, catalog: &Catalog, id: &str) -> bool {
        let Some(item) = catalog.item(id) else {
            return false;
        };
        let owned_path = format!("purchases.items.{id}");
        let owned = self.get(&owned_path).and_then(Value::as_u64).unwrap_or(0) as u32;
        if !self.spend_points(item.price(owned)) {
            return false;
        }
        let effect = item.effect.clone();
        self.set(&owned_path, (owned + 1).into());
        match effect {
            EffectKind::ClickBoost(value) => {
                let boost = self.get_f64("gameProgress.totalClickBoost");
                self.set("gameProgress.totalClickBoost", (boost + value).into());
            }
            EffectKind::AutoPoints(value) => {
                let cps = self.get_f64("gameProgress.totalCPS");
                self.set("gameProgress.totalCPS", (cps + value).into());
            }
        }
        true
    }

    // ── Stages & collection ───────────────────────────────

    pub fn unlocked_stages(&self) -> Vec<u32> {
        self.get("gameProgress.unlockedStages")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_u64)
                    .map(|n| n as u32)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unlock a stage and grant its reward video. Idempotent: a second call
    /// changes nothing and returns false.
    pub fn unlock_stage(&mut self, stage: u32) -> bool {
        let mut unlocked = self.unlocked_stages();
        if unlocked.contains(&stage) {
            return false;
        }
        unlocked.push(stage);
        unlocked.sort_unstable();
        self.set(
            "gameProgress.unlockedStages",
            serde_json::to_value(&unlocked).expect("vec serializes"),
        );

        let mut videos: Vec<String> = self
            .get("collection.videos")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let reward = video_id(stage);
        if !videos.contains(&reward) {
            videos.push(reward);
            self.set(
                "collection.videos",
                serde_json::to_value(&videos).expect("vec serializes"),
            );
        }
        true
    }

    /// Switch the active stage; rejected unless the stage is unlocked.
    pub fn set_current_stage(&mut self, stage: u32) -> bool {
        if !self.unlocked_stages().contains(&stage) {
            return false;
        }
        self.set("gameProgress.currentStage", stage.into());
        true
    }

    /// Add a heroine image to a stage's collection. Set semantics over the
    /// ordered list: re-adding an owned image returns false.
    pub fn add_heroine(&mut self, stage: u32, id: &str) -> bool {
        let list_path = format!("collection.heroine.{}", stage_key(stage));
        let mut list: Vec<String> = self
            .get(&list_path)
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if list.iter().any(|owned| owned == id) {
            return false;
        }
        list.push(id.to_string());
        self.set(
            &list_path,
            serde_json::to_value(&list).expect("vec serializes"),
        );
        true
    }

    /// Collected/total image counts for one stage.
    pub fn get_collection_progress(&self, catalog: &Catalog, stage: u32) -> CollectionProgress {
        let collected = self
            .get(&format!("collection.heroine.{}", stage_key(stage)))
            .and_then(Value::as_array)
            .map(|arr| arr.len() as u32)
            .unwrap_or(0);
        let total = catalog.stage(stage).map(|s| s.heroine_count).unwrap_or(0);
        CollectionProgress { collected, total }
    }

    /// Collected/total counts across every stage in the catalog.
    pub fn get_total_collection_progress(&self, catalog: &Catalog) -> CollectionProgress {
        let mut progress = CollectionProgress {
            collected: 0,
            total: 0,
        };
        for stage in catalog.stages() {
            let per_stage = self.get_collection_progress(catalog, stage.stage);
            progress.collected += per_stage.collected;
            progress.total += per_stage.total;
        }
        progress
    }

    pub fn is_collection_complete(&self, catalog: &Catalog) -> bool {
        let progress = self.get_total_collection_progress(catalog);
        progress.total > 0 && progress.collected == progress.total
    }

    // ── Save-manager coupling ─────────────────────────────

    /// Drain the strongest save class recorded since the last drain.
    pub fn take_pending_save(&mut self) -> Option<SaveClass> {
        self.pending_save.take()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fresh_state_defaults() {
        let store = Store::new();
        assert!((store.get_f64("gameProgress.currentPoints") - 0.0).abs() < f64::EPSILON);
        assert_eq!(store.unlocked_stages(), vec![1]);
        assert_eq!(
            store.get("collection.heroine.stage1"),
            Some(&json!(["heroine_1_1"]))
        );
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut store = Store::new();
        store.set("gameProgress.currentPoints", json!(77.0));
        assert!((store.get_f64("gameProgress.currentPoints") - 77.0).abs() < 0.001);
        // Paths outside the schema are created on demand.
        store.set("scratch.nested.flag", json!(true));
        assert_eq!(store.get("scratch.nested.flag"), Some(&json!(true)));
    }

    #[test]
    fn exact_listener_fires_with_old_and_new() {
        let mut store = Store::new();
        let seen: Rc<RefCell<Vec<(Value, Value, String)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.add_listener("gameProgress.currentPoints", move |new, old, path| {
            sink.borrow_mut()
                .push((new.clone(), old.clone(), path.to_string()));
        });
        store.set("gameProgress.currentPoints", json!(10.0));
        let calls = seen.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, json!(10.0));
        assert_eq!(calls[0].1, json!(0.0));
        assert_eq!(calls[0].2, "gameProgress.currentPoints");
    }

    #[test]
    fn wildcard_listener_receives_concrete_path() {
        let mut store = Store::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.add_listener("collection.*", move |_, _, path| {
            sink.borrow_mut().push(path.to_string());
        });
        store.set("collection.heroine.stage1", json!(["heroine_1_1", "heroine_1_2"]));
        store.set("gameProgress.currentPoints", json!(5.0)); // must not fire
        assert_eq!(*seen.borrow(), vec!["collection.heroine.stage1"]);
    }

    #[test]
    fn removed_listener_stops_firing() {
        let mut store = Store::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.add_listener("settings.bgmVolume", move |_, _, _| {
            *sink.borrow_mut() += 1;
        });
        store.set("settings.bgmVolume", json!(0.2));
        assert!(store.remove_listener(id));
        assert!(!store.remove_listener(id));
        store.set("settings.bgmVolume", json!(0.3));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn spend_guard_rejects_without_clamping() {
        let mut store = Store::new();
        store.add_points(50.0);
        assert!(!store.spend_points(100.0));
        assert!((store.get_f64("gameProgress.currentPoints") - 50.0).abs() < 0.001);
        assert!(store.spend_points(30.0));
        assert!((store.get_f64("gameProgress.currentPoints") - 20.0).abs() < 0.001);
    }

    #[test]
    fn debug_mode_passes_all_spend_checks() {
        let mut store = Store::new();
        store.set("settings.debugMode", json!(true));
        assert!(store.debug_mode());
        assert!(store.can_afford(1e9));
        assert!(store.spend_points(1e9));
        // Infinite-points semantics: balance untouched.
        assert!((store.get_f64("gameProgress.currentPoints") - 0.0).abs() < f64::EPSILON);
        store.set("settings.debugMode", json!(false));
        assert!(!store.spend_points(1.0));
    }

    #[test]
    fn scenario_earn_spend_collect() {
        let catalog = Catalog::builtin();
        let mut store = Store::new();
        store.add_points(150.0);
        assert!(store.spend_points(100.0));
        assert!((store.get_f64("gameProgress.currentPoints") - 50.0).abs() < 0.001);
        assert!((store.get_f64("gameProgress.totalPoints") - 150.0).abs() < 0.001);
        assert!(store.add_heroine(1, "heroine_1_2"));
        assert_eq!(
            store.get_collection_progress(&catalog, 1),
            CollectionProgress { collected: 2, total: 10 }
        );
    }

    #[test]
    fn unlock_stage_is_idempotent() {
        let mut store = Store::new();
        assert!(store.unlock_stage(2));
        assert_eq!(store.unlocked_stages(), vec![1, 2]);
        assert_eq!(store.get("collection.videos"), Some(&json!(["video_2"])));
        assert!(!store.unlock_stage(2));
        assert_eq!(store.unlocked_stages(), vec![1, 2]);
        assert_eq!(store.get("collection.videos"), Some(&json!(["video_2"])));
    }

    #[test]
    fn add_heroine_is_idempotent() {
        let mut store = Store::new();
        assert!(!store.add_heroine(1, "heroine_1_1")); // seeded by default
        assert!(store.add_heroine(1, "heroine_1_3"));
        assert!(!store.add_heroine(1, "heroine_1_3"));
        assert_eq!(
            store.get("collection.heroine.stage1"),
            Some(&json!(["heroine_1_1", "heroine_1_3"]))
        );
    }

    #[test]
    fn current_stage_must_be_unlocked() {
        let mut store = Store::new();
        assert!(!store.set_current_stage(3));
        store.unlock_stage(3);
        assert!(store.set_current_stage(3));
        assert_eq!(store.get("gameProgress.currentStage"), Some(&json!(3)));
    }

    #[test]
    fn purchase_applies_effect_and_progressive_price() {
        let catalog = Catalog::builtin();
        let mut store = Store::new();
        store.add_points(200.0);
        assert!(store.purchase_item(&catalog, "click_power")); // 50
        assert!((store.get_click_value() - 2.0).abs() < 0.001);
        assert!(store.purchase_item(&catalog, "auto_clicker")); // 100
        assert!((store.get_points_per_second() - 1.0).abs() < 0.001);
        // Second click_power copy costs 50 * 1.15 = 57.5 but only 50 remain.
        assert!(!store.purchase_item(&catalog, "click_power"));
        assert_eq!(store.get("purchases.items.click_power"), Some(&json!(1)));
    }

    #[test]
    fn purchase_unknown_item_fails() {
        let catalog = Catalog::builtin();
        let mut store = Store::new();
        store.add_points(1e6);
        assert!(!store.purchase_item(&catalog, "no_such_item"));
        assert!((store.get_f64("gameProgress.currentPoints") - 1e6).abs() < 0.001);
    }

    #[test]
    fn click_uses_boost() {
        let mut store = Store::new();
        assert!((store.click() - 1.0).abs() < 0.001);
        store.set("gameProgress.totalClickBoost", json!(4.0));
        assert!((store.click() - 5.0).abs() < 0.001);
        assert!((store.get_f64("gameProgress.currentPoints") - 6.0).abs() < 0.001);
    }

    #[test]
    fn accrue_adds_idle_income() {
        let mut store = Store::new();
        store.set("gameProgress.totalCPS", json!(2.5));
        store.accrue(4.0);
        assert!((store.get_f64("gameProgress.currentPoints") - 10.0).abs() < 0.001);
        store.accrue(0.0); // no-op
        assert!((store.get_f64("gameProgress.totalPoints") - 10.0).abs() < 0.001);
    }

    #[test]
    fn load_state_merges_onto_defaults() {
        let mut store = Store::new();
        store
            .load_state(&json!({
                "version": "1.0.0",
                "gameProgress": { "currentPoints": 500.0 }
            }))
            .unwrap();
        assert!((store.get_f64("gameProgress.currentPoints") - 500.0).abs() < 0.001);
        // Untouched subtrees keep their defaults.
        assert_eq!(store.get("settings.autoSaveInterval"), Some(&json!(60)));
        assert_eq!(
            store.get("collection.currentDisplayImage"),
            Some(&json!("heroine_1_1"))
        );
    }

    #[test]
    fn load_state_without_version_is_rejected() {
        let mut store = Store::new();
        store.add_points(5.0);
        assert!(store.load_state(&json!({"gameProgress": {}})).is_err());
        assert!(store.load_state(&json!({"version": 2})).is_err());
        // Rejection leaves the tree untouched.
        assert!((store.get_f64("gameProgress.currentPoints") - 5.0).abs() < 0.001);
    }

    #[test]
    fn load_state_broadcasts_once_with_star() {
        let mut store = Store::new();
        let paths = Rc::new(RefCell::new(Vec::new()));
        let sink = paths.clone();
        store.add_listener("gameProgress.currentPoints", move |_, _, path| {
            sink.borrow_mut().push(path.to_string());
        });
        store
            .load_state(&json!({"version": "1.0.0"}))
            .unwrap();
        assert_eq!(*paths.borrow(), vec!["*"]);
    }

    #[test]
    fn load_state_rederives_debug_mode() {
        let mut store = Store::new();
        store
            .load_state(&json!({
                "version": "1.0.0",
                "settings": { "debugMode": true }
            }))
            .unwrap();
        assert!(store.debug_mode());
        store.load_state(&json!({"version": "1.0.0"})).unwrap();
        assert!(!store.debug_mode());
    }

    #[test]
    fn load_state_normalizes_invariants() {
        let mut store = Store::new();
        store
            .load_state(&json!({
                "version": "1.0.0",
                "gameProgress": {
                    "unlockedStages": [3, 3, 2],
                    "currentStage": 5,
                    "currentPoints": -40.0
                }
            }))
            .unwrap();
        assert_eq!(store.unlocked_stages(), vec![1, 2, 3]);
        assert_eq!(store.get("gameProgress.currentStage"), Some(&json!(1)));
        assert!((store.get_f64("gameProgress.currentPoints") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_restores_defaults_and_broadcasts_once() {
        let mut store = Store::new();
        store.add_points(500.0);
        store.set("settings.debugMode", json!(true));
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        store.add_listener("*", move |_, _, _| {
            *sink.borrow_mut() += 1;
        });
        store.reset();
        assert_eq!(*count.borrow(), 1);
        assert!((store.get_f64("gameProgress.currentPoints") - 0.0).abs() < f64::EPSILON);
        assert!(!store.debug_mode());
    }

    #[test]
    fn save_class_policy_table() {
        assert_eq!(save_class("purchases.items.click_power"), SaveClass::Immediate);
        assert_eq!(save_class("collection.heroine.stage1"), SaveClass::Immediate);
        assert_eq!(save_class("gameProgress.unlockedStages"), SaveClass::Immediate);
        assert_eq!(save_class("gameProgress.currentStage"), SaveClass::Immediate);
        assert_eq!(save_class("settings.bgmVolume"), SaveClass::Immediate);
        assert_eq!(save_class("gameProgress.currentPoints"), SaveClass::Deferred);
        assert_eq!(save_class("gameProgress.totalCPS"), SaveClass::Deferred);
        // Prefix matching must not catch lookalike siblings.
        assert_eq!(save_class("settingsBackup.flag"), SaveClass::Deferred);
    }

    #[test]
    fn pending_save_keeps_strongest_class() {
        let mut store = Store::new();
        assert_eq!(store.take_pending_save(), None);
        store.add_points(1.0);
        assert_eq!(store.take_pending_save(), Some(SaveClass::Deferred));
        store.add_points(1.0);
        store.set("settings.seVolume", json!(0.8));
        store.add_points(1.0);
        assert_eq!(store.take_pending_save(), Some(SaveClass::Immediate));
        assert_eq!(store.take_pending_save(), None);
    }
}
