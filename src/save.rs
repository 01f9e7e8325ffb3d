//! Save/load manager.
//!
//! Persistence never throws at callers: every operation reports a
//! `{success, message}` outcome and the message is meant for a transient
//! UI toast. A failed load falls back to the backup copy and then to
//! defaults; the game always stays playable.
//!
//! Auto-save has three triggers: the periodic tick countdown (interval from
//! `settings.autoSaveInterval`), immediate-class store mutations drained via
//! [`Store::take_pending_save`], and lifecycle teardown through
//! [`SaveManager::flush_sync`]. Overlapping saves are prevented by a simple
//! in-progress flag; the losing caller is dropped with a non-success
//! outcome, not queued.

use log::{info, warn};
use serde_json::Value;

use crate::clock::TICKS_PER_SEC;
use crate::storage::StorageSink;
use crate::store::{SaveClass, Store};

/// Primary snapshot key.
pub const SAVE_KEY: &str = "stage_clicker_save";
/// Backup copy, also the target of the synchronous lifecycle flush.
pub const BACKUP_KEY: &str = "stage_clicker_save_backup";

/// Result of a persistence operation. `message` is user-facing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
}

impl SaveOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of a load attempt. `needs_refresh` tells subsystems that rendered
/// against pre-load defaults to re-read the store (the store's own `"*"`
/// broadcast carries the same signal to registered listeners).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOutcome {
    pub success: bool,
    pub message: String,
    pub needs_refresh: bool,
}

type Notifier = Box<dyn FnMut(&str, bool)>;

/// Serializes the store to a [`StorageSink`] and schedules auto-saves.
pub struct SaveManager<S: StorageSink> {
    storage: S,
    in_progress: bool,
    ticks_until_autosave: u32,
    last_interval: u32,
    notifier: Option<Notifier>,
}

impl<S: StorageSink> SaveManager<S> {
    pub fn new(storage: S) -> Self {
        let default_interval = crate::state::Settings::default().auto_save_interval;
        Self {
            storage,
            in_progress: false,
            ticks_until_autosave: default_interval * TICKS_PER_SEC,
            last_interval: default_interval,
            notifier: None,
        }
    }

    /// Install the transient-message callback `(message, success)` used for
    /// auto-save status toasts.
    pub fn set_notifier(&mut self, notifier: impl FnMut(&str, bool) + 'static) {
        self.notifier = Some(Box::new(notifier));
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // ── Manual save/load ──────────────────────────────────

    /// Serialize the full store snapshot to the sink. A call that overlaps
    /// an in-flight save observes "already in progress" and no-ops.
    pub fn save_game(&mut self, store: &mut Store) -> SaveOutcome {
        if self.in_progress {
            return SaveOutcome::fail("セーブ処理が進行中です");
        }
        self.in_progress = true;
        let outcome = self.write_snapshot(store);
        self.in_progress = false;
        outcome
    }

    fn write_snapshot(&mut self, store: &mut Store) -> SaveOutcome {
        store.set(
            "lastSaved",
            Value::from(chrono::Utc::now().to_rfc3339()),
        );
        let bytes = match serde_json::to_vec(&store.snapshot()) {
            Ok(b) => b,
            Err(e) => {
                warn!("failed to serialize save data: {e}");
                return SaveOutcome::fail(format!("セーブに失敗しました: {e}"));
            }
        };
        if let Err(e) = self.storage.write(SAVE_KEY, &bytes) {
            warn!("failed to write save: {e}");
            return SaveOutcome::fail(format!("セーブに失敗しました: {e}"));
        }
        // Backup failure is not fatal; the primary copy landed.
        if let Err(e) = self.storage.write(BACKUP_KEY, &bytes) {
            warn!("failed to write backup save: {e}");
        }
        SaveOutcome::ok("セーブしました")
    }

    /// Load the primary snapshot, falling back to the backup, falling back
    /// to defaults. Corrupt or versionless data is treated as absence.
    pub fn load_game(&mut self, store: &mut Store) -> LoadOutcome {
        if self.try_apply(store, SAVE_KEY) {
            return LoadOutcome {
                success: true,
                message: "セーブデータを読み込みました".to_string(),
                needs_refresh: true,
            };
        }
        if self.try_apply(store, BACKUP_KEY) {
            info!("primary save unusable, restored from backup");
            return LoadOutcome {
                success: true,
                message: "バックアップから復元しました".to_string(),
                needs_refresh: true,
            };
        }
        LoadOutcome {
            success: false,
            message: "セーブデータが見つかりません。新規データで開始します".to_string(),
            needs_refresh: false,
        }
    }

    /// Read one key and feed it through `load_state`. Any failure along the
    /// way (I/O, bad JSON, missing version) reads as "not usable".
    fn try_apply(&mut self, store: &mut Store, key: &str) -> bool {
        let bytes = match self.storage.read(key) {
            Ok(Some(b)) => b,
            Ok(None) => return false,
            Err(e) => {
                warn!("failed to read save key {key}: {e}");
                return false;
            }
        };
        let snapshot: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                warn!("save data under {key} is corrupt, ignoring: {e}");
                return false;
            }
        };
        match store.load_state(&snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!("save data under {key} rejected: {e}");
                false
            }
        }
    }

    // ── Auto-save ─────────────────────────────────────────

    /// Auto-save: a no-op when disabled in settings or when a save is in
    /// flight; otherwise delegates to `save_game` and pushes a themed
    /// status toast through the notifier.
    pub fn auto_save(&mut self, store: &mut Store) -> SaveOutcome {
        let enabled = store
            .get("settings.autoSaveEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if !enabled {
            return SaveOutcome::fail("オートセーブは無効です");
        }
        if self.in_progress {
            return SaveOutcome::fail("セーブ処理が進行中です");
        }
        let outcome = self.save_game(store);
        if let Some(notifier) = &mut self.notifier {
            let toast = if outcome.success {
                "オートセーブ完了"
            } else {
                "オートセーブ失敗"
            };
            notifier(toast, outcome.success);
        }
        outcome
    }

    /// Drive auto-save from the game loop. Immediate-class changes save on
    /// this pump; deferred changes (point counters) wait for the periodic
    /// countdown, which is restarted wholesale whenever the configured
    /// interval changes.
    pub fn pump(&mut self, store: &mut Store, delta_ticks: u32) -> Option<SaveOutcome> {
        let interval = store
            .get("settings.autoSaveInterval")
            .and_then(Value::as_u64)
            .unwrap_or(u64::from(self.last_interval)) as u32;
        if interval != self.last_interval {
            self.last_interval = interval;
            self.ticks_until_autosave = interval * TICKS_PER_SEC;
        }

        let pending = store.take_pending_save();
        if pending == Some(SaveClass::Immediate) {
            self.ticks_until_autosave = interval * TICKS_PER_SEC;
            return Some(self.auto_save(store));
        }

        self.ticks_until_autosave = self.ticks_until_autosave.saturating_sub(delta_ticks);
        if self.ticks_until_autosave == 0 {
            self.ticks_until_autosave = interval * TICKS_PER_SEC;
            return Some(self.auto_save(store));
        }
        None
    }

    /// Best-effort synchronous flush for lifecycle teardown (window blur,
    /// unload). Writes the backup key only; errors are logged and swallowed
    /// because there is no one left to show a toast to.
    pub fn flush_sync(&mut self, store: &Store) {
        match serde_json::to_vec(&store.snapshot()) {
            Ok(bytes) => {
                if let Err(e) = self.storage.write(BACKUP_KEY, &bytes) {
                    warn!("lifecycle flush failed: {e}");
                }
            }
            Err(e) => warn!("lifecycle flush could not serialize: {e}"),
        }
    }

    // ── Delete / export / import ──────────────────────────

    /// Remove both persisted copies, then reset the store to defaults.
    /// The only place persistence and state reset are coupled.
    pub fn delete_save(&mut self, store: &mut Store) -> SaveOutcome {
        let primary = self.storage.delete(SAVE_KEY);
        let backup = self.storage.delete(BACKUP_KEY);
        if let Err(e) = primary.and(backup) {
            warn!("failed to delete save: {e}");
            return SaveOutcome::fail(format!("セーブデータの削除に失敗しました: {e}"));
        }
        store.reset();
        SaveOutcome::ok("セーブデータを削除しました")
    }

    /// The store's serialized form, for writing to a user-chosen file.
    pub fn export_save(&self, store: &Store) -> String {
        serde_json::to_string_pretty(&store.snapshot()).expect("state tree serializes")
    }

    /// Validate-then-commit import of a serialized save. Nothing mutates
    /// until the payload passes the shape check.
    pub fn import_save(&mut self, store: &mut Store, payload: &str) -> SaveOutcome {
        let snapshot: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                warn!("import payload is not valid JSON: {e}");
                return SaveOutcome::fail("インポートデータの形式が不正です");
            }
        };
        if let Err(field) = validate_snapshot(&snapshot) {
            warn!("import payload rejected: bad field {field}");
            return SaveOutcome::fail(format!("インポートデータが不正です: {field}"));
        }
        if store.load_state(&snapshot).is_err() {
            // validate_snapshot already checked version; defensive only.
            return SaveOutcome::fail("インポートデータが不正です: version");
        }
        let saved = self.save_game(store);
        if !saved.success {
            return saved;
        }
        SaveOutcome::ok("セーブデータをインポートしました")
    }
}

/// Check the required top-level shape of an import payload. Returns the
/// dotted name of the first offending field.
fn validate_snapshot(snapshot: &Value) -> Result<(), String> {
    let root = snapshot.as_object().ok_or("(root)")?;

    let version = root.get("version").ok_or("version")?;
    if !version.is_string() {
        return Err("version".into());
    }

    let progress = root
        .get("gameProgress")
        .and_then(Value::as_object)
        .ok_or("gameProgress")?;
    for field in ["totalPoints", "currentPoints"] {
        if !progress.get(field).map(Value::is_number).unwrap_or(false) {
            return Err(format!("gameProgress.{field}"));
        }
    }
    let stages = progress
        .get("unlockedStages")
        .and_then(Value::as_array)
        .ok_or("gameProgress.unlockedStages")?;
    if !stages.iter().all(Value::is_number) {
        return Err("gameProgress.unlockedStages".into());
    }

    let collection = root
        .get("collection")
        .and_then(Value::as_object)
        .ok_or("collection")?;
    if !collection.get("heroine").map(Value::is_object).unwrap_or(false) {
        return Err("collection.heroine".into());
    }
    if !collection.get("videos").map(Value::is_array).unwrap_or(false) {
        return Err("collection.videos".into());
    }
    if !collection
        .get("currentDisplayImage")
        .map(Value::is_string)
        .unwrap_or(false)
    {
        return Err("collection.currentDisplayImage".into());
    }

    let purchases = root
        .get("purchases")
        .and_then(Value::as_object)
        .ok_or("purchases")?;
    let items = purchases
        .get("items")
        .and_then(Value::as_object)
        .ok_or("purchases.items")?;
    if !items.values().all(Value::is_number) {
        return Err("purchases.items".into());
    }

    let settings = root
        .get("settings")
        .and_then(Value::as_object)
        .ok_or("settings")?;
    for field in ["bgmVolume", "seVolume", "autoSaveInterval"] {
        if !settings.get(field).map(Value::is_number).unwrap_or(false) {
            return Err(format!("settings.{field}"));
        }
    }
    for field in ["autoSaveEnabled", "debugMode"] {
        if !settings.get(field).map(Value::is_boolean).unwrap_or(false) {
            return Err(format!("settings.{field}"));
        }
    }

    if !root.get("lastSaved").map(Value::is_string).unwrap_or(false) {
        return Err("lastSaved".into());
    }

    Ok(())
}
