//! State core for an idle stage-clicker game.
//!
//! The game around this crate is a click-for-points loop with a shop,
//! stage-gated image collection and scene navigation; rendering, audio and
//! the platform shell live elsewhere. What this crate owns:
//!
//! - [`Store`]: the reactive game-state tree. Dotted-path get/set, exact
//!   and wildcard change listeners, and the domain mutations (points,
//!   purchases, stage unlocks, collection).
//! - [`SaveManager`]: persistence over a pluggable [`StorageSink`].
//!   Save/load with backup fallback, auto-save (periodic + immediate-class
//!   changes + lifecycle flush), delete, export/import.
//! - [`Catalog`]: read-only stage/item definitions with progressive
//!   pricing.
//! - [`GameClock`]: fixed-timestep tick source for idle income and the
//!   auto-save countdown.
//!
//! A host wires them together roughly like this:
//!
//! ```
//! use stage_clicker_core::{Catalog, GameClock, MemoryStorage, SaveManager, Store};
//!
//! let catalog = Catalog::builtin();
//! let mut store = Store::new();
//! let mut saves = SaveManager::new(MemoryStorage::new());
//! let mut clock = GameClock::new();
//!
//! saves.load_game(&mut store);
//! // per frame:
//! let ticks = clock.update(16.7);
//! store.accrue(GameClock::ticks_to_seconds(ticks));
//! saves.pump(&mut store, ticks);
//! // on click:
//! store.click();
//! ```

pub mod catalog;
pub mod clock;
pub mod path;
pub mod save;
pub mod state;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, EffectKind, ItemDef, StageDef};
pub use clock::{GameClock, TICKS_PER_SEC};
pub use save::{LoadOutcome, SaveManager, SaveOutcome, BACKUP_KEY, SAVE_KEY};
pub use state::{GameState, STATE_VERSION};
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageSink};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use store::{CollectionProgress, ListenerId, SaveClass, StateError, Store};
