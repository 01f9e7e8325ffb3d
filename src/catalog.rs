//! Read-only catalog of shop items and stage definitions.
//!
//! The real game ships these as CSV data files; the core only needs the
//! lookup surface, so the built-in catalog is hardcoded in display order
//! the same way a data loader would hand it over.

/// What a shop item does when purchased.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    /// Adds to `gameProgress.totalClickBoost`.
    ClickBoost(f64),
    /// Adds to `gameProgress.totalCPS`.
    AutoPoints(f64),
}

/// A purchasable shop item.
#[derive(Clone, Debug)]
pub struct ItemDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    /// Progressive pricing factor: each owned copy multiplies the next cost.
    pub cost_multiplier: f64,
    pub effect: EffectKind,
}

impl ItemDef {
    /// Cost of the next copy given how many are already owned.
    pub fn price(&self, owned: u32) -> f64 {
        self.base_cost * self.cost_multiplier.powi(owned as i32)
    }
}

/// A stage and its collection targets.
#[derive(Clone, Debug)]
pub struct StageDef {
    pub stage: u32,
    pub name: &'static str,
    /// How many heroine images this stage holds.
    pub heroine_count: u32,
    /// Points required before the stage can be unlocked.
    pub unlock_cost: f64,
}

/// The stage/item definitions the core reads. Read-only.
pub struct Catalog {
    items: Vec<ItemDef>,
    stages: Vec<StageDef>,
}

impl Catalog {
    /// The built-in catalog: 5 stages of 10 images, and a small upgrade shop.
    pub fn builtin() -> Self {
        let items = vec![
            ItemDef {
                id: "click_power",
                name: "クリック強化",
                base_cost: 50.0,
                cost_multiplier: 1.15,
                effect: EffectKind::ClickBoost(1.0),
            },
            ItemDef {
                id: "click_power_plus",
                name: "クリック超強化",
                base_cost: 500.0,
                cost_multiplier: 1.15,
                effect: EffectKind::ClickBoost(5.0),
            },
            ItemDef {
                id: "auto_clicker",
                name: "オートクリッカー",
                base_cost: 100.0,
                cost_multiplier: 1.15,
                effect: EffectKind::AutoPoints(1.0),
            },
            ItemDef {
                id: "point_factory",
                name: "ポイント工場",
                base_cost: 1_200.0,
                cost_multiplier: 1.15,
                effect: EffectKind::AutoPoints(8.0),
            },
            ItemDef {
                id: "point_plant",
                name: "ポイントプラント",
                base_cost: 13_000.0,
                cost_multiplier: 1.15,
                effect: EffectKind::AutoPoints(47.0),
            },
        ];
        let stages = vec![
            StageDef { stage: 1, name: "ステージ1", heroine_count: 10, unlock_cost: 0.0 },
            StageDef { stage: 2, name: "ステージ2", heroine_count: 10, unlock_cost: 1_000.0 },
            StageDef { stage: 3, name: "ステージ3", heroine_count: 10, unlock_cost: 10_000.0 },
            StageDef { stage: 4, name: "ステージ4", heroine_count: 10, unlock_cost: 100_000.0 },
            StageDef { stage: 5, name: "ステージ5", heroine_count: 10, unlock_cost: 1_000_000.0 },
        ];
        Self { items, stages }
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[ItemDef] {
        &self.items
    }

    pub fn stage(&self, stage: u32) -> Option<&StageDef> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn stages(&self) -> &[StageDef] {
        &self.stages
    }

    /// Total heroine images across all stages.
    pub fn total_heroine_count(&self) -> u32 {
        self.stages.iter().map(|s| s.heroine_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_initial_price_is_base_cost() {
        let catalog = Catalog::builtin();
        let item = catalog.item("click_power").unwrap();
        assert!((item.price(0) - 50.0).abs() < 0.001);
    }

    #[test]
    fn price_scales_with_owned_count() {
        let catalog = Catalog::builtin();
        let item = catalog.item("auto_clicker").unwrap();
        let expected = 100.0 * 1.15_f64.powi(3);
        assert!((item.price(3) - expected).abs() < 0.01);
    }

    #[test]
    fn unknown_item_is_none() {
        assert!(Catalog::builtin().item("no_such_item").is_none());
    }

    #[test]
    fn stage_unlock_costs_ascend() {
        let catalog = Catalog::builtin();
        for pair in catalog.stages().windows(2) {
            assert!(pair[1].unlock_cost > pair[0].unlock_cost);
        }
        assert!(catalog.stages().iter().all(|s| !s.name.is_empty()));
        assert!(catalog.items().iter().all(|i| !i.name.is_empty()));
    }

    #[test]
    fn five_stages_of_ten() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.stages().len(), 5);
        assert_eq!(catalog.stage(1).unwrap().heroine_count, 10);
        assert_eq!(catalog.total_heroine_count(), 50);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_item_id() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("click_power"),
            Just("click_power_plus"),
            Just("auto_clicker"),
            Just("point_factory"),
            Just("point_plant"),
        ]
    }

    proptest! {
        #[test]
        fn prop_price_always_positive(id in arb_item_id(), owned in 0u32..200) {
            let catalog = Catalog::builtin();
            let item = catalog.item(id).unwrap();
            prop_assert!(item.price(owned) > 0.0);
        }

        #[test]
        fn prop_price_strictly_increases(id in arb_item_id(), owned in 0u32..199) {
            let catalog = Catalog::builtin();
            let item = catalog.item(id).unwrap();
            prop_assert!(item.price(owned + 1) > item.price(owned));
        }

        #[test]
        fn prop_price_ratio_is_multiplier(id in arb_item_id(), owned in 0u32..150) {
            let catalog = Catalog::builtin();
            let item = catalog.item(id).unwrap();
            let ratio = item.price(owned + 1) / item.price(owned);
            prop_assert!((ratio - item.cost_multiplier).abs() < 0.0001);
        }
    }
}
