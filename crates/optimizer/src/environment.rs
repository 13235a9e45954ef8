use catalog::Category;
use serde::{Deserialize, Serialize};

/// Average yearly CO2 absorption of one mature tree, in kilograms.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 21.77;

/// Per-cartridge manufacturing and logistics footprint.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFootprint {
    pub co2_kg: f64,
    pub plastic_kg: f64,
    pub shipping_kg: f64,
}

/// Laser toner cartridges: large plastic housings, heavy freight.
pub const TONER_FOOTPRINT: CategoryFootprint = CategoryFootprint {
    co2_kg: 4.8,
    plastic_kg: 0.91,
    shipping_kg: 1.36,
};

/// Inkjet cartridges: small housings, light freight.
pub const INK_FOOTPRINT: CategoryFootprint = CategoryFootprint {
    co2_kg: 1.2,
    plastic_kg: 0.07,
    shipping_kg: 0.11,
};

/// Uncategorized consumables get a conservative small footprint.
pub const OTHER_FOOTPRINT: CategoryFootprint = CategoryFootprint {
    co2_kg: 1.0,
    plastic_kg: 0.10,
    shipping_kg: 0.20,
};

pub fn footprint_for(category: Category) -> CategoryFootprint {
    match category {
        Category::Toner => TONER_FOOTPRINT,
        Category::Ink => INK_FOOTPRINT,
        Category::Other => OTHER_FOOTPRINT,
    }
}

/// Environmental benefit of avoiding some number of cartridges.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentalImpact {
    pub cartridges_avoided: u32,
    pub co2_kg: f64,
    pub plastic_kg: f64,
    pub shipping_kg: f64,
    /// Tree-years of CO2 absorption equivalent to `co2_kg`.
    pub trees: f64,
}

impl EnvironmentalImpact {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Component-wise accumulation, used by the batch aggregator.
    pub fn accumulate(&mut self, other: &EnvironmentalImpact) {
        self.cartridges_avoided += other.cartridges_avoided;
        self.co2_kg += other.co2_kg;
        self.plastic_kg += other.plastic_kg;
        self.shipping_kg += other.shipping_kg;
        self.trees += other.trees;
    }
}

/// Impact of avoiding `cartridges_avoided` units in the given category.
pub fn impact_for(category: Category, cartridges_avoided: u32) -> EnvironmentalImpact {
    let footprint = footprint_for(category);
    let n = f64::from(cartridges_avoided);
    let co2_kg = footprint.co2_kg * n;
    EnvironmentalImpact {
        cartridges_avoided,
        co2_kg,
        plastic_kg: footprint.plastic_kg * n,
        shipping_kg: footprint.shipping_kg * n,
        trees: co2_kg / TREE_ABSORPTION_KG_PER_YEAR,
    }
}
