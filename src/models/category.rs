//! Food category model
//!
//! The fixed set of grocery categories an item can belong to.

use serde::{Deserialize, Serialize};

/// Grocery category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FruitsVegetables,
    DairyEggs,
    MeatPoultry,
    Seafood,
    Bakery,
    PantryItems,
    FrozenFoods,
    Beverages,
    Snacks,
    CondimentsSauces,
    GrainsPasta,
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::FruitsVegetables,
        Category::DairyEggs,
        Category::MeatPoultry,
        Category::Seafood,
        Category::Bakery,
        Category::PantryItems,
        Category::FrozenFoods,
        Category::Beverages,
        Category::Snacks,
        Category::CondimentsSauces,
        Category::GrainsPasta,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FruitsVegetables => "fruits_vegetables",
            Category::DairyEggs => "dairy_eggs",
            Category::MeatPoultry => "meat_poultry",
            Category::Seafood => "seafood",
            Category::Bakery => "bakery",
            Category::PantryItems => "pantry_items",
            Category::FrozenFoods => "frozen_foods",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::CondimentsSauces => "condiments_sauces",
            Category::GrainsPasta => "grains_pasta",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::FruitsVegetables => "Fruits & Vegetables",
            Category::DairyEggs => "Dairy & Eggs",
            Category::MeatPoultry => "Meat & Poultry",
            Category::Seafood => "Seafood",
            Category::Bakery => "Bakery",
            Category::PantryItems => "Pantry Items",
            Category::FrozenFoods => "Frozen Foods",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::CondimentsSauces => "Condiments & Sauces",
            Category::GrainsPasta => "Grains & Pasta",
            Category::Other => "Other",
        }
    }

    /// Parse either the storage key ("dairy_eggs") or the display name ("Dairy & Eggs").
    ///
    /// Unknown input yields `None`; callers decide whether that is a validation failure.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .replace('&', " ")
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|part| !part.is_empty() && *part != "and")
            .collect::<Vec<_>>()
            .join("_");

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_keys_and_display_names() {
        assert_eq!(Category::from_str("dairy_eggs"), Some(Category::DairyEggs));
        assert_eq!(Category::from_str("Dairy & Eggs"), Some(Category::DairyEggs));
        assert_eq!(Category::from_str("condiments and sauces"), Some(Category::CondimentsSauces));
        assert_eq!(Category::from_str("Seafood"), Some(Category::Seafood));
        assert_eq!(Category::from_str("Frozen-Foods"), Some(Category::FrozenFoods));
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(Category::from_str("sweets"), None);
        assert_eq!(Category::from_str(""), None);
    }

    #[test]
    fn test_every_key_round_trips() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
            assert_eq!(Category::from_str(category.display_name()), Some(category));
        }
    }
}
