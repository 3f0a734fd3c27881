//! The closed set of verb categories a worker reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six categories in a worker's `detailed_counts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Past,
    Present,
    Future,
    Base,
    Gerund,
    Participle,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Past,
        Category::Present,
        Category::Future,
        Category::Base,
        Category::Gerund,
        Category::Participle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Past => "past",
            Category::Present => "present",
            Category::Future => "future",
            Category::Base => "base",
            Category::Gerund => "gerund",
            Category::Participle => "participle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count per category. Deserialization requires every key and rejects
/// unknown ones; `u64` rejects negative values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryCounts {
    pub past: u64,
    pub present: u64,
    pub future: u64,
    pub base: u64,
    pub gerund: u64,
    pub participle: u64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Past => self.past,
            Category::Present => self.present,
            Category::Future => self.future,
            Category::Base => self.base,
            Category::Gerund => self.gerund,
            Category::Participle => self.participle,
        }
    }

    fn slot(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Past => &mut self.past,
            Category::Present => &mut self.present,
            Category::Future => &mut self.future,
            Category::Base => &mut self.base,
            Category::Gerund => &mut self.gerund,
            Category::Participle => &mut self.participle,
        }
    }

    /// Sum across all categories (saturating).
    pub fn sum(&self) -> u64 {
        Category::ALL
            .iter()
            .fold(0u64, |acc, &c| acc.saturating_add(self.get(c)))
    }

    /// Adds `other` into `self`, category by category (saturating).
    pub fn add(&mut self, other: &CategoryCounts) {
        for c in Category::ALL {
            let slot = self.slot(c);
            *slot = slot.saturating_add(other.get(c));
        }
    }

    /// `(category, count)` pairs in the fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_six_keys() {
        let json = r#"{"past":5,"present":5,"future":1,"base":2,"gerund":3,"participle":4}"#;
        let c: CategoryCounts = serde_json::from_str(json).unwrap();
        assert_eq!(c.get(Category::Past), 5);
        assert_eq!(c.get(Category::Participle), 4);
        assert_eq!(c.sum(), 20);
    }

    #[test]
    fn unknown_key_rejected() {
        let json = r#"{"past":1,"present":0,"future":0,"base":0,"gerund":0,"participle":0,"modal":3}"#;
        assert!(serde_json::from_str::<CategoryCounts>(json).is_err());
    }

    #[test]
    fn missing_key_rejected() {
        let json = r#"{"past":1,"present":0,"future":0}"#;
        assert!(serde_json::from_str::<CategoryCounts>(json).is_err());
    }

    #[test]
    fn negative_count_rejected() {
        let json = r#"{"past":-1,"present":0,"future":0,"base":0,"gerund":0,"participle":0}"#;
        assert!(serde_json::from_str::<CategoryCounts>(json).is_err());
    }

    #[test]
    fn add_accumulates_per_category() {
        let mut a = CategoryCounts {
            past: 1,
            gerund: 2,
            ..Default::default()
        };
        a.add(&CategoryCounts {
            past: 4,
            future: 3,
            ..Default::default()
        });
        assert_eq!(a.past, 5);
        assert_eq!(a.future, 3);
        assert_eq!(a.gerund, 2);
        assert_eq!(a.sum(), 10);
    }

    #[test]
    fn iter_follows_fixed_order() {
        let names: Vec<&str> = CategoryCounts::default()
            .iter()
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(
            names,
            ["past", "present", "future", "base", "gerund", "participle"]
        );
    }
}
