use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of waste categories the classifier can output.
///
/// The declaration order matches the class order of the trained model, so
/// index `i` of the raw score vector corresponds to `Category::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Glass,
    Metal,
    Organic,
    Plastic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Glass,
        Category::Metal,
        Category::Organic,
        Category::Plastic,
    ];

    /// Lowercase label, as stored in the counter collection.
    pub fn name(self) -> &'static str {
        match self {
            Category::Glass => "glass",
            Category::Metal => "metal",
            Category::Organic => "organic",
            Category::Plastic => "plastic",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Category for a raw score-vector index.
    pub fn from_index(index: usize) -> Option<Category> {
        Category::ALL.get(index).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single classification outcome. Transient: rendered once, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub category: Category,
    /// Probability of the chosen category, as a percentage in [0, 100].
    pub confidence: f32,
}

impl Prediction {
    /// Caption shown under the image preview.
    pub fn caption(&self) -> String {
        format!("Prediction: {} ({:.2}%)", self.category, self.confidence)
    }

    /// Success banner text.
    pub fn message(&self) -> String {
        format!(
            "This looks like {} waste.",
            self.category.name().to_uppercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.name()), Some(category));
        }
        assert_eq!(Category::from_name("cardboard"), None);
    }

    #[test]
    fn index_follows_declaration_order() {
        assert_eq!(Category::from_index(0), Some(Category::Glass));
        assert_eq!(Category::from_index(3), Some(Category::Plastic));
        assert_eq!(Category::from_index(4), None);
    }

    #[test]
    fn caption_format() {
        let prediction = Prediction {
            category: Category::Glass,
            confidence: 92.5,
        };
        assert_eq!(prediction.caption(), "Prediction: glass (92.50%)");
        assert_eq!(prediction.message(), "This looks like GLASS waste.");
    }
}
