use crate::error::Result;
use crate::formats::{ComparisonProduct, Product};

/// Produces the competing product from a configured record.
#[derive(Debug, Clone)]
pub struct CompetitorSynthesizer {
    record: ComparisonProduct,
}

impl CompetitorSynthesizer {
    pub fn new(record: ComparisonProduct) -> Self {
        Self { record }
    }

    /// The primary product is accepted so that a data-driven source can
    /// later vary the competitor per product; the configured record ignores it.
    pub fn synthesize(&self, _primary: &Product) -> Result<ComparisonProduct> {
        self.record.validate()?;
        Ok(self.record.clone())
    }
}

impl Default for CompetitorSynthesizer {
    fn default() -> Self {
        Self::new(default_competitor())
    }
}

pub fn default_competitor() -> ComparisonProduct {
    let name = "Radiance 12x Brightening Serum";
    ComparisonProduct {
        product: Product {
            name: name.to_owned(),
            concentration: "12% Niacinamide".to_owned(),
            skin_type: vec!["Dry".to_owned(), "Normal".to_owned()],
            key_ingredients: vec!["Niacinamide".to_owned(), "Ceramides".to_owned()],
            benefits: vec![
                "Texture smoothing".to_owned(),
                "Minimizes pores".to_owned(),
                "Hydration".to_owned(),
            ],
            how_to_use: "Apply a pea-sized amount to clean skin twice daily (morning and night)."
                .to_owned(),
            side_effects: "Slight redness for first-time users.".to_owned(),
            price: "₹999".to_owned(),
        },
        comparison_name: name.to_owned(),
    }
}
