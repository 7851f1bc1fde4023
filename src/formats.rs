use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// A product record as parsed from the input file.
///
/// Fields absent from a configured record deserialize as empty so that
/// `validate` reports them alongside every other missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(rename = "product_name")]
    pub name: String,
    pub concentration: String,
    pub skin_type: Vec<String>,
    pub key_ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub how_to_use: String,
    pub side_effects: String,
    pub price: String,
}

impl Product {
    pub fn validate(&self) -> Result<()> {
        let invalid = self.invalid_fields();
        if invalid.is_empty() {
            return Ok(());
        }
        Err(PipelineError::Validation {
            record: "product",
            fields: invalid,
        })
    }

    fn invalid_fields(&self) -> Vec<String> {
        let scalars = [
            ("product_name", &self.name),
            ("concentration", &self.concentration),
            ("how_to_use", &self.how_to_use),
            ("side_effects", &self.side_effects),
            ("price", &self.price),
        ];
        let lists = [
            ("skin_type", &self.skin_type),
            ("key_ingredients", &self.key_ingredients),
            ("benefits", &self.benefits),
        ];

        let mut invalid = Vec::new();
        for (field, value) in scalars {
            if value.trim().is_empty() {
                invalid.push(format!("{field} is missing or empty"));
            }
        }
        for (field, values) in lists {
            if values.iter().all(|v| v.trim().is_empty()) {
                invalid.push(format!("{field} must have at least one entry"));
            }
        }
        invalid
    }
}

/// The competing product shown next to the primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub comparison_name: String,
}

impl ComparisonProduct {
    pub fn validate(&self) -> Result<()> {
        let mut invalid = self.product.invalid_fields();
        if self.comparison_name.trim().is_empty() {
            invalid.push("comparison_name is missing or empty".to_owned());
        }
        if invalid.is_empty() {
            return Ok(());
        }
        Err(PipelineError::Validation {
            record: "comparison product",
            fields: invalid,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionCategory {
    Informational,
    Usage,
    Safety,
    Purchase,
}

/// Stable identity of a generated question, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionId {
    MainBenefits,
    ConcentrationComparison,
    MainActiveIngredient,
    HyaluronicAcidRole,
    SensitiveSkinSuitability,
    TwiceDaily,
    RoutinePlacement,
    DropsPerUse,
    UnderMakeup,
    WaitBeforeMoisturizer,
    TinglingMeaning,
    PregnancySafety,
    DrugInteractions,
    SevereTingling,
    PriceValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedQuestion {
    #[serde(skip)]
    pub id: QuestionId,
    pub category: QuestionCategory,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedContent {
    pub product_summary_block: String,
    pub user_questions: Vec<CategorizedQuestion>,
    pub faq_q_a_pairs: Vec<QuestionAnswer>,
}

#[cfg(test)]
pub(crate) fn sample_product() -> Product {
    Product {
        name: "GlowBoost Vitamin C Serum".to_owned(),
        concentration: "10% Vitamin C".to_owned(),
        skin_type: vec!["Oily".to_owned(), "Combination".to_owned()],
        key_ingredients: vec!["Vitamin C".to_owned(), "Hyaluronic Acid".to_owned()],
        benefits: vec!["Brightening".to_owned(), "Fades dark spots".to_owned()],
        how_to_use: "Apply 2-3 drops in the morning before sunscreen".to_owned(),
        side_effects: "Mild tingling for sensitive skin".to_owned(),
        price: "₹699".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_name_as_product_name() -> anyhow::Result<()> {
        let value = serde_json::to_value(sample_product())?;
        assert_eq!(value["product_name"], "GlowBoost Vitamin C Serum");
        assert!(value.get("name").is_none());
        Ok(())
    }

    #[test]
    fn validate_lists_every_invalid_field() {
        let mut product = sample_product();
        product.price = "  ".to_owned();
        product.benefits.clear();

        let err = product.validate().unwrap_err();
        match err {
            PipelineError::Validation { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert!(fields[0].starts_with("price"));
                assert!(fields[1].starts_with("benefits"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn comparison_product_flattens_product_fields() -> anyhow::Result<()> {
        let comparison = ComparisonProduct {
            product: sample_product(),
            comparison_name: "GlowBoost".to_owned(),
        };
        let value = serde_json::to_value(&comparison)?;
        assert_eq!(value["product_name"], "GlowBoost Vitamin C Serum");
        assert_eq!(value["comparison_name"], "GlowBoost");
        comparison.validate()?;
        Ok(())
    }

    #[test]
    fn question_id_is_not_serialized() -> anyhow::Result<()> {
        let question = CategorizedQuestion {
            id: QuestionId::PriceValue,
            category: QuestionCategory::Purchase,
            question: "Is it worth it?".to_owned(),
        };
        let value = serde_json::to_value(&question)?;
        assert_eq!(
            value,
            serde_json::json!({"category": "Purchase", "question": "Is it worth it?"})
        );
        Ok(())
    }
}
