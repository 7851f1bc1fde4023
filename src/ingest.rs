use std::collections::HashMap;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::formats::Product;

const BULLET_MARKERS: [&str; 2] = ["• ", "* "];

pub fn ingest(path: &Path) -> Result<Product> {
    let text = read_resource(path)?;
    let fields = parse_fields(&text);
    let product = product_from_fields(&fields)?;
    tracing::debug!(
        path = %path.display(),
        fields = fields.len(),
        product = %product.name,
        "ingested product"
    );
    Ok(product)
}

pub fn read_resource(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::ResourceNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Splits `Key: value` lines on the first colon. Lines without a colon are
/// ignored; a repeated key keeps its last value.
pub fn parse_fields(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = strip_bullets(key.trim());
        fields.insert(key.to_owned(), value.trim().to_owned());
    }
    fields
}

fn strip_bullets(key: &str) -> &str {
    let mut key = key.trim_start();
    'markers: loop {
        for marker in BULLET_MARKERS {
            if let Some(rest) = key.strip_prefix(marker) {
                key = rest.trim_start();
                continue 'markers;
            }
        }
        return key;
    }
}

pub fn product_from_fields(fields: &HashMap<String, String>) -> Result<Product> {
    let scalar = |key: &str| fields.get(key).cloned().unwrap_or_default();
    let list = |key: &str| fields.get(key).map(|v| split_list(v)).unwrap_or_default();

    let product = Product {
        name: scalar("Product Name"),
        concentration: scalar("Concentration"),
        skin_type: list("Skin Type"),
        key_ingredients: list("Key Ingredients"),
        benefits: list("Benefits"),
        how_to_use: scalar("How to Use"),
        side_effects: scalar("Side Effects"),
        price: scalar("Price"),
    };
    product.validate()?;
    Ok(product)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
