use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};
use crate::formats::{ComparisonProduct, GeneratedContent, Product};

const PRODUCT_TEMPLATE: &str = include_str!("../templates/product_page.json");
const FAQ_TEMPLATE: &str = include_str!("../templates/faq.json");
const COMPARISON_TEMPLATE: &str = include_str!("../templates/comparison_page.json");

const DATE_TOKEN: &str = "current_date";
const DEFAULT_LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Product,
    Faq,
    ComparisonTable,
}

impl PageKind {
    /// Assembly and write order.
    pub const ALL: [PageKind; 3] = [PageKind::Faq, PageKind::Product, PageKind::ComparisonTable];

    pub fn page_type(self) -> &'static str {
        match self {
            PageKind::Product => "product",
            PageKind::Faq => "faq",
            PageKind::ComparisonTable => "comparison_table",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            PageKind::Product => "product_page.json",
            PageKind::Faq => "faq.json",
            PageKind::ComparisonTable => "comparison_page.json",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub document: Value,
}

#[derive(Debug, Clone)]
pub struct PageTemplates {
    product: Value,
    faq: Value,
    comparison: Value,
}

impl PageTemplates {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            product: parse_template(PageKind::Product, PRODUCT_TEMPLATE)?,
            faq: parse_template(PageKind::Faq, FAQ_TEMPLATE)?,
            comparison: parse_template(PageKind::ComparisonTable, COMPARISON_TEMPLATE)?,
        })
    }

    /// Loads `product_page.json`, `faq.json` and `comparison_page.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |kind: PageKind| -> Result<Value> {
            let path = dir.join(kind.file_name());
            let text = std::fs::read_to_string(&path).map_err(|err| {
                PipelineError::template(
                    kind.file_name(),
                    format!("read {}: {err}", path.display()),
                )
            })?;
            parse_template(kind, &text)
        };
        Ok(Self {
            product: load(PageKind::Product)?,
            faq: load(PageKind::Faq)?,
            comparison: load(PageKind::ComparisonTable)?,
        })
    }

    pub fn get(&self, kind: PageKind) -> &Value {
        match kind {
            PageKind::Product => &self.product,
            PageKind::Faq => &self.faq,
            PageKind::ComparisonTable => &self.comparison,
        }
    }
}

fn parse_template(kind: PageKind, text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|err| PipelineError::template(kind.file_name(), format!("parse json: {err}")))
}

/// Resolves placeholder tokens and structural anchors for every page.
#[derive(Debug)]
pub struct Assembler<'a> {
    primary: &'a Product,
    competitor: &'a ComparisonProduct,
    content: &'a GeneratedContent,
    fields: HashMap<String, String>,
    date: String,
}

impl<'a> Assembler<'a> {
    pub fn new(
        primary: &'a Product,
        competitor: &'a ComparisonProduct,
        content: &'a GeneratedContent,
        date: NaiveDate,
    ) -> Result<Self> {
        let mut fields = HashMap::new();
        register_record(&mut fields, "product_data", primary)?;
        register_record(&mut fields, "product_b_data", competitor)?;
        register_record(&mut fields, "content_data", content)?;

        Ok(Self {
            primary,
            competitor,
            content,
            fields,
            date: date.format("%Y-%m-%d").to_string(),
        })
    }

    pub fn assemble_all(&self, templates: &PageTemplates) -> Result<Vec<Page>> {
        PageKind::ALL
            .iter()
            .map(|&kind| self.assemble(kind, templates.get(kind)))
            .collect()
    }

    pub fn assemble(&self, kind: PageKind, template: &Value) -> Result<Page> {
        let name = kind.file_name();
        let page_type = template.get("page_type").and_then(Value::as_str);
        if page_type != Some(kind.page_type()) {
            return Err(PipelineError::template(
                name,
                format!(
                    "page_type must be {:?}, found {:?}",
                    kind.page_type(),
                    page_type.unwrap_or("<missing>")
                ),
            ));
        }

        // Only tokens written in the template count; substituted product text
        // and patched content may contain braces of their own.
        let mut document = template.clone();
        let mut unresolved = Vec::new();
        self.resolve_tokens(&mut document, &mut unresolved);
        if !unresolved.is_empty() {
            unresolved.sort();
            unresolved.dedup();
            return Err(PipelineError::template(
                name,
                format!("unresolved placeholders: {}", unresolved.join(", ")),
            ));
        }

        match kind {
            PageKind::Faq => self.patch_faq(&mut document)?,
            PageKind::ComparisonTable => self.patch_comparison(&mut document)?,
            PageKind::Product => {}
        }

        Ok(Page { kind, document })
    }

    fn resolve_tokens(&self, value: &mut Value, unresolved: &mut Vec<String>) {
        match value {
            Value::String(text) => {
                if text.contains("{{") {
                    *text = self.substitute(text, unresolved);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.resolve_tokens(item, unresolved);
                }
            }
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    key_tokens(key, unresolved);
                    self.resolve_tokens(item, unresolved);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    /// Replaces every known `{{key}}` in `text`. Unknown or unclosed tokens
    /// are kept verbatim and reported through `unresolved`.
    fn substitute(&self, text: &str, unresolved: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0usize;

        while let Some(rel) = text[cursor..].find("{{") {
            let start = cursor + rel;
            let Some(close_rel) = text[start + 2..].find("}}") else {
                unresolved.push(text[start..].to_owned());
                break;
            };
            let end = start + 2 + close_rel + 2;
            let key = &text[start + 2..end - 2];

            out.push_str(&text[cursor..start]);
            match self.lookup(key) {
                Some(value) => out.push_str(value),
                None => {
                    unresolved.push(text[start..end].to_owned());
                    out.push_str(&text[start..end]);
                }
            }
            cursor = end;
        }

        out.push_str(&text[cursor..]);
        out
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        if key == DATE_TOKEN {
            return Some(&self.date);
        }
        self.fields.get(key).map(String::as_str)
    }

    fn patch_faq(&self, document: &mut Value) -> Result<()> {
        let name = PageKind::Faq.file_name();
        let questions = to_json(name, &self.content.user_questions)?;
        let qa_pairs = to_json(name, &self.content.faq_q_a_pairs)?;

        let blocks = document
            .get_mut("content_blocks")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| PipelineError::template(name, "missing content_blocks array"))?;

        block_by_type(name, blocks, "questions_for_planning")?
            .insert("questions".to_owned(), questions);
        block_by_type(name, blocks, "published_qa_list")?.insert("qa_pairs".to_owned(), qa_pairs);
        Ok(())
    }

    fn patch_comparison(&self, document: &mut Value) -> Result<()> {
        let name = PageKind::ComparisonTable.file_name();
        let competitor = &self.competitor.product;

        let points = document
            .get_mut("comparison_points")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| PipelineError::template(name, "missing comparison_points array"))?;

        let rows = [
            (0, &self.primary.key_ingredients, &competitor.key_ingredients),
            (2, &self.primary.benefits, &competitor.benefits),
        ];
        for (index, primary, other) in rows {
            let point = points
                .get_mut(index)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| {
                    PipelineError::template(
                        name,
                        format!("comparison_points[{index}] must be an object"),
                    )
                })?;
            point.insert("primary".to_owned(), first_value(primary));
            point.insert("competitor".to_owned(), first_value(other));
        }
        Ok(())
    }
}

fn block_by_type<'v>(
    template: &str,
    blocks: &'v mut [Value],
    block_type: &str,
) -> Result<&'v mut Map<String, Value>> {
    blocks
        .iter_mut()
        .filter_map(Value::as_object_mut)
        .find(|block| block.get("block_type").and_then(Value::as_str) == Some(block_type))
        .ok_or_else(|| {
            PipelineError::template(template, format!("missing block_type {block_type:?}"))
        })
}

fn first_value(values: &[String]) -> Value {
    Value::String(values.first().cloned().unwrap_or_default())
}

fn to_json<T: Serialize>(template: &str, value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| PipelineError::template(template, format!("serialize content: {err}")))
}

/// Flattens `record` into `namespace.field` entries. List fields are joined
/// with `"; "` and additionally registered as `namespace.field_str`.
fn register_record<T: Serialize>(
    fields: &mut HashMap<String, String>,
    namespace: &str,
    record: &T,
) -> Result<()> {
    let Value::Object(map) = to_json(namespace, record)? else {
        return Err(PipelineError::template(namespace, "record must serialize to an object"));
    };

    for (field, value) in map {
        match value {
            Value::String(text) => {
                fields.insert(format!("{namespace}.{field}"), strip_quotes(&text));
            }
            Value::Number(number) => {
                fields.insert(format!("{namespace}.{field}"), number.to_string());
            }
            Value::Bool(flag) => {
                fields.insert(format!("{namespace}.{field}"), flag.to_string());
            }
            Value::Array(items) => {
                let Some(items) = items
                    .iter()
                    .map(Value::as_str)
                    .collect::<Option<Vec<_>>>()
                else {
                    continue;
                };
                fields.insert(
                    format!("{namespace}.{field}"),
                    strip_quotes(&items.join(DEFAULT_LIST_SEPARATOR)),
                );
                fields.insert(
                    format!("{namespace}.{field}_str"),
                    strip_quotes(&items.join(list_separator(&field))),
                );
            }
            Value::Null | Value::Object(_) => {}
        }
    }
    Ok(())
}

fn list_separator(field: &str) -> &'static str {
    match field {
        "skin_type" | "key_ingredients" => ", ",
        _ => DEFAULT_LIST_SEPARATOR,
    }
}

fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

/// Object keys are never substituted, so any token in one is unresolved.
fn key_tokens(key: &str, unresolved: &mut Vec<String>) {
    let mut cursor = 0usize;
    while let Some(rel) = key[cursor..].find("{{") {
        let start = cursor + rel;
        let end = key[start..]
            .find("}}")
            .map_or(key.len(), |close| start + close + 2);
        unresolved.push(key[start..end].to_owned());
        cursor = end;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::competitor::default_competitor;
    use crate::content;
    use crate::formats::sample_product;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn assemble_builtin() -> anyhow::Result<Vec<Page>> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;
        Ok(assembler.assemble_all(&PageTemplates::builtin()?)?)
    }

    fn page(pages: &[Page], kind: PageKind) -> &Value {
        &pages
            .iter()
            .find(|p| p.kind == kind)
            .expect("page present")
            .document
    }

    #[test]
    fn builtin_pages_have_no_placeholders() -> anyhow::Result<()> {
        let pages = assemble_builtin()?;
        assert_eq!(
            pages.iter().map(|p| p.kind).collect::<Vec<_>>(),
            PageKind::ALL.to_vec()
        );
        for page in &pages {
            let text = serde_json::to_string(&page.document)?;
            assert!(!text.contains("{{"), "{:?} has placeholders", page.kind);
            assert_eq!(page.document["generated_on"], "2026-10-19");
            assert_eq!(page.document["page_type"], page.kind.page_type());
        }
        Ok(())
    }

    #[test]
    fn product_page_uses_list_join_variants() -> anyhow::Result<()> {
        let pages = assemble_builtin()?;
        let product = page(&pages, PageKind::Product);
        let details = &product["content_blocks"][1];
        assert_eq!(details["skin_type"], "Oily, Combination");
        assert_eq!(details["key_ingredients"], "Vitamin C, Hyaluronic Acid");
        assert_eq!(details["benefits"], "Brightening; Fades dark spots");
        assert_eq!(
            product["hero"]["tagline"],
            "10% Vitamin C for Oily, Combination skin"
        );
        Ok(())
    }

    #[test]
    fn faq_blocks_receive_questions_and_answers() -> anyhow::Result<()> {
        let pages = assemble_builtin()?;
        let faq = page(&pages, PageKind::Faq);
        let questions = faq["content_blocks"][1]["questions"]
            .as_array()
            .expect("questions array");
        let qa_pairs = faq["content_blocks"][2]["qa_pairs"]
            .as_array()
            .expect("qa array");
        assert_eq!(questions.len(), 15);
        assert_eq!(qa_pairs.len(), 6);
        assert_eq!(questions[0]["category"], "Informational");
        assert_eq!(qa_pairs[0]["question"], questions[0]["question"]);
        Ok(())
    }

    #[test]
    fn comparison_points_get_first_ingredient_and_benefit() -> anyhow::Result<()> {
        let pages = assemble_builtin()?;
        let comparison = page(&pages, PageKind::ComparisonTable);
        let points = &comparison["comparison_points"];
        assert_eq!(points[0]["primary"], "Vitamin C");
        assert_eq!(points[0]["competitor"], "Niacinamide");
        assert_eq!(points[2]["primary"], "Brightening");
        assert_eq!(points[2]["competitor"], "Texture smoothing");
        assert_eq!(points[3]["competitor"], "Dry, Normal");
        assert_eq!(
            comparison["title"],
            "GlowBoost Vitamin C Serum vs Radiance 12x Brightening Serum"
        );
        Ok(())
    }

    #[test]
    fn template_key_order_is_preserved() -> anyhow::Result<()> {
        let pages = assemble_builtin()?;
        let keys = page(&pages, PageKind::Product)
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["page_type", "generated_on", "title", "hero", "content_blocks"]
        );
        Ok(())
    }

    #[test]
    fn quotes_are_stripped_from_values() -> anyhow::Result<()> {
        let mut primary = sample_product();
        primary.name = "The \"Glow\" Serum".to_owned();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let page = assembler.assemble(
            PageKind::Product,
            &json!({"page_type": "product", "title": "{{product_data.product_name}}"}),
        )?;
        assert_eq!(page.document["title"], "The Glow Serum");
        Ok(())
    }

    #[test]
    fn tokens_only_resolve_inside_string_values() -> anyhow::Result<()> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let err = assembler
            .assemble(
                PageKind::Product,
                &json!({"page_type": "product", "{{product_data.price}}": "x"}),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::TemplateIntegrity { .. }));
        Ok(())
    }

    #[test]
    fn unknown_placeholder_is_an_integrity_error() -> anyhow::Result<()> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let err = assembler
            .assemble(
                PageKind::Product,
                &json!({
                    "page_type": "product",
                    "title": "{{product_data.colour}} {{current_date}}"
                }),
            )
            .unwrap_err();
        match err {
            PipelineError::TemplateIntegrity { reason, .. } => {
                assert!(reason.contains("{{product_data.colour}}"));
                assert!(!reason.contains("current_date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn braces_in_product_text_are_not_placeholders() -> anyhow::Result<()> {
        let mut primary = sample_product();
        primary.name = "Glow {{Max}} Serum".to_owned();
        primary.benefits = vec!["{{unclosed".to_owned()];
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let pages = assembler.assemble_all(&PageTemplates::builtin()?)?;
        assert_eq!(page(&pages, PageKind::Product)["title"], "Glow {{Max}} Serum");
        assert_eq!(
            page(&pages, PageKind::ComparisonTable)["comparison_points"][2]["primary"],
            "{{unclosed"
        );
        let faq = page(&pages, PageKind::Faq);
        assert_eq!(
            faq["content_blocks"][1]["questions"][0]["question"],
            "What are the main benefits of Glow {{Max}} Serum?"
        );
        Ok(())
    }

    #[test]
    fn unclosed_template_token_is_an_integrity_error() -> anyhow::Result<()> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let err = assembler
            .assemble(
                PageKind::Product,
                &json!({
                    "page_type": "product",
                    "title": "{{product_data.price}} {{product_data"
                }),
            )
            .unwrap_err();
        match err {
            PipelineError::TemplateIntegrity { reason, .. } => {
                assert!(reason.ends_with("unresolved placeholders: {{product_data"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn missing_structural_anchors_are_integrity_errors() -> anyhow::Result<()> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let faq = json!({
            "page_type": "faq",
            "content_blocks": [{"block_type": "questions_for_planning"}]
        });
        assert!(matches!(
            assembler.assemble(PageKind::Faq, &faq),
            Err(PipelineError::TemplateIntegrity { .. })
        ));

        let comparison = json!({
            "page_type": "comparison_table",
            "comparison_points": [{}, {}]
        });
        assert!(matches!(
            assembler.assemble(PageKind::ComparisonTable, &comparison),
            Err(PipelineError::TemplateIntegrity { .. })
        ));
        Ok(())
    }

    #[test]
    fn page_type_mismatch_is_an_integrity_error() -> anyhow::Result<()> {
        let primary = sample_product();
        let competitor = default_competitor();
        let generated = content::generate(&primary)?;
        let assembler = Assembler::new(&primary, &competitor, &generated, date())?;

        let err = assembler
            .assemble(PageKind::Faq, &json!({"page_type": "product"}))
            .unwrap_err();
        assert!(matches!(err, PipelineError::TemplateIntegrity { .. }));
        Ok(())
    }

    #[test]
    fn templates_load_from_directory() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        std::fs::write(temp.path().join("product_page.json"), PRODUCT_TEMPLATE)?;
        std::fs::write(temp.path().join("faq.json"), FAQ_TEMPLATE)?;
        std::fs::write(
            temp.path().join("comparison_page.json"),
            COMPARISON_TEMPLATE,
        )?;

        let templates = PageTemplates::from_dir(temp.path())?;
        assert_eq!(
            templates.get(PageKind::Faq),
            PageTemplates::builtin()?.get(PageKind::Faq)
        );

        std::fs::remove_file(temp.path().join("faq.json"))?;
        assert!(matches!(
            PageTemplates::from_dir(temp.path()),
            Err(PipelineError::TemplateIntegrity { .. })
        ));
        Ok(())
    }
}
