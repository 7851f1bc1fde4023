use crate::error::{PipelineError, Result};
use crate::formats::{
    CategorizedQuestion, GeneratedContent, Product, QuestionAnswer, QuestionCategory, QuestionId,
};

const FALLBACK_BENEFIT: &str = "radiance";

/// Answered questions, in answer order, with the position each one holds in
/// the generated question list and the rule that writes its answer.
const ANSWERED: [(QuestionId, usize, fn(&Product) -> String); 6] = [
    (QuestionId::MainBenefits, 0, answer_main_benefits),
    (QuestionId::ConcentrationComparison, 1, answer_concentration),
    (QuestionId::MainActiveIngredient, 2, answer_active_ingredient),
    (QuestionId::TwiceDaily, 5, answer_twice_daily),
    (QuestionId::DrugInteractions, 12, answer_drug_interactions),
    (QuestionId::RoutinePlacement, 6, answer_routine_placement),
];

/// Smallest question list `faq_answers` accepts.
pub const MIN_QUESTIONS: usize = 13;

pub fn generate(product: &Product) -> Result<GeneratedContent> {
    let product_summary_block = summary(product);
    let user_questions = categorized_questions(product);
    let faq_q_a_pairs = faq_answers(&user_questions, product)?;

    tracing::debug!(
        questions = user_questions.len(),
        qa_pairs = faq_q_a_pairs.len(),
        "generated content"
    );

    Ok(GeneratedContent {
        product_summary_block,
        user_questions,
        faq_q_a_pairs,
    })
}

pub fn summary(product: &Product) -> String {
    let top_benefit = product
        .benefits
        .first()
        .map(|b| b.to_lowercase())
        .unwrap_or_else(|| FALLBACK_BENEFIT.to_owned());
    let skin_types = product.skin_type.join(", ");

    format!(
        "Introducing the **{name}**, a powerful solution featuring **{concentration}** of pure \
         active ingredient. Specifically formulated for {skin_types} skin types, this serum is \
         expertly designed to deliver rapid results, focusing on **{top_benefit}**.",
        name = product.name,
        concentration = product.concentration,
    )
}

pub fn categorized_questions(product: &Product) -> Vec<CategorizedQuestion> {
    use QuestionCategory::{Informational, Purchase, Safety, Usage};
    use QuestionId::*;

    let name = &product.name;
    let concentration = &product.concentration;
    let ingredient = first_or_empty(&product.key_ingredients);
    let price = &product.price;

    let questions = [
        (
            MainBenefits,
            Informational,
            format!("What are the main benefits of {name}?"),
        ),
        (
            ConcentrationComparison,
            Informational,
            format!("How does the {concentration} concentration compare to others?"),
        ),
        (
            MainActiveIngredient,
            Informational,
            format!("Is {ingredient} the main active ingredient?"),
        ),
        (
            HyaluronicAcidRole,
            Informational,
            "What is the primary function of Hyaluronic Acid in this serum?".to_owned(),
        ),
        (
            SensitiveSkinSuitability,
            Informational,
            "Is this product suitable for sensitive skin?".to_owned(),
        ),
        (TwiceDaily, Usage, "Can I apply this serum twice a day?".to_owned()),
        (
            RoutinePlacement,
            Usage,
            format!("When in my routine should I apply the {name}?"),
        ),
        (
            DropsPerUse,
            Usage,
            "How many drops should I use for optimal results?".to_owned(),
        ),
        (UnderMakeup, Usage, "Can I use this serum under makeup?".to_owned()),
        (
            WaitBeforeMoisturizer,
            Usage,
            "Should I wait after applying it before using moisturizer?".to_owned(),
        ),
        (
            TinglingMeaning,
            Safety,
            "What does 'mild tingling' mean for sensitive skin?".to_owned(),
        ),
        (
            PregnancySafety,
            Safety,
            "Is this product safe for pregnant or nursing individuals?".to_owned(),
        ),
        (
            DrugInteractions,
            Safety,
            "Are there any known drug interactions with this serum?".to_owned(),
        ),
        (
            SevereTingling,
            Safety,
            "What should I do if the tingling is severe?".to_owned(),
        ),
        (
            PriceValue,
            Purchase,
            format!("Is the {price} price point reflective of the quality?"),
        ),
    ];

    questions
        .into_iter()
        .map(|(id, category, question)| CategorizedQuestion {
            id,
            category,
            question,
        })
        .collect()
}

/// Answers a fixed selection of `questions`, looked up by identifier.
pub fn faq_answers(
    questions: &[CategorizedQuestion],
    product: &Product,
) -> Result<Vec<QuestionAnswer>> {
    if questions.len() < MIN_QUESTIONS {
        return Err(PipelineError::IndexOutOfRange {
            required: MIN_QUESTIONS,
            available: questions.len(),
        });
    }

    ANSWERED
        .iter()
        .map(|&(id, position, answer)| {
            let source = questions.iter().find(|q| q.id == id).ok_or(
                PipelineError::IndexOutOfRange {
                    required: position + 1,
                    available: questions.len(),
                },
            )?;
            Ok(QuestionAnswer {
                question: source.question.clone(),
                answer: answer(product),
            })
        })
        .collect()
}

fn answer_main_benefits(product: &Product) -> String {
    format!(
        "The main benefits include **{}** and helping to **fade dark spots**, resulting in a \
         more even complexion.",
        first_or_empty(&product.benefits)
    )
}

fn answer_concentration(product: &Product) -> String {
    format!(
        "At **{}**, it delivers a potent dose optimized for efficacy while minimizing \
         irritation, making it ideal for regular use.",
        product.concentration
    )
}

fn answer_active_ingredient(product: &Product) -> String {
    let mut answer = format!(
        "Yes, **{}** is the primary active for brightening.",
        first_or_empty(&product.key_ingredients)
    );
    if let Some(second) = product.key_ingredients.get(1) {
        answer.push_str(&format!(" It is complemented by **{second}** for hydration."));
    }
    answer
}

fn answer_twice_daily(product: &Product) -> String {
    format!(
        "The recommended use is **{}**. Using it at night is not generally recommended due to \
         sun sensitivity.",
        product.how_to_use
    )
}

// Pregnancy guidance is the shipped answer for the interactions question.
fn answer_drug_interactions(_product: &Product) -> String {
    "Please consult your doctor before using the serum if you are pregnant or nursing, as with \
     any high-concentration active ingredient product."
        .to_owned()
}

fn answer_routine_placement(_product: &Product) -> String {
    "Apply it after cleansing and toning, but before your moisturizing step.".to_owned()
}

fn first_or_empty(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or_default()
}
