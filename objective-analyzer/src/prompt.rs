//! Prompt builder: system instruction + business-context user prompt.

use crate::{
    parse::{ParseStrategy, RATIONALE_MARKER},
    types::{BusinessContext, Competitor},
};

/// Persona and the factors the model should weigh.
pub const BASE_SYSTEM: &str = "You are an expert in loyalty program strategy and customer retention. \
Analyze the provided information and suggest specific, actionable objectives \
that align with the business goals and customer segments. Consider factors like:\
\n- Customer engagement and retention\
\n- Revenue generation and profitability\
\n- Brand loyalty and advocacy\
\n- Competitive differentiation";

const STRUCTURED_FORMAT: &str = "Respond ONLY with a JSON object of this exact shape (no markdown, no comments):\n\
{\"objectives\": [{\"objective\": \"...\", \"rationale\": \"...\"}]}\n\
Return exactly 5 entries, ordered from most to least important.";

/// System instruction for the given strategy: persona plus output format.
pub fn system_prompt(strategy: ParseStrategy) -> String {
    let format = match strategy {
        ParseStrategy::Structured => STRUCTURED_FORMAT.to_string(),
        ParseStrategy::Numbered => format!(
            "Respond with a numbered list of exactly 5 objectives (`1. ` to `5. `), \
             ordered from most to least important. Put each objective on its own line, \
             followed by a line starting with `{RATIONALE_MARKER}` that explains it."
        ),
    };
    format!("{BASE_SYSTEM}\n\n{format}")
}

/// Builds the user prompt from a business context.
///
/// Section order is fixed: opening sentence, customer segments, current
/// program, challenges, goals, competitors, closing instruction. Sections
/// with no content are left out entirely.
///
/// # Example
/// ```
/// # use objective_analyzer::{BusinessContext, prompt::build_user_prompt};
/// let ctx = BusinessContext {
///     company_name: None,
///     industry: "retail".into(),
///     business_type: "B2C".into(),
///     customer_segments: vec!["students".into()],
///     current_loyalty_program: None,
///     current_challenges: None,
///     business_goals: None,
///     competitors: None,
/// };
/// let prompt = build_user_prompt(&ctx);
/// assert!(prompt.contains("Customer Segments:\n- students\n"));
/// assert!(!prompt.contains("Competitor Analysis"));
/// ```
pub fn build_user_prompt(ctx: &BusinessContext) -> String {
    let mut out = String::new();

    match non_blank(ctx.company_name.as_deref()) {
        Some(company) => out.push_str(&format!(
            "Analyze and suggest the top 5 loyalty program objectives for {company}, \
             a {} business in the {} industry.\n\n",
            ctx.business_type, ctx.industry
        )),
        None => out.push_str(&format!(
            "Analyze and suggest the top 5 loyalty program objectives for \
             a {} business in the {} industry.\n\n",
            ctx.business_type, ctx.industry
        )),
    }

    if !ctx.customer_segments.is_empty() {
        push_bullets(&mut out, "Customer Segments:", &ctx.customer_segments);
    }

    if let Some(program) = non_blank(ctx.current_loyalty_program.as_deref()) {
        out.push_str(&format!("\nCurrent Loyalty Program:\n{program}\n"));
    }

    if let Some(challenges) = non_empty(&ctx.current_challenges) {
        out.push('\n');
        push_bullets(&mut out, "Current Challenges:", challenges);
    }

    if let Some(goals) = non_empty(&ctx.business_goals) {
        out.push('\n');
        push_bullets(&mut out, "Business Goals:", goals);
    }

    if let Some(competitors) = ctx.competitors.as_deref().filter(|c| !c.is_empty()) {
        out.push_str("\nCompetitor Analysis:\n");
        for competitor in competitors {
            push_competitor(&mut out, competitor);
        }
    }

    out.push_str(
        "\nPlease provide the top 5 specific, measurable loyalty program objectives that consider our \
         company's context, competitive landscape, and business goals, ranked from most to least \
         important. For each objective, provide a clear rationale that explains how it addresses \
         our specific needs and competitive position.",
    );

    out
}

fn push_bullets(out: &mut String, header: &str, items: &[String]) {
    out.push_str(header);
    out.push('\n');
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
}

fn push_competitor(out: &mut String, c: &Competitor) {
    out.push_str(&format!("\n{}:", c.name));
    if let Some(desc) = non_blank(c.loyalty_program_description.as_deref()) {
        out.push_str(&format!("\nProgram: {desc}"));
    }
    if let Some(strengths) = non_empty(&c.strengths) {
        out.push_str("\nStrengths:");
        for s in strengths {
            out.push_str(&format!("\n- {s}"));
        }
    }
    if let Some(weaknesses) = non_empty(&c.weaknesses) {
        out.push_str("\nWeaknesses:");
        for w in weaknesses {
            out.push_str(&format!("\n- {w}"));
        }
    }
    out.push('\n');
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn non_empty(items: &Option<Vec<String>>) -> Option<&[String]> {
    items.as_deref().filter(|v| !v.is_empty())
}
