//! Turns raw model text into ranked [`Objective`]s.
//!
//! Two strategies, chosen per deployment and never chained:
//!
//! - [`parse_structured`]: the reply is a JSON object
//!   `{"objectives": [{"objective": "...", "rationale": "..."}]}`. Any shape
//!   mismatch is a hard [`AnalysisError::Parse`] carrying the raw text.
//! - [`parse_numbered`]: the reply is a numbered list (`1. `, `2. `, ...) with
//!   an optional `Rationale:` line per item. Never fails.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::AnalysisError,
    types::{MAX_OBJECTIVES, Objective, RATIONALE_NOT_PROVIDED},
};

/// Literal separating objective text from its rationale in numbered replies.
pub const RATIONALE_MARKER: &str = "Rationale:";

/// `<integer>. ` in column 0. Indented numbers belong to the enclosing section.
static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.[ \t]+").expect("numbered marker regex"));

/// How the model reply is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    /// JSON object with an `objectives` array (strict).
    #[default]
    Structured,
    /// Numbered free text with `Rationale:` markers (lenient).
    Numbered,
}

impl ParseStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Numbered => "numbered",
        }
    }

    /// Whether the provider should be asked for a JSON object reply.
    pub fn wants_json(self) -> bool {
        matches!(self, Self::Structured)
    }

    pub fn parse(self, raw: &str) -> Result<Vec<Objective>, AnalysisError> {
        match self {
            Self::Structured => parse_structured(raw),
            Self::Numbered => Ok(parse_numbered(raw)),
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" => Ok(Self::Structured),
            "numbered" => Ok(Self::Numbered),
            other => Err(format!(
                "unknown parse strategy `{other}` (expected `structured` or `numbered`)"
            )),
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Strategy A: structured                                                    */
/* ------------------------------------------------------------------------- */

#[derive(Deserialize)]
struct StructuredReply {
    objectives: Vec<StructuredObjective>,
}

#[derive(Deserialize)]
struct StructuredObjective {
    objective: String,
    rationale: String,
}

/// Decodes a JSON reply with an `objectives` list.
///
/// Markdown code fences around the JSON are tolerated. Entries beyond
/// [`MAX_OBJECTIVES`] are dropped.
///
/// # Errors
/// [`AnalysisError::Parse`] if the text is not JSON, `objectives` is missing,
/// any entry lacks `objective`/`rationale`, or an `objective` is blank. The
/// error holds `raw` verbatim.
pub fn parse_structured(raw: &str) -> Result<Vec<Objective>, AnalysisError> {
    let body = strip_code_fences(raw);

    let reply: StructuredReply =
        serde_json::from_str(body).map_err(|e| AnalysisError::parse(e.to_string(), raw))?;

    if let Some(idx) = reply
        .objectives
        .iter()
        .position(|o| o.objective.trim().is_empty())
    {
        return Err(AnalysisError::parse(
            format!("objectives[{idx}].objective is empty"),
            raw,
        ));
    }

    Ok(reply
        .objectives
        .into_iter()
        .take(MAX_OBJECTIVES)
        .map(|o| Objective::new(o.objective.trim(), o.rationale.trim()))
        .collect())
}

/// Removes a surrounding ```` ``` ```` fence, if any, with whatever info
/// string follows the opening backticks (`json`, `JSON`, ...).
fn strip_code_fences(s: &str) -> &str {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let rest = rest.trim_end().strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/* ------------------------------------------------------------------------- */
/* Strategy B: numbered text                                                 */
/* ------------------------------------------------------------------------- */

/// Splits a numbered reply into at most [`MAX_OBJECTIVES`] objectives.
///
/// Text before the first marker is preamble and ignored; a reply without any
/// marker yields an empty list. Each section is split once on the first
/// [`RATIONALE_MARKER`]; without one the rationale is
/// [`RATIONALE_NOT_PROVIDED`].
pub fn parse_numbered(raw: &str) -> Vec<Objective> {
    NUMBERED_MARKER
        .split(raw)
        .skip(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_OBJECTIVES)
        .map(split_section)
        .collect()
}

fn split_section(section: &str) -> Objective {
    match section.split_once(RATIONALE_MARKER) {
        Some((objective, rationale)) => Objective::new(objective.trim(), rationale.trim()),
        None => Objective::new(section.trim(), RATIONALE_NOT_PROVIDED),
    }
}
