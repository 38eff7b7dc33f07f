//! Normalize raw model output into typed results

use crate::error::AnalyzerError;
use lendlens_domain::DocumentClass;
use serde::de::DeserializeOwned;
use tracing::warn;

const FENCE: &str = "```";

/// Strip a markdown code fence wrapped around the whole response
///
/// Handles both a bare fence and a `json`-tagged one. Only a fence at the very
/// start (after trimming) is recognised; prose before or after it is left in
/// place and will fail a later parse. Unfenced text comes back trimmed and
/// otherwise unchanged.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}

/// Parse a structured response into `T`
///
/// Either the whole response deserializes or the call fails with
/// [`AnalyzerError::Parse`]; nothing partial is returned.
pub fn parse_structured<T>(response: &str, class: DocumentClass) -> Result<T, AnalyzerError>
where
    T: DeserializeOwned,
{
    let body = strip_code_fence(response);

    serde_json::from_str(body).map_err(|e| {
        warn!(class = %class, error = %e, "Model response did not match the expected structure");
        AnalyzerError::Parse {
            class,
            reason: e.to_string(),
        }
    })
}
