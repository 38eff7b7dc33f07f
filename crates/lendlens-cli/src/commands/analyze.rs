//! One-shot analysis commands (`credit`, `appraisal`, `title`).

use crate::cli::AnalyzeArgs;
use crate::config::{Profile, GEMINI_API_KEY_ENV};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lendlens_analyzer::{load_document, Analyzer, NormalizedResult};
use lendlens_domain::{AnalysisProvider, DocumentClass, EncodedPayload};
use lendlens_llm::GeminiProvider;
use std::fmt::Display;
use std::path::Path;
use tracing::debug;

/// Build the provider for `profile`, resolving the API key.
///
/// This is the only place a provider is constructed; the result is shared by
/// every flow for the rest of the process.
pub fn build_provider(profile: &Profile, explicit_key: Option<&str>) -> Result<GeminiProvider> {
    let env_key = std::env::var(GEMINI_API_KEY_ENV).ok();
    let api_key = profile
        .resolve_api_key(explicit_key, env_key.as_deref())
        .ok_or(CliError::MissingApiKey)?;

    debug!(endpoint = %profile.endpoint, model = %profile.model, "Building Gemini provider");
    Ok(GeminiProvider::new(profile.gemini_config(api_key))?)
}

/// Load a file and analyze it as `class`.
pub async fn analyze_file<P>(
    class: DocumentClass,
    path: &Path,
    mime_type: Option<&str>,
    analyzer: &Analyzer<P>,
) -> Result<NormalizedResult>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let document = load_document(path, mime_type).await?;
    let payload = EncodedPayload::encode(&document);
    Ok(analyzer.analyze_class(class, payload).await?)
}

/// Execute an analysis command and print the result.
pub async fn execute_analyze<P>(
    class: DocumentClass,
    args: AnalyzeArgs,
    analyzer: &Analyzer<P>,
    formatter: &Formatter,
) -> Result<()>
where
    P: AnalysisProvider + Send + Sync + 'static,
    P::Error: Display,
{
    eprintln!(
        "{}",
        formatter.info(&format!("Analyzing {} as a {}...", args.file.display(), class.noun()))
    );

    let result = analyze_file(class, &args.file, args.mime.as_deref(), analyzer).await?;
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}
