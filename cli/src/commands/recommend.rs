use clap::Args;
use serde_json::json;

use outreach_core::activity::EnrichedBundle;
use outreach_core::recommendations::{Language, MessageSettings, RecommendationOutput};

use crate::session::Session;
use crate::util::{exit_error, raw_api_request, read_json_from_file, report, report_request_error};

#[derive(Args)]
pub struct RecommendArgs {
    /// 1 (super casual) to 4 (formal business)
    #[arg(long, default_value_t = 2)]
    formality: u8,
    /// 1 (ultra-brief) to 3 (balanced)
    #[arg(long, default_value_t = 2)]
    length: u8,
    /// Outreach purpose, repeatable (e.g. "reconnect", "hiring")
    #[arg(long = "purpose")]
    purposes: Vec<String>,
    /// Draft language: ENG or ITA
    #[arg(long, default_value = "ENG")]
    language: String,
    /// Enriched bundle JSON (use '-' for stdin). Defaults to the cached bundle.
    #[arg(long)]
    bundle_file: Option<String>,
}

pub fn parse_language(raw: &str) -> Result<Language, String> {
    serde_json::from_value(json!(raw.trim().to_uppercase()))
        .map_err(|_| format!("Unsupported language '{raw}'"))
}

pub async fn run(api_url: &str, args: RecommendArgs) -> i32 {
    let language = parse_language(&args.language)
        .unwrap_or_else(|e| exit_error(&e, Some("Use --language ENG or --language ITA.")));
    let settings = MessageSettings {
        formality: args.formality,
        length: args.length,
        purposes: args.purposes,
        language,
    };
    if let Err(e) = settings.validate() {
        exit_error(&e.to_string(), None);
    }

    let mut session = Session::load();
    let bundle = match args.bundle_file.as_deref() {
        Some(path) => read_json_from_file(path)
            .and_then(|value| {
                serde_json::from_value::<EnrichedBundle>(value)
                    .map_err(|e| format!("Not an enriched bundle: {e}"))
            })
            .unwrap_or_else(|e| exit_error(&e, None)),
        None => session.bundle.clone().unwrap_or_else(|| {
            exit_error(
                "No enriched bundle cached",
                Some("Run `outreach profile enrich --contact-id <id>` or pass --bundle-file."),
            )
        }),
    };

    let request = json!({ "bundle": bundle, "settings": settings });
    let (status, body) = match raw_api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/recommendations",
        Some(&request),
        &[],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => return report_request_error(err),
    };

    if (200..300).contains(&status) {
        match serde_json::from_value::<RecommendationOutput>(body.clone()) {
            Ok(output) => {
                session.recommendations = Some(output);
                if let Err(e) = session.save() {
                    exit_error(&e, None);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Recommendations not cached"),
        }
    }
    report(status, &body)
}
