use crate::error::AppError;

/// Spreadsheet backing the production guide list.
const DEFAULT_SPREADSHEET_ID: &str = "1Q7lxOVt9AtUXOqOZrBiqavjQh13lgkDjfdeOaPVZcNE";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV export URL of the published guide sheet.
    pub csv_url: String,
    /// Gemini model identifier used for ranking.
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GUIDES_CSV_URL`: full CSV export URL (overrides the sheet id)
    /// - `GUIDES_SPREADSHEET_ID`: Google Sheet id for the default export URL
    /// - `GUIDES_RANKING_MODEL`: Gemini model id
    pub fn from_env() -> Result<Self, AppError> {
        let csv_url = match std::env::var("GUIDES_CSV_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                let sheet_id = std::env::var("GUIDES_SPREADSHEET_ID")
                    .unwrap_or_else(|_| DEFAULT_SPREADSHEET_ID.to_string());
                csv_export_url(&sheet_id)
            }
        };

        if !csv_url.starts_with("http://") && !csv_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "GUIDES_CSV_URL must be an http(s) URL, got: {csv_url}"
            )));
        }

        let model =
            std::env::var("GUIDES_RANKING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self { csv_url, model })
    }
}

/// The gviz endpoint is the more reliable CSV export for published sheets.
fn csv_export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv")
}
