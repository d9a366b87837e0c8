//! Subscriber CSV export.

use grind_core::Subscriber;

use crate::error::ApiError;

pub const CSV_HEADER: &str = "name,email,subscribedAt";
pub const CSV_FILE_NAME: &str = "grind-stories-subscribers.csv";

/// Renders subscribers as CSV: an unquoted header, then one fully quoted
/// row per subscriber, separated by `\n` with no trailing newline.
pub fn subscribers_csv(subscribers: &[Subscriber]) -> Result<String, ApiError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for subscriber in subscribers {
        writer
            .write_record([
                subscriber.name.as_deref().unwrap_or_default(),
                subscriber.email.as_str(),
                subscriber.subscribed_at.as_str(),
            ])
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ApiError::InternalError(format!("csv export failed: {}", err)))?;
    let rows = String::from_utf8(bytes)
        .map_err(|err| ApiError::InternalError(format!("csv export failed: {}", err)))?;

    let mut out = String::from(CSV_HEADER);
    if !rows.is_empty() {
        out.push('\n');
        out.push_str(rows.strip_suffix('\n').unwrap_or(&rows));
    }
    Ok(out)
}

fn csv_err(err: csv::Error) -> ApiError {
    ApiError::InternalError(format!("csv export failed: {}", err))
}
