//! Text, date and URL helpers shared by the extractors, plus a file system check
//! for the data directory.
//!
//! - [`normalize_text`]: whitespace cleanup applied to every extracted string
//! - [`parse_local_date`]: French long-form dates (`5 janvier 2024`) to `YYYY-MM-DD`
//! - [`absolutize_url`]: resolve listing hrefs against the site root

use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::error::{HarvestError, Result};

const WRITE_CHECK_FILE: &str = ".harvest_write_check";

/// Trim and collapse every run of whitespace into a single space.
///
/// `None` and `""` give `None`. Anything else gives `Some`, so whitespace-only
/// input comes back as `Some("")`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text(Some(" a   b\n c ")), Some("a b c".to_string()));
/// assert_eq!(normalize_text(None), None);
/// ```
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Month number for a lower-cased French month name.
fn french_month(name: &str) -> Option<&'static str> {
    let month = match name {
        "janvier" => "01",
        "février" => "02",
        "mars" => "03",
        "avril" => "04",
        "mai" => "05",
        "juin" => "06",
        "juillet" => "07",
        "août" => "08",
        "septembre" => "09",
        "octobre" => "10",
        "novembre" => "11",
        "décembre" => "12",
        _ => return None,
    };
    Some(month)
}

/// Convert a French long-form date into `{year}-{month}-{day}`.
///
/// The day is left-padded to two characters and the year is copied verbatim.
/// Month names are matched case-insensitively; an unknown month falls back to
/// `"01"` instead of failing. Input with fewer than three words gives `None`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_local_date(Some("5 janvier 2024")), Some("2024-01-05".to_string()));
/// assert_eq!(parse_local_date(Some("5 martien 2024")), Some("2024-01-05".to_string()));
/// ```
pub fn parse_local_date(text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    let lowered = text.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();
    if parts.len() < 3 {
        debug!(input = text, "Date has fewer than three parts");
        return None;
    }

    let day = format!("{:0>2}", parts[0]);
    let month = french_month(parts[1]).unwrap_or_else(|| {
        debug!(month = parts[1], "Unknown month name; using 01");
        "01"
    });
    let year = parts[2];
    Some(format!("{year}-{month}-{day}"))
}

/// Resolve a listing href against the site root.
///
/// Hrefs that already carry a scheme are returned unchanged. Anything else is
/// appended to `base_url`, with a `/` separator inserted when the href lacks one.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(absolutize_url("https://x.test", "/web/article"), "https://x.test/web/article");
/// assert_eq!(absolutize_url("https://x.test", "article"), "https://x.test/article");
/// ```
pub fn absolutize_url(base_url: &str, href: &str) -> String {
    if url::Url::parse(href).is_ok() {
        return href.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a marker file.
/// A marker that cannot be removed is logged, not treated as failure.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let marker = path.join(WRITE_CHECK_FILE);
    if let Err(e) = fs::File::create(&marker).await {
        return Err(HarvestError::NotWritable(format!("{}: {e}", path.display())));
    }
    if let Err(e) = fs::remove_file(&marker).await {
        warn!(marker = %marker.display(), error = %e, "Failed to remove write check file");
    }
    info!("Data directory is writable");
    Ok(())
}
