// src/app/utils.rs
use chrono::{Datelike, NaiveDate};

/// Poster display URL; `None` when the provider sent no usable path.
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = image_base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

pub fn release_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d.year());
    }
    // partial dates ("2024", "2024-05") still carry a year
    date.get(..4)
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|y| y.parse().ok())
}

pub fn year_label(date: Option<&str>) -> String {
    date.and_then(release_year)
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".into())
}

pub fn vote_label(vote: Option<f32>) -> String {
    match vote {
        Some(v) if v.is_finite() => format!("{:.1}", v.clamp(0.0, 10.0)),
        _ => "N/A".into(),
    }
}

pub const fn rating_label(value: u8) -> &'static str {
    match value {
        1 => "1 ★",
        2 => "2 ★★",
        3 => "3 ★★★",
        4 => "4 ★★★★",
        5 => "5 ★★★★★",
        _ => "Rate this",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_url_joins_base_and_fragment() {
        let base = "https://image.tmdb.org/t/p/w500";
        assert_eq!(
            poster_url(base, Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(
            poster_url("https://img.test/", Some("abc.jpg")).as_deref(),
            Some("https://img.test/abc.jpg")
        );
        assert_eq!(poster_url(base, Some("  ")), None);
        assert_eq!(poster_url(base, None), None);
    }

    #[test]
    fn year_and_vote_labels() {
        assert_eq!(year_label(Some("2021-09-15")), "2021");
        assert_eq!(year_label(Some("1999")), "1999");
        assert_eq!(year_label(Some("soon")), "N/A");
        assert_eq!(year_label(None), "N/A");

        assert_eq!(vote_label(Some(7.849)), "7.8");
        assert_eq!(vote_label(Some(0.0)), "0.0");
        assert_eq!(vote_label(None), "N/A");
    }

    #[test]
    fn rating_labels_cover_selector() {
        assert_eq!(rating_label(0), "Rate this");
        assert_eq!(rating_label(5), "5 ★★★★★");
    }
}
