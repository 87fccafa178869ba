use url::Url;

pub const PLACEHOLDER_IMAGE: &str = "/images/trek-placeholder.jpg";

/// Normalize a stored image reference into something a browser can load.
pub fn get_valid_image_url(raw: Option<&str>) -> String {
    let candidate = match raw.map(str::trim) {
        Some(s) if !s.is_empty() && s != "null" && s != "undefined" => s,
        _ => return PLACEHOLDER_IMAGE.to_string(),
    };

    if candidate.starts_with("data:image/") {
        return candidate.to_string();
    }

    if let Some(rest) = candidate.strip_prefix("//") {
        return get_valid_image_url(Some(&format!("https://{}", rest)));
    }

    match Url::parse(candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            candidate.to_string()
        }
        Ok(_) => PLACEHOLDER_IMAGE.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if candidate.starts_with('/') {
                candidate.to_string()
            } else {
                format!("/{}", candidate)
            }
        }
        Err(_) => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// Gallery images worth rendering, each normalized.
pub fn valid_gallery(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|u| !u.trim().is_empty())
        .map(|u| get_valid_image_url(Some(u)))
        .collect()
}
