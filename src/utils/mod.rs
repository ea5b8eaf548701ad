use url::{form_urlencoded, Url};

/// Canonicalize a pasted video URL.
///
/// Adds `https://` when no scheme is present and keeps only the `v` query
/// parameter, so tracking params, playlist indices and timestamps are dropped.
/// This does not validate anything: a string that does not parse as a URL is
/// still stripped textually, and blank input stays blank.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut parsed = match Url::parse(&with_scheme) {
        Ok(url) => url,
        Err(_) => return strip_unparsed(&with_scheme),
    };

    let video_id = parsed.query().and_then(video_param);

    parsed.set_query(None);
    parsed.set_fragment(None);
    if let Some(v) = video_id {
        parsed.query_pairs_mut().append_pair("v", &v);
    }

    parsed.to_string()
}

/// First non-empty `v` value of a query string.
fn video_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Textual fallback for strings the URL parser rejects (bad port, stray spaces).
fn strip_unparsed(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    match query.and_then(video_param) {
        Some(v) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("v", &v)
                .finish();
            format!("{}?{}", base, query)
        }
        None => base.to_string(),
    }
}

/// Pull the video id out of a watch URL (`v=` parameter) or a `youtu.be/` short link.
pub fn extract_video_id(url: &str) -> Option<String> {
    let id = if let Some((_, rest)) = url.rsplit_once("v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.rsplit_once("youtu.be/") {
        rest.split('?').next()
    } else {
        None
    }?;

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Split batch text into URLs, in input order, dropping blank tokens.
pub fn split_batch(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
