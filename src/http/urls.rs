//! URL construction helpers

use crate::error::{Error, Result};
use url::Url;

/// Join URL segments with exactly one `/` between them.
///
/// Empty segments and repeated slashes are dropped, the result never ends
/// with a slash.
pub fn urljoin(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        for segment in part.split('/').filter(|s| !s.is_empty()) {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

/// Append a single item code to an endpoint, percent-encoding it.
pub fn item_url(endpoint: &str, code: &str) -> Result<String> {
    if code.is_empty() {
        return Err(Error::invalid_value("code", "item code must not be empty"));
    }

    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|()| Error::invalid_value("endpoint", format!("{endpoint} cannot be a base")))?
        .pop_if_empty()
        .push(code);
    Ok(url.to_string())
}
