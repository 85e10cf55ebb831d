//! Profile URL → username.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result, model::Username};

/// Recognised profile path shapes, tried in order. The first capture wins.
static PROFILE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
  [
    Regex::new(r"reddit\.com/u/([^/]+)").unwrap(),
    Regex::new(r"reddit\.com/user/([^/]+)").unwrap(),
    Regex::new(r"reddit\.com/users/([^/]+)").unwrap(),
  ]
});

/// Extract the username from a Reddit profile URL.
///
/// No normalisation is applied: case is preserved, and anything after the
/// name other than a `/` (a query string, say) is part of the capture.
pub fn resolve(url: &str) -> Result<Username> {
  PROFILE_PATTERNS
    .iter()
    .find_map(|re| re.captures(url))
    .and_then(|caps| caps.get(1))
    .map(|m| Username::new(m.as_str()))
    .ok_or_else(|| Error::InvalidProfileUrl(url.to_string()))
}
