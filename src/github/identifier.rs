//! Turns user input into a [`RepositoryIdentifier`].
//!
//! Accepts full GitHub URLs (with or without scheme, extra path segments
//! ignored) and bare `owner/name` strings. No network access happens here.

use super::types::RepositoryIdentifier;
use crate::error::{AnalyzerError, Result};
use url::Url;

/// Host token that marks a full GitHub URL
pub const GITHUB_HOST: &str = "github.com";

const INVALID_URL_MESSAGE: &str = "Invalid GitHub URL. Format: https://github.com/owner/repo";

/// Parses user input into a canonical owner/name pair
pub fn resolve(input: &str) -> Result<RepositoryIdentifier> {
    let input = strip_query_and_fragment(input.trim());
    let input = input.trim_end_matches('/');
    if input.is_empty() {
        return Err(invalid());
    }

    if input.to_lowercase().contains(GITHUB_HOST) {
        resolve_url(input)
    } else {
        resolve_bare(input)
    }
}

fn resolve_url(input: &str) -> Result<RepositoryIdentifier> {
    if let Ok(parsed) = Url::parse(input) {
        if let Some(host) = parsed.host_str() {
            if !is_github_host(host) {
                return Err(invalid());
            }
            let segments: Vec<&str> = parsed
                .path_segments()
                .map(|segments| segments.collect())
                .unwrap_or_default();
            return identifier_from(&segments);
        }
    }

    // Scheme-less input such as `github.com/owner/repo`
    let parts: Vec<&str> = input.split('/').collect();
    let index = parts
        .iter()
        .position(|part| is_github_host(part))
        .ok_or_else(invalid)?;
    identifier_from(&parts[index + 1..])
}

fn resolve_bare(input: &str) -> Result<RepositoryIdentifier> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 2 {
        return Err(invalid());
    }
    identifier_from(&parts)
}

fn identifier_from(segments: &[&str]) -> Result<RepositoryIdentifier> {
    match segments {
        [owner, name, ..] => {
            let name = name.strip_suffix(".git").unwrap_or(name);
            if is_valid_segment(owner) && is_valid_segment(name) {
                Ok(RepositoryIdentifier {
                    owner: (*owner).to_string(),
                    name: name.to_string(),
                })
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

fn is_github_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host == GITHUB_HOST || host == "www.github.com"
}

/// GitHub logins and repository names are never `.` or `..`
fn is_valid_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
        && !segment.chars().any(|c| c.is_whitespace() || c == '\\')
}

fn strip_query_and_fragment(input: &str) -> &str {
    input.split(|c| c == '?' || c == '#').next().unwrap_or(input)
}

fn invalid() -> AnalyzerError {
    AnalyzerError::InvalidRepositoryUrl(INVALID_URL_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn pair(input: &str) -> Option<(String, String)> {
        resolve(input).ok().map(|id| (id.owner, id.name))
    }

    #[test_case("https://github.com/octo/demo", "octo", "demo" ; "full url")]
    #[test_case("https://github.com/octo/demo/", "octo", "demo" ; "trailing slash")]
    #[test_case("https://github.com/octo/demo/tree/main/src", "octo", "demo" ; "extra segments")]
    #[test_case("http://www.github.com/octo/demo", "octo", "demo" ; "www host")]
    #[test_case("github.com/octo/demo", "octo", "demo" ; "no scheme")]
    #[test_case("https://github.com/octo/demo.git", "octo", "demo" ; "clone url")]
    #[test_case("https://github.com/octo/demo?tab=readme-ov-file#usage", "octo", "demo" ; "query and fragment")]
    #[test_case("  octo/demo  ", "octo", "demo" ; "bare with whitespace")]
    #[test_case("rust-lang/rust", "rust-lang", "rust" ; "bare")]
    fn test_resolves(input: &str, owner: &str, name: &str) {
        assert_eq!(pair(input), Some((owner.to_string(), name.to_string())));
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("not a url" ; "one bare segment with spaces")]
    #[test_case("octo" ; "one bare segment")]
    #[test_case("octo/demo/extra" ; "three bare segments")]
    #[test_case("/demo" ; "missing owner")]
    #[test_case("https://github.com/octo" ; "host without name")]
    #[test_case("https://github.com" ; "host only")]
    #[test_case("https://gitlab.com/github.com/demo" ; "other host")]
    #[test_case("github.com" ; "host token only")]
    #[test_case("my org/demo" ; "whitespace in owner")]
    #[test_case("../demo" ; "parent dir owner")]
    #[test_case("../user" ; "parent dir escaping repos")]
    #[test_case("octo/.." ; "parent dir name")]
    #[test_case("octo/." ; "current dir name")]
    #[test_case("octo/..git" ; "dot name after clone suffix")]
    #[test_case("github.com/../demo" ; "parent dir owner without scheme")]
    fn test_rejects(input: &str) {
        let error = resolve(input).unwrap_err();
        assert!(error.is_input_error());
        assert_eq!(error.to_string(), INVALID_URL_MESSAGE);
    }

    proptest! {
        #[test]
        fn prop_full_urls_resolve(
            owner in "[A-Za-z0-9][A-Za-z0-9-]{0,20}",
            name in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,20}",
            suffix in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
            trailing in any::<bool>(),
        ) {
            prop_assume!(!name.ends_with(".git"));
            let mut url = format!("https://github.com/{}/{}", owner, name);
            for segment in &suffix {
                url.push('/');
                url.push_str(segment);
            }
            if trailing {
                url.push('/');
            }
            prop_assert_eq!(pair(&url), Some((owner, name)));
        }

        #[test]
        fn prop_bare_pairs_resolve(
            owner in "[A-Za-z0-9][A-Za-z0-9-]{0,20}",
            name in "[A-Za-z0-9_][A-Za-z0-9_.-]{0,20}",
        ) {
            prop_assume!(!name.ends_with(".git"));
            prop_assert_eq!(pair(&format!("{}/{}", owner, name)), Some((owner, name)));
        }

        #[test]
        fn prop_bare_segment_counts_other_than_two_fail(
            segments in prop::collection::vec("[a-z0-9]{1,8}", 0..6),
        ) {
            prop_assume!(segments.len() != 2);
            prop_assert!(resolve(&segments.join("/")).is_err());
        }
    }
}
