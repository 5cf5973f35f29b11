use regex::Regex;
use url::Url;

/// File extensions that are never worth a browser render.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] =
    &[r"\.(jpg|jpeg|png|gif|css|js|ico|woff|woff2|ttf|eot|svg|pdf)$"];

/// Resolves `raw` against `base` per RFC 3986. Absolute inputs come back
/// parsed as-is; empty or unresolvable inputs yield None.
pub fn normalize(raw: &str, base: &Url) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }
    match base.join(raw) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            ::log::warn!("Failed to normalize URL {:?} against {}: {}", raw, base, e);
            None
        }
    }
}

/// A URL is crawlable only with both a scheme and an authority component.
pub fn is_valid(url: &Url) -> bool {
    !url.scheme().is_empty() && url.has_authority() && !url.authority().is_empty()
}

/// Strict string comparison of the authority (host[:port]) components.
///
/// Subdomains and explicit ports count as different origins; the scheme does
/// not participate, so an http and an https URL on one host compare equal.
pub fn is_same_origin(url: &Url, base: &Url) -> bool {
    url.authority() == base.authority()
}

/// Decides which discovered links are worth following: same-origin, valid,
/// and not matching any exclusion pattern.
#[derive(Debug)]
pub struct LinkFilter {
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Compiles the built-in asset exclusions plus any user-supplied patterns.
    pub fn new(extra_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(DEFAULT_EXCLUDE_PATTERNS.len() + extra_patterns.len());
        for pattern in DEFAULT_EXCLUDE_PATTERNS {
            exclude_regexes.push(Regex::new(pattern)?);
        }
        for pattern in extra_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }
        Ok(Self { exclude_regexes })
    }

    pub fn should_visit(&self, url: &Url, base: &Url) -> bool {
        if !is_valid(url) || !is_same_origin(url, base) {
            return false;
        }
        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    #[test]
    fn test_normalize_relative() {
        let resolved = normalize("page.html", &base()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/docs/page.html");

        let resolved = normalize("/about", &base()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/about");

        // Dot segments resolve per RFC 3986
        let resolved = normalize("../top", &base()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/top");
    }

    #[test]
    fn test_normalize_absolute_passthrough() {
        let resolved = normalize("https://other.com/x?q=1", &base()).unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/x?q=1");
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize("", &base()).is_none());
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(&Url::parse("https://example.com/").unwrap()));
        assert!(is_valid(&Url::parse("http://example.com:8080/p").unwrap()));

        // No authority component
        assert!(!is_valid(&Url::parse("mailto:someone@example.com").unwrap()));
        assert!(!is_valid(&Url::parse("data:text/plain,hello").unwrap()));
    }

    #[test]
    fn test_same_origin_reflexive() {
        let url = base();
        assert!(is_same_origin(&url, &url));
    }

    #[test]
    fn test_same_origin_rules() {
        let site = Url::parse("https://example.com/a").unwrap();

        // Subdomains are different origins
        let sub = Url::parse("https://www.example.com/a").unwrap();
        assert!(!is_same_origin(&sub, &site));

        // An explicit port is a different origin
        let ported = Url::parse("https://example.com:8080/a").unwrap();
        assert!(!is_same_origin(&ported, &site));

        // Scheme does not participate in the comparison
        let http = Url::parse("http://example.com/b").unwrap();
        assert!(is_same_origin(&http, &site));
    }

    #[test]
    fn test_link_filter_rejects_assets() {
        let filter = LinkFilter::new(&[]).unwrap();
        let site = Url::parse("https://example.com/").unwrap();

        let image = Url::parse("https://example.com/logo.png").unwrap();
        assert!(!filter.should_visit(&image, &site));

        let stylesheet = Url::parse("https://example.com/main.css").unwrap();
        assert!(!filter.should_visit(&stylesheet, &site));

        let page = Url::parse("https://example.com/pricing").unwrap();
        assert!(filter.should_visit(&page, &site));
    }

    #[test]
    fn test_link_filter_rejects_cross_origin() {
        let filter = LinkFilter::new(&[]).unwrap();
        let site = Url::parse("https://example.com/").unwrap();

        let external = Url::parse("https://external.example/").unwrap();
        assert!(!filter.should_visit(&external, &site));
    }

    #[test]
    fn test_link_filter_extra_patterns() {
        let filter = LinkFilter::new(&[r"/drafts/".to_string()]).unwrap();
        let site = Url::parse("https://example.com/").unwrap();

        let draft = Url::parse("https://example.com/drafts/post").unwrap();
        assert!(!filter.should_visit(&draft, &site));
    }
}
