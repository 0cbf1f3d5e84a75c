//! URL validation rules
//!
//! Validation is an ordered list of independent predicates over a parsed
//! URL. [`UrlValidator`] runs them in order and reports the first rule that
//! rejected the URL. Host eligibility is asynchronous and is applied by the
//! worker after these synchronous rules.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

/// Why a URL was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The string could not be parsed or normalized
    Malformed,
    /// Scheme other than `https` (or `http` when insecure HTTP is allowed)
    Scheme,
    /// Hostname or path outside the accepted shape
    Structure,
    /// Path ends in a non-HTML file extension
    Extension,
    /// The host-eligibility predicate declined the host
    Ineligible,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Malformed => "malformed",
            Self::Scheme => "scheme",
            Self::Structure => "structure",
            Self::Extension => "extension",
            Self::Ineligible => "ineligible host",
        };
        f.write_str(reason)
    }
}

/// A single validation predicate
pub trait UrlRule: Send + Sync {
    /// Returns true if the URL passes this rule
    fn check(&self, url: &Url) -> bool;

    /// The rejection reported when `check` fails
    fn rejection(&self) -> Rejection;
}

/// Accepts `https`, and `http` only when explicitly allowed
#[derive(Debug, Clone, Copy)]
pub struct SchemeRule {
    pub allow_insecure_http: bool,
}

impl UrlRule for SchemeRule {
    fn check(&self, url: &Url) -> bool {
        match url.scheme() {
            "https" => true,
            "http" => self.allow_insecure_http,
            _ => false,
        }
    }

    fn rejection(&self) -> Rejection {
        Rejection::Scheme
    }
}

/// Hostname shape and allowed path characters
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureRule;

fn host_pattern() -> &'static Regex {
    static HOST: OnceLock<Regex> = OnceLock::new();
    HOST.get_or_init(|| {
        Regex::new(r"^[-a-z0-9_]{1,63}(?:\.[-a-z0-9_]{1,63})*\.[a-z0-9]{1,6}$")
            .expect("host pattern is valid")
    })
}

fn resource_pattern() -> &'static Regex {
    static RESOURCE: OnceLock<Regex> = OnceLock::new();
    RESOURCE.get_or_init(|| {
        Regex::new(r"^[-a-zA-Z0-9()@:%_+.~?&=/]*$").expect("resource pattern is valid")
    })
}

impl UrlRule for StructureRule {
    fn check(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) if host.len() <= 253 => host,
            _ => return false,
        };
        if !host_pattern().is_match(host) {
            return false;
        }
        if !url.username().is_empty() || url.password().is_some() {
            return false;
        }

        let resource = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        resource_pattern().is_match(&resource)
    }

    fn rejection(&self) -> Rejection {
        Rejection::Structure
    }
}

/// Rejects paths ending in a known non-HTML file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionRule;

fn extension_pattern() -> &'static Regex {
    static EXTENSION: OnceLock<Regex> = OnceLock::new();
    EXTENSION.get_or_init(|| {
        Regex::new(
            r"\.(?:css|js|bmp|gif|jpe?g|ico|png|svg|webp|tiff?|mid|mp2|mp3|mp4|ppsx|wav|avi|mov|mpeg|ram|m4v|mkv|ogg|ogv|pdf|odc|sas|ps|eps|tex|ppt|pptx|doc|docx|xls|xlsx|names|data|dat|exe|bz2|tar|msi|bin|7z|psd|dmg|iso|epub|dll|cnf|tgz|sha1|ss|scm|py|rkt|r|c|thmx|mso|arff|rtf|jar|csv|java|txt|rm|smil|wmv|swf|wma|zip|rar|gz|xml|json)$",
        )
        .expect("extension pattern is valid")
    })
}

impl UrlRule for ExtensionRule {
    fn check(&self, url: &Url) -> bool {
        !extension_pattern().is_match(&url.path().to_ascii_lowercase())
    }

    fn rejection(&self) -> Rejection {
        Rejection::Extension
    }
}

/// Runs a list of rules in order
pub struct UrlValidator {
    rules: Vec<Box<dyn UrlRule>>,
}

impl UrlValidator {
    /// Builds the standard rule chain: scheme, structure, extension
    pub fn new(allow_insecure_http: bool) -> Self {
        Self::with_rules(vec![
            Box::new(SchemeRule {
                allow_insecure_http,
            }),
            Box::new(StructureRule),
            Box::new(ExtensionRule),
        ])
    }

    /// Builds a validator from an explicit rule list
    pub fn with_rules(rules: Vec<Box<dyn UrlRule>>) -> Self {
        Self { rules }
    }

    /// Checks a parsed URL, returning the first failing rule's rejection
    pub fn validate(&self, url: &Url) -> Result<(), Rejection> {
        for rule in &self.rules {
            if !rule.check(url) {
                return Err(rule.rejection());
            }
        }
        Ok(())
    }

    /// Normalizes and validates a raw URL string
    ///
    /// Returns the normalized URL when every rule passes.
    pub fn validate_str(&self, raw: &str) -> Result<Url, Rejection> {
        let url = super::normalize_url(raw).map_err(|_| Rejection::Malformed)?;
        self.validate(&url)?;
        Ok(url)
    }
}

impl fmt::Debug for UrlValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlValidator")
            .field("rules", &self.rules.len())
            .finish()
    }
}
