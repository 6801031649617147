use serde::{Deserialize, Serialize};
use super::defaults::{detect_document_kind, DefaultMatcher};
use super::{normalize_header_text, Classification, DocumentKind, LicenseFamily};
use crate::error::{AuditError, Result};

/// Configured matcher: a file belongs to the family when its text contains
/// any of the substrings, literally and case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstringRule {
    pub license_family_category: String,
    pub license_family_name: String,
    #[serde(default)]
    pub substrings: Vec<String>,
}

impl SubstringRule {
    pub fn new(category: &str, name: &str, substrings: &[&str]) -> Self {
        Self {
            license_family_category: category.to_string(),
            license_family_name: name.to_string(),
            substrings: substrings.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn family(&self) -> LicenseFamily {
        LicenseFamily::new(
            self.license_family_category.clone(),
            self.license_family_name.clone(),
        )
    }

    pub fn matches(&self, text: &str) -> bool {
        self.substrings.iter().any(|s| text.contains(s.as_str()))
    }

    /// Reject rules that could never match or would produce a nameless family.
    pub fn validate(&self) -> Result<()> {
        if self.license_family_category.trim().is_empty() {
            return Err(AuditError::config("substring matcher has an empty license family category"));
        }
        if self.license_family_name.trim().is_empty() {
            return Err(AuditError::config(format!(
                "substring matcher '{}' has an empty license family name",
                self.license_family_category
            )));
        }
        if self.substrings.is_empty() {
            return Err(AuditError::config(format!(
                "substring matcher '{}' declares no substrings",
                self.license_family_category
            )));
        }
        if self.substrings.iter().any(|s| s.is_empty()) {
            return Err(AuditError::config(format!(
                "substring matcher '{}' contains an empty substring",
                self.license_family_category
            )));
        }
        Ok(())
    }
}

/// The closed set of matcher strategies.
#[derive(Debug, Clone)]
pub enum HeaderMatcher {
    Default(DefaultMatcher),
    Substring(SubstringRule),
}

impl HeaderMatcher {
    fn match_header(&self, raw: &str, normalized: &str) -> Option<LicenseFamily> {
        match self {
            HeaderMatcher::Default(m) => m.match_header(raw, normalized),
            HeaderMatcher::Substring(rule) => rule.matches(raw).then(|| rule.family()),
        }
    }

    fn match_document(&self, kind: DocumentKind) -> Option<LicenseFamily> {
        match self {
            HeaderMatcher::Default(m) => m.match_document(kind),
            HeaderMatcher::Substring(_) => None,
        }
    }
}

/// Ordered matchers evaluated first-match-wins: the default matcher (when
/// enabled) followed by configured rules in declaration order.
#[derive(Debug, Clone)]
pub struct MatcherPipeline {
    matchers: Vec<HeaderMatcher>,
    uses_default: bool,
}

impl MatcherPipeline {
    pub fn new(add_default_matchers: bool, rules: &[SubstringRule]) -> Result<Self> {
        let mut matchers = Vec::with_capacity(rules.len() + 1);
        if add_default_matchers {
            matchers.push(HeaderMatcher::Default(DefaultMatcher::new()));
        }
        for rule in rules {
            rule.validate()?;
            matchers.push(HeaderMatcher::Substring(rule.clone()));
        }

        Ok(Self {
            matchers,
            uses_default: add_default_matchers,
        })
    }

    pub fn matchers(&self) -> &[HeaderMatcher] {
        &self.matchers
    }

    pub fn classify(&self, header: &str) -> Classification {
        // Normalizing is only needed by the default matcher
        let normalized = if self.uses_default {
            normalize_header_text(header)
        } else {
            String::new()
        };

        self.matchers
            .iter()
            .find_map(|m| m.match_header(header, &normalized))
            .map(Classification::Family)
            .unwrap_or(Classification::Unknown)
    }

    /// Classify a whole file: detect its kind, let matchers claim
    /// non-source documents, then match the decoded text.
    pub fn classify_document(&self, path: &str, content: &[u8]) -> (DocumentKind, Classification) {
        let kind = detect_document_kind(path, content);

        if kind != DocumentKind::Standard {
            if let Some(family) = self.matchers.iter().find_map(|m| m.match_document(kind)) {
                return (kind, Classification::Family(family));
            }
        }

        let text = String::from_utf8_lossy(content);
        (kind, self.classify(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::defaults::apache_family;

    const APACHE_HEADER: &str = "Licensed to the Apache Software Foundation (ASF) under one\n\
        or more contributor license agreements.  See the NOTICE file";

    const MIT_SNIPPET: &str = "// Permission is hereby granted, free of charge, to any person obtaining a copy";

    fn mit_rule() -> SubstringRule {
        SubstringRule::new("MIT", "MIT", &["Permission is hereby granted, free of charge"])
    }

    #[test]
    fn test_substring_rule_matches_any() {
        let rule = SubstringRule::new("X", "X License", &["alpha", "beta"]);
        assert!(rule.matches("... beta ..."));
        assert!(rule.matches("alpha"));
        assert!(!rule.matches("ALPHA"));
        assert!(!rule.matches("gamma"));
    }

    #[test]
    fn test_configured_rule_classifies() {
        let pipeline = MatcherPipeline::new(true, &[mit_rule()]).unwrap();
        let classification = pipeline.classify(MIT_SNIPPET);
        assert_eq!(classification.family().map(|f| f.name.as_str()), Some("MIT"));
    }

    #[test]
    fn test_default_matcher_wins_when_both_match() {
        let rule = SubstringRule::new("CUSTOM", "Custom", &["Apache Software Foundation"]);
        let pipeline = MatcherPipeline::new(true, &[rule.clone()]).unwrap();
        assert_eq!(pipeline.classify(APACHE_HEADER), Classification::Family(apache_family()));

        let without_defaults = MatcherPipeline::new(false, &[rule]).unwrap();
        assert_eq!(
            without_defaults.classify(APACHE_HEADER).family().map(|f| f.category.as_str()),
            Some("CUSTOM")
        );
    }

    #[test]
    fn test_rules_evaluated_in_declaration_order() {
        let first = SubstringRule::new("ONE", "One", &["shared"]);
        let second = SubstringRule::new("TWO", "Two", &["shared"]);
        let pipeline = MatcherPipeline::new(false, &[first, second]).unwrap();
        assert_eq!(
            pipeline.classify("a shared header").family().map(|f| f.category.as_str()),
            Some("ONE")
        );
    }

    #[test]
    fn test_disabling_defaults_makes_default_only_files_unknown() {
        let pipeline = MatcherPipeline::new(false, &[mit_rule()]).unwrap();
        assert!(pipeline.classify(APACHE_HEADER).is_unknown());
        assert!(MatcherPipeline::new(false, &[]).unwrap().classify(APACHE_HEADER).is_unknown());
    }

    #[test]
    fn test_no_match_is_unknown() {
        let pipeline = MatcherPipeline::new(true, &[mit_rule()]).unwrap();
        assert!(pipeline.classify("Nothing here.").is_unknown());
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let empty = SubstringRule::new("MIT", "MIT", &[]);
        assert!(MatcherPipeline::new(true, &[empty]).is_err());

        let blank = SubstringRule::new("MIT", "MIT", &[""]);
        assert!(MatcherPipeline::new(true, &[blank]).is_err());

        let nameless = SubstringRule::new("MIT", " ", &["x"]);
        assert!(MatcherPipeline::new(true, &[nameless]).is_err());
    }

    #[test]
    fn test_classify_document_exempts_binaries_only_with_defaults() {
        let with_defaults = MatcherPipeline::new(true, &[]).unwrap();
        let (kind, classification) = with_defaults.classify_document("logo.png", b"\x89PNG\0\0");
        assert_eq!(kind, DocumentKind::Binary);
        assert_eq!(classification.family().map(|f| f.category.as_str()), Some("BIN"));

        let without = MatcherPipeline::new(false, &[]).unwrap();
        let (kind, classification) = without.classify_document("logo.png", b"\x89PNG\0\0");
        assert_eq!(kind, DocumentKind::Binary);
        assert!(classification.is_unknown());
    }
}
