//! Drafting templates keyed by legal domain.
//!
//! Lookup rule: a domain resolves to the template registered under its
//! lowercase name, or through an alias; any other domain resolves to the
//! generic template. The generic template always exists.

use std::collections::HashMap;

use crate::types::state::LegalMatter;

/// Key of the template every unmapped domain falls back to.
pub const GENERIC_TEMPLATE_KEY: &str = "generic";

pub const BANKING_TEMPLATE_KEY: &str = "banking";

pub const CONSUMER_TEMPLATE_KEY: &str = "consumer";

/// Drafting instructions shared by every domain.
pub const GENERIC_TEMPLATE: &str = r#"You are a judicial assistant drafting a decision for a Brazilian court.

You receive a <case> document with the full case text, a FIRAC analysis, and
retrieved legal context. Draft the decision in three parts:

1. RELATÓRIO: a neutral summary of the parties, claims and procedural history.
2. FUNDAMENTAÇÃO: the legal reasoning, citing only statutes and precedents
   present in the case text or the retrieved context.
3. DISPOSITIVO: the operative ruling, item by item.

When the retrieval status is "unavailable", rely on the case text and the
analysis only. Never invent case numbers or citations."#;

/// Drafting instructions for banking disputes.
pub const BANKING_TEMPLATE: &str = r#"You are a judicial assistant drafting a decision in a banking dispute before a Brazilian court.

You receive a <case> document with the full case text, a FIRAC analysis, and
retrieved legal context. Draft RELATÓRIO, FUNDAMENTAÇÃO and DISPOSITIVO.

In the FUNDAMENTAÇÃO, address when relevant: the application of the Consumer
Defense Code to financial institutions, interest rates against the market
average, capitalization of interest, and fees charged without contractual
basis. Cite only statutes and precedents present in the case text or the
retrieved context. Never invent case numbers or citations."#;

/// Drafting instructions for consumer disputes.
pub const CONSUMER_TEMPLATE: &str = r#"You are a judicial assistant drafting a decision in a consumer dispute before a Brazilian court.

You receive a <case> document with the full case text, a FIRAC analysis, and
retrieved legal context. Draft RELATÓRIO, FUNDAMENTAÇÃO and DISPOSITIVO.

In the FUNDAMENTAÇÃO, address when relevant: strict liability of the
supplier, reversal of the burden of proof, abusive clauses, and moral
damages. Cite only statutes and precedents present in the case text or the
retrieved context. Never invent case numbers or citations."#;

/// Registry of drafting templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    generic: String,
    templates: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Registry with the built-in templates.
    ///
    /// Every [`LegalMatter`] is aliased to the generic template.
    pub fn new() -> Self {
        let registry = Self {
            generic: GENERIC_TEMPLATE.to_string(),
            templates: HashMap::new(),
            aliases: HashMap::new(),
        }
        .register(BANKING_TEMPLATE_KEY, BANKING_TEMPLATE)
        .register(CONSUMER_TEMPLATE_KEY, CONSUMER_TEMPLATE);

        LegalMatter::ALL
            .into_iter()
            .fold(registry, |r, matter| r.alias(matter.as_str(), GENERIC_TEMPLATE_KEY))
    }

    /// Register a template under `key`, replacing any existing one.
    ///
    /// Registering under [`GENERIC_TEMPLATE_KEY`] replaces the fallback.
    pub fn register(mut self, key: &str, template: impl Into<String>) -> Self {
        let key = normalize(key);
        let template = template.into();
        if key == GENERIC_TEMPLATE_KEY {
            self.generic = template;
        } else {
            self.templates.insert(key, template);
        }
        self
    }

    /// Resolve `domain` through the template registered under `key`.
    pub fn alias(mut self, domain: &str, key: &str) -> Self {
        self.aliases.insert(normalize(domain), normalize(key));
        self
    }

    /// Template for a domain name (case-insensitive).
    pub fn resolve(&self, domain: &str) -> &str {
        let domain = normalize(domain);
        let key = self.aliases.get(&domain).unwrap_or(&domain);
        self.templates
            .get(key)
            .map(String::as_str)
            .unwrap_or(self.generic.as_str())
    }

    /// Template for a router legal matter.
    pub fn for_matter(&self, matter: LegalMatter) -> &str {
        self.resolve(matter.as_str())
    }

    /// Whether `domain` resolves to something other than the generic template.
    pub fn has_specific(&self, domain: &str) -> bool {
        let domain = normalize(domain);
        let key = self.aliases.get(&domain).unwrap_or(&domain);
        self.templates.contains_key(key)
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_resolve_case_insensitively() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.resolve("BANKING"), BANKING_TEMPLATE);
        assert_eq!(registry.resolve(" Consumer "), CONSUMER_TEMPLATE);
        assert_eq!(registry.resolve("generic"), GENERIC_TEMPLATE);
    }

    #[test]
    fn test_legal_matters_map_to_generic() {
        let registry = TemplateRegistry::new();
        for matter in LegalMatter::ALL {
            assert_eq!(registry.for_matter(matter), GENERIC_TEMPLATE);
            assert!(!registry.has_specific(matter.as_str()));
        }
    }

    #[test]
    fn test_unmapped_domain_falls_back_to_generic() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.resolve("maritime"), GENERIC_TEMPLATE);
        assert_eq!(registry.resolve(""), GENERIC_TEMPLATE);
    }

    #[test]
    fn test_custom_registration_and_alias() {
        let registry = TemplateRegistry::new()
            .register("Tax", "tax drafting rules")
            .alias("tax", "tax");
        assert_eq!(registry.for_matter(LegalMatter::Tax), "tax drafting rules");

        let rerouted = TemplateRegistry::new().alias("civil", "banking");
        assert_eq!(rerouted.for_matter(LegalMatter::Civil), BANKING_TEMPLATE);
        assert!(rerouted.has_specific("CIVIL"));
    }

    #[test]
    fn test_generic_can_be_replaced() {
        let registry = TemplateRegistry::new().register("GENERIC", "house style");
        assert_eq!(registry.resolve("unknown"), "house style");
        assert_eq!(registry.for_matter(LegalMatter::Labor), "house style");
    }
}
