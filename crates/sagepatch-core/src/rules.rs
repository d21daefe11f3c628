//! Ordered substitution rules applied to the build script text.
//!
//! Each rule is a compiled matcher plus a literal replacement. Rules run in
//! sequence and every rule sees the output of the previous one.

use crate::config::PatchConfig;
use crate::error::{PatchError, Result};
use crate::types::{MatchMode, RuleOutcome};
use regex::{NoExpand, Regex};

pub const CAPABILITY_INIT_RULE: &str = "capability-init";
pub const GPU_GUARD_RULE: &str = "gpu-guard";

const CAPABILITY_VAR: &str = "compute_capabilities";
const EMPTY_INIT_LITERAL: &str = "compute_capabilities = set()";
const EMPTY_INIT_TOLERANT: &str = r"compute_capabilities\s*=\s*set\(\)";
const GUARD_LITERAL: &str = "if not compute_capabilities:";
const GUARD_TOLERANT: &str = r"if\s+not\s+compute_capabilities:";
const DISABLED_GUARD: &str = "if False:";

#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pub name: &'static str,
    pub description: &'static str,
    matcher: Regex,
    replacement: String,
}

impl SubstitutionRule {
    pub fn new(
        name: &'static str,
        description: &'static str,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let matcher = Regex::new(pattern)
            .map_err(|e| PatchError::InvalidConfig(format!("rule '{}': {}", name, e)))?;
        Ok(Self {
            name,
            description,
            matcher,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces every match, returning the new text and the number of matches.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let count = self.matcher.find_iter(text).count();
        if count == 0 {
            return (text.to_string(), 0);
        }
        let replaced = self
            .matcher
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned();
        (replaced, count)
    }
}

pub fn render_capability_set(capabilities: &[String]) -> String {
    let items: Vec<String> = capabilities.iter().map(|c| format!("\"{}\"", c)).collect();
    format!("{} = {{ {} }}", CAPABILITY_VAR, items.join(", "))
}

fn validate_capabilities(capabilities: &[String]) -> Result<()> {
    if capabilities.is_empty() {
        return Err(PatchError::InvalidConfig(
            "capability list must not be empty".to_string(),
        ));
    }
    for cap in capabilities {
        if cap.trim().is_empty()
            || cap.contains('"')
            || cap.contains('\\')
            || cap.chars().any(char::is_control)
        {
            return Err(PatchError::InvalidConfig(format!(
                "invalid capability token {:?}",
                cap
            )));
        }
    }
    Ok(())
}

pub fn build_rules(config: &PatchConfig) -> Result<Vec<SubstitutionRule>> {
    validate_capabilities(&config.capabilities)?;

    let (init_pattern, guard_pattern) = match config.match_mode {
        MatchMode::Tolerant => (EMPTY_INIT_TOLERANT.to_string(), GUARD_TOLERANT.to_string()),
        MatchMode::Strict => (regex::escape(EMPTY_INIT_LITERAL), regex::escape(GUARD_LITERAL)),
    };

    Ok(vec![
        SubstitutionRule::new(
            CAPABILITY_INIT_RULE,
            "compute_capabilities init",
            &init_pattern,
            render_capability_set(&config.capabilities),
        )?,
        SubstitutionRule::new(
            GPU_GUARD_RULE,
            "GPU check block",
            &guard_pattern,
            DISABLED_GUARD,
        )?,
    ])
}

pub fn apply_rules(text: &str, rules: &[SubstitutionRule]) -> (String, Vec<RuleOutcome>) {
    let mut current = text.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let (next, count) = rule.apply(&current);
        outcomes.push(RuleOutcome {
            rule: rule.name,
            count,
        });
        current = next;
    }

    (current, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETUP_SNIPPET: &str = "compute_capabilities = set()\n\
        for i in range(device_count):\n    compute_capabilities.add(cap)\n\
        if not compute_capabilities:\n    raise RuntimeError(\"No GPUs found.\")\n";

    fn default_rules() -> Vec<SubstitutionRule> {
        build_rules(&PatchConfig::default()).unwrap()
    }

    fn strict_rules() -> Vec<SubstitutionRule> {
        let config = PatchConfig {
            match_mode: MatchMode::Strict,
            ..PatchConfig::default()
        };
        build_rules(&config).unwrap()
    }

    #[test]
    fn test_render_capability_set() {
        let caps: Vec<String> = vec!["8.0".into(), "8.6".into(), "8.9".into(), "9.0".into()];
        assert_eq!(
            render_capability_set(&caps),
            "compute_capabilities = { \"8.0\", \"8.6\", \"8.9\", \"9.0\" }"
        );
        assert_eq!(
            render_capability_set(&["9.0".to_string()]),
            "compute_capabilities = { \"9.0\" }"
        );
    }

    #[test]
    fn test_rule_order_and_names() {
        let rules = default_rules();
        let names: Vec<&str> = rules.iter().map(|r| r.name).collect();
        assert_eq!(names, vec![CAPABILITY_INIT_RULE, GPU_GUARD_RULE]);
        assert_eq!(rules[1].replacement(), "if False:");
    }

    #[test]
    fn test_apply_rules_concrete_scenario() {
        let (out, outcomes) = apply_rules(SETUP_SNIPPET, &default_rules());
        assert!(out.contains("compute_capabilities = { \"8.0\", \"8.6\", \"8.9\", \"9.0\" }"));
        assert!(out.contains("if False:\n    raise RuntimeError"));
        assert!(!out.contains("set()"));
        assert!(!out.contains("if not compute_capabilities:"));
        assert!(out.contains("compute_capabilities.add(cap)"));
        assert_eq!(
            outcomes,
            vec![
                RuleOutcome {
                    rule: CAPABILITY_INIT_RULE,
                    count: 1
                },
                RuleOutcome {
                    rule: GPU_GUARD_RULE,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let text = "if not compute_capabilities:\n    a()\nif  not   compute_capabilities:\n    b()\nif not\tcompute_capabilities:\n";
        let (out, outcomes) = apply_rules(text, &default_rules());
        assert_eq!(outcomes[0].count, 0);
        assert_eq!(outcomes[1].count, 3);
        assert_eq!(out.matches("if False:").count(), 3);
        assert!(!out.contains("compute_capabilities:"));
    }

    #[test]
    fn test_tolerant_vs_strict_spacing() {
        let text = "compute_capabilities=set()\nif  not compute_capabilities:\n";

        let (out, outcomes) = apply_rules(text, &default_rules());
        assert_eq!(outcomes[0].count, 1);
        assert_eq!(outcomes[1].count, 1);
        assert!(out.starts_with("compute_capabilities = { \"8.0\""));

        let (out, outcomes) = apply_rules(text, &strict_rules());
        assert_eq!(outcomes[0].count, 0);
        assert_eq!(outcomes[1].count, 0);
        assert_eq!(out, text);
    }

    #[test]
    fn test_strict_matches_exact_literals() {
        let (out, outcomes) = apply_rules(SETUP_SNIPPET, &strict_rules());
        assert_eq!(outcomes[0].count, 1);
        assert_eq!(outcomes[1].count, 1);
        assert!(out.contains("if False:"));
    }

    #[test]
    fn test_reapplication_is_stable() {
        let rules = default_rules();
        let (once, _) = apply_rules(SETUP_SNIPPET, &rules);
        let (twice, outcomes) = apply_rules(&once, &rules);
        assert_eq!(once, twice);
        assert!(outcomes.iter().all(|o| o.count == 0));
    }

    #[test]
    fn test_replacement_is_literal() {
        let rule = SubstitutionRule::new("dollar", "literal", "x", "$1 ${name}").unwrap();
        let (out, count) = rule.apply("axb");
        assert_eq!(count, 1);
        assert_eq!(out, "a$1 ${name}b");
    }

    #[test]
    fn test_invalid_capabilities_rejected() {
        let empty = PatchConfig {
            capabilities: vec![],
            ..PatchConfig::default()
        };
        assert!(matches!(
            build_rules(&empty),
            Err(PatchError::InvalidConfig(_))
        ));

        for bad in ["8.0\n", "9.0\t", "8.6\r"] {
            let config = PatchConfig {
                capabilities: vec![bad.to_string()],
                ..PatchConfig::default()
            };
            assert!(
                matches!(build_rules(&config), Err(PatchError::InvalidConfig(_))),
                "{:?} should be rejected",
                bad
            );
        }

        let quoted = PatchConfig {
            capabilities: vec!["8.0\"".to_string()],
            ..PatchConfig::default()
        };
        assert!(matches!(
            build_rules(&quoted),
            Err(PatchError::InvalidConfig(_))
        ));
    }
}
