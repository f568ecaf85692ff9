//! Legibility rewrites applied to SVG markup before rendering.
//!
//! This is a text-level hack for constrained renderers, not an SVG normalizer:
//! designed colors and transparency are sacrificed so that light overlays, text
//! and thin strokes stay visible. Rules run in order, and the whole pass repeats
//! until the markup stops changing, so `preprocess` is idempotent even when a
//! deletion splices its neighbours into a new match.

use crate::Result;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// One ordered rewrite.
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    pub fn apply<'a>(&self, svg: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(svg, self.replacement)
    }

    pub fn is_match(&self, svg: &str) -> bool {
        self.pattern.is_match(svg)
    }
}

static RULES: LazyLock<std::result::Result<Vec<Rule>, regex::Error>> = LazyLock::new(|| {
    Ok(vec![
        Rule::new(
            "light-gray-rgba",
            r"rgba\(\s*204\s*,\s*204\s*,\s*204\s*,\s*[\d.]+\s*\)",
            "#333333",
        )?,
        Rule::new("light-literal-cccccc", r"(?i)#cccccc\b", "#333333")?,
        Rule::new("light-literal-e5e5e5", r"(?i)#e5e5e5\b", "#333333")?,
        Rule::new("light-literal-f0f0f0", r"(?i)#f0f0f0\b", "#666666")?,
        Rule::new(
            "light-literal-rgba-229",
            r"rgba\(\s*229\s*,\s*229\s*,\s*229\s*,\s*1\s*\)",
            "#333333",
        )?,
        Rule::new(
            "text-fill-black",
            r#"(<(?:text|tspan|textPath)\b[^>]*?\sfill\s*=\s*)(?:"[^"]*"|'[^']*')"#,
            r##"${1}"#000000""##,
        )?,
        Rule::new("stroke-width-2px", r"stroke-width:\s*[\d.]*px", "stroke-width: 2px")?,
        Rule::new("strip-opacity", r"opacity:\s*[\d.]+;?", "")?,
    ])
});

/// The rewrite rules in application order.
pub fn rules() -> Result<&'static [Rule]> {
    match &*RULES {
        Ok(rules) => Ok(rules),
        Err(e) => Err(e.clone().into()),
    }
}

/// Run every rule over `svg`, in order, until a full pass changes nothing.
pub fn preprocess(svg: &str) -> Result<String> {
    let rules = rules()?;
    let mut out = svg.to_string();
    loop {
        let mut changed = false;
        for rule in rules {
            if let Cow::Owned(rewritten) = rule.apply(&out) {
                changed |= rewritten != out;
                out = rewritten;
            }
        }
        if !changed {
            return Ok(out);
        }
    }
}
