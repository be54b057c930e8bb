//! Lexical language classification.
//!
//! Detection runs in two steps: a keyword/marker frequency classifier picks a
//! language label for the snippet, then the label is mapped onto a
//! [`SourceLanguage`] through [`LANGUAGE_TABLE`] (case-insensitive substring
//! match, first entry wins).

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

use super::SourceLanguage;

/// Label produced when no profile scores high enough.
pub const UNCLASSIFIED_LABEL: &str = "Text only";

/// Minimum score a profile needs before its label is used.
const MIN_SCORE: u32 = 2;

/// Label-to-language lookup, checked in order.
///
/// `c` sits last because it is a substring of several other labels.
pub const LANGUAGE_TABLE: &[(&str, SourceLanguage)] = &[
    ("python", SourceLanguage::Python),
    ("javascript", SourceLanguage::JavaScript),
    ("typescript", SourceLanguage::TypeScript),
    ("java", SourceLanguage::Java),
    ("c++", SourceLanguage::Cpp),
    ("php", SourceLanguage::Php),
    ("ruby", SourceLanguage::Ruby),
    ("go", SourceLanguage::Go),
    ("rust", SourceLanguage::Rust),
    ("swift", SourceLanguage::Swift),
    ("c", SourceLanguage::C),
];

static PYTHON_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "def" => 3, "elif" => 4, "self" => 2, "None" => 2, "True" => 1, "False" => 1,
    "import" => 1, "lambda" => 2, "pass" => 2, "print" => 1, "__init__" => 3,
    "__name__" => 3, "range" => 1, "except" => 2, "raise" => 1, "yield" => 1,
};

static JAVASCRIPT_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "function" => 3, "const" => 2, "let" => 2, "var" => 2, "console" => 3,
    "undefined" => 3, "null" => 1, "document" => 3, "window" => 3, "require" => 3,
    "await" => 1, "async" => 1, "this" => 1, "prototype" => 3,
};

static TYPESCRIPT_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "interface" => 3, "readonly" => 3, "namespace" => 2, "implements" => 1,
    "declare" => 3, "keyof" => 4, "unknown" => 1, "const" => 1, "let" => 1,
    "function" => 1,
};

static JAVA_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "public" => 2, "private" => 2, "protected" => 2, "static" => 1, "void" => 2,
    "extends" => 2, "implements" => 2, "final" => 2, "throws" => 3, "package" => 2,
    "String" => 2, "System" => 3, "new" => 1,
};

static CPP_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "std" => 4, "cout" => 4, "cin" => 3, "endl" => 4, "namespace" => 2,
    "template" => 3, "typename" => 3, "virtual" => 3, "nullptr" => 4, "vector" => 2,
};

static C_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "printf" => 4, "scanf" => 4, "malloc" => 4, "free" => 2, "int" => 1, "char" => 1,
    "struct" => 1, "sizeof" => 2, "NULL" => 2, "typedef" => 3, "unsigned" => 2,
};

static PHP_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "echo" => 3, "foreach" => 2, "array" => 2, "function" => 1,
};

static RUBY_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "end" => 3, "puts" => 4, "elsif" => 5, "unless" => 3, "attr_accessor" => 5,
    "module" => 2, "nil" => 3, "def" => 1, "require" => 1, "do" => 1,
};

static GO_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "func" => 4, "package" => 2, "fmt" => 3, "chan" => 4, "defer" => 4, "nil" => 2,
    "make" => 2, "err" => 2, "go" => 1,
};

static RUST_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "fn" => 4, "mut" => 4, "impl" => 4, "pub" => 3, "trait" => 3, "crate" => 3,
    "Self" => 2, "Option" => 2, "Result" => 2, "Some" => 2, "Ok" => 2, "Err" => 2,
    "unwrap" => 3, "Vec" => 3, "match" => 2, "let" => 1,
};

static SWIFT_KEYWORDS: phf::Map<&'static str, u32> = phf_map! {
    "func" => 2, "guard" => 4, "extension" => 3, "protocol" => 3, "nil" => 2,
    "override" => 2, "let" => 1, "var" => 1, "init" => 1,
};

/// Scoring profile for one classifier label.
struct Profile {
    label: &'static str,
    keywords: &'static phf::Map<&'static str, u32>,
    /// (pattern, weight) pairs; each match adds the weight once.
    markers: Vec<(Regex, u32)>,
}

fn profile(
    label: &'static str,
    keywords: &'static phf::Map<&'static str, u32>,
    markers: &[(&str, u32)],
) -> Profile {
    Profile {
        label,
        keywords,
        markers: markers
            .iter()
            .map(|(pattern, weight)| (Regex::new(pattern).unwrap(), *weight))
            .collect(),
    }
}

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();

    /// Classifier profiles. Ties go to the earlier profile.
    static ref PROFILES: Vec<Profile> = vec![
        profile("Python", &PYTHON_KEYWORDS, &[
            (r"(?m)^\s*def \w+\(.*\)\s*(->.*)?:\s*$", 4),
            (r"(?m)^\s*(if|for|while|elif|else|try|except|with|class)\b.*:\s*$", 2),
            (r"(?m)^\s*from [\w.]+ import ", 4),
            (r"(?m)^\s*import [\w.]+(\s+as\s+\w+)?\s*$", 2),
        ]),
        profile("JavaScript", &JAVASCRIPT_KEYWORDS, &[
            (r"=>", 2),
            (r"===|!==", 3),
            (r"console\.log\(", 3),
            (r"module\.exports", 4),
        ]),
        profile("TypeScript", &TYPESCRIPT_KEYWORDS, &[
            (r":\s*(string|number|boolean|any|void)\b", 4),
            (r"(?m)^\s*(export\s+)?type\s+\w+\s*=", 4),
        ]),
        profile("Java", &JAVA_KEYWORDS, &[
            (r"System\.out\.print", 4),
            (r"public\s+static\s+void\s+main", 6),
            (r"(?m)^\s*import\s+[\w.]+(\.\*)?;", 3),
            (r"@Override", 4),
        ]),
        profile("C++", &CPP_KEYWORDS, &[
            (r"#include\s*<", 3),
            (r"std::", 4),
            (r"<<", 1),
        ]),
        profile("C", &C_KEYWORDS, &[
            (r#"#include\s*[<"]"#, 3),
            (r"int\s+main\s*\(", 4),
            (r"->", 1),
        ]),
        profile("PHP", &PHP_KEYWORDS, &[
            (r"<\?php", 10),
            (r"\$\w+", 2),
        ]),
        profile("Ruby", &RUBY_KEYWORDS, &[
            (r"(?m)^\s*end\s*$", 2),
            (r"\|\w+(,\s*\w+)*\|", 3),
        ]),
        profile("Go", &GO_KEYWORDS, &[
            (r":=", 3),
            (r"fmt\.Print", 4),
            (r"(?m)^package\s+\w+\s*$", 4),
        ]),
        profile("Rust", &RUST_KEYWORDS, &[
            (r"println!\(", 5),
            (r"&mut\s", 4),
            (r"#\[derive", 5),
            (r"->", 1),
        ]),
        profile("Swift", &SWIFT_KEYWORDS, &[
            (r"import\s+(UIKit|Foundation|SwiftUI)", 8),
            (r"\bfunc\s+\w+\(.*\)\s*->", 2),
        ]),
    ];
}

impl Profile {
    fn score(&self, source: &str) -> u32 {
        let keyword_score: u32 = IDENTIFIER
            .find_iter(source)
            .filter_map(|token| self.keywords.get(token.as_str()))
            .sum();

        let marker_score: u32 = self
            .markers
            .iter()
            .map(|(re, weight)| re.find_iter(source).count() as u32 * weight)
            .sum();

        keyword_score + marker_score
    }
}

/// Classify source text into a language label.
///
/// Returns [`UNCLASSIFIED_LABEL`] when no profile reaches the minimum score.
pub fn classify(source: &str) -> &'static str {
    let mut best: Option<(&'static str, u32)> = None;

    for profile in PROFILES.iter() {
        let score = profile.score(source);
        if score < MIN_SCORE {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((profile.label, score)),
        }
    }

    best.map(|(label, _)| label).unwrap_or(UNCLASSIFIED_LABEL)
}

/// Map a classifier label onto a language through [`LANGUAGE_TABLE`].
pub fn label_to_language(label: &str) -> SourceLanguage {
    let label = label.to_lowercase();
    LANGUAGE_TABLE
        .iter()
        .find(|(key, _)| label.contains(key))
        .map(|(_, lang)| *lang)
        .unwrap_or(SourceLanguage::Unknown)
}

/// Detect the language of a snippet. Never fails; ambiguity yields `Unknown`.
pub fn detect(source: &str) -> SourceLanguage {
    let label = classify(source);
    let language = label_to_language(label);
    tracing::debug!(label, language = %language, "classified source");
    language
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_python() {
        let source = r#"
import os
from collections import OrderedDict

def main(args):
    if args:
        print(args)
    return None
"#;
        assert_eq!(detect(source), SourceLanguage::Python);
    }

    #[test]
    fn test_detect_javascript() {
        let source = r#"
const express = require('express');
function handler(req, res) {
    console.log(req.body);
    return res.status === 200;
}
"#;
        assert_eq!(detect(source), SourceLanguage::JavaScript);
    }

    #[test]
    fn test_detect_java() {
        let source = r#"
public class Main {
    public static void main(String[] args) {
        System.out.println("hi");
    }
}
"#;
        assert_eq!(detect(source), SourceLanguage::Java);
    }

    #[test]
    fn test_detect_rust() {
        let source = r#"
pub fn parse(input: &mut String) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    println!("{}", input);
    Ok(out)
}
"#;
        assert_eq!(detect(source), SourceLanguage::Rust);
    }

    #[test]
    fn test_detect_go() {
        let source = r#"
package main

import "fmt"

func main() {
    x := 1
    fmt.Println(x)
}
"#;
        assert_eq!(detect(source), SourceLanguage::Go);
    }

    #[test]
    fn test_detect_unknown_for_prose() {
        assert_eq!(detect("hello there, general"), SourceLanguage::Unknown);
        assert_eq!(detect(""), SourceLanguage::Unknown);
    }

    #[test]
    fn test_label_mapping_is_ordered() {
        assert_eq!(label_to_language("C++"), SourceLanguage::Cpp);
        assert_eq!(label_to_language("JavaScript+Genshi"), SourceLanguage::JavaScript);
        assert_eq!(label_to_language("TypeScript"), SourceLanguage::TypeScript);
        assert_eq!(label_to_language("Objective-C"), SourceLanguage::C);
        assert_eq!(label_to_language(UNCLASSIFIED_LABEL), SourceLanguage::Unknown);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let source = "def f(x):\n    return x\n";
        let first = detect(source);
        for _ in 0..5 {
            assert_eq!(detect(source), first);
        }
    }
}
