//! Line-level comment templates for languages with a local table.

use lazy_static::lazy_static;
use regex::Regex;

/// Ordered (pattern, template) rules plus the language's comment syntax.
///
/// Templates use `${n}` to refer to capture groups of their pattern.
pub struct TemplateTable {
    /// Prefix written before each synthetic comment.
    pub marker: &'static str,
    /// Lines whose trimmed form starts with any of these are left alone.
    pub skip_prefixes: &'static [&'static str],
    pub rules: Vec<(Regex, &'static str)>,
}

fn table(
    marker: &'static str,
    skip_prefixes: &'static [&'static str],
    rules: &[(&str, &'static str)],
) -> TemplateTable {
    TemplateTable {
        marker,
        skip_prefixes,
        rules: rules
            .iter()
            .map(|(pattern, template)| (Regex::new(pattern).unwrap(), *template))
            .collect(),
    }
}

lazy_static! {
    pub static ref PYTHON_TEMPLATES: TemplateTable = table("#", &["#"], &[
        (r"^import\s+(.+)", "Import ${1} module"),
        (r"^from\s+(.+)\s+import\s+(.+)", "Import ${2} from ${1}"),
        (r"^def\s+(\w+)\s*\(", "Define function ${1}"),
        (r"^class\s+(\w+)", "Define class ${1}"),
        (r"^if\s+", "Conditional statement"),
        (r"^elif\s+", "Alternative condition"),
        (r"^else\s*:", "Default case"),
        (r"^for\s+", "Loop iteration"),
        (r"^while\s+", "While loop"),
        (r"^try\s*:", "Exception handling block"),
        (r"^except\s+", "Handle specific exception"),
        (r"^finally\s*:", "Cleanup code"),
        (r"^with\s+", "Context manager"),
        (r"^return\s+", "Return value from function"),
        (r"^print\s*\(", "Output to console"),
        (r"^(\w+)\s*=\s*(.+)", "Assign value to ${1}"),
    ]);

    pub static ref JAVASCRIPT_TEMPLATES: TemplateTable = table("//", &["//", "/*"], &[
        (r"^function\s+(\w+)\s*\(", "Define function ${1}"),
        (r"^const\s+(\w+)\s*=", "Declare constant ${1}"),
        (r"^let\s+(\w+)\s*=", "Declare variable ${1}"),
        (r"^var\s+(\w+)\s*=", "Declare variable ${1}"),
        (r"^if\s*\(", "Conditional statement"),
        (r"^else\s+if\s*\(", "Alternative condition"),
        (r"^else\s*\{", "Default case"),
        (r"^for\s*\(", "For loop"),
        (r"^while\s*\(", "While loop"),
        (r"^try\s*\{", "Exception handling block"),
        (r"^catch\s*\(", "Handle exception"),
        (r"^finally\s*\{", "Cleanup code"),
        (r"^return\s+", "Return value"),
        (r"^console\.log\s*\(", "Log to console"),
        (r"^import\s+", "Import module"),
        (r"^export\s+", "Export module/function"),
    ]);
}

impl TemplateTable {
    /// Render the comment for a trimmed line, first matching rule wins.
    pub fn comment_for(&self, trimmed: &str) -> Option<String> {
        self.rules.iter().find_map(|(re, template)| {
            re.captures(trimmed).map(|caps| {
                let mut rendered = String::new();
                caps.expand(template, &mut rendered);
                rendered
            })
        })
    }

    /// Insert a comment line above every line a rule matches.
    ///
    /// Original lines are kept verbatim and in order; each synthetic line
    /// reuses its target line's leading whitespace.
    pub fn annotate(&self, source: &str) -> String {
        let mut out: Vec<String> = Vec::new();

        for line in source.split('\n') {
            let trimmed = line.trim();
            let skip = trimmed.is_empty()
                || self.skip_prefixes.iter().any(|p| trimmed.starts_with(p));

            if !skip {
                if let Some(comment) = self.comment_for(trimmed) {
                    let indent = &line[..line.len() - line.trim_start().len()];
                    out.push(format!("{}{} {}", indent, self.marker, comment));
                }
            }
            out.push(line.to_string());
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_gets_one_comment_above() {
        let out = PYTHON_TEMPLATES.annotate("import os");
        assert_eq!(out, "# Import os module\nimport os");
    }

    #[test]
    fn test_python_rules_in_order() {
        let t = &*PYTHON_TEMPLATES;
        assert_eq!(
            t.comment_for("from os import path").as_deref(),
            Some("Import path from os")
        );
        assert_eq!(
            t.comment_for("def main(argv):").as_deref(),
            Some("Define function main")
        );
        assert_eq!(
            t.comment_for("class Parser(Base):").as_deref(),
            Some("Define class Parser")
        );
        assert_eq!(t.comment_for("else:").as_deref(), Some("Default case"));
        assert_eq!(
            t.comment_for("return x").as_deref(),
            Some("Return value from function")
        );
        assert_eq!(
            t.comment_for("total = a + b").as_deref(),
            Some("Assign value to total")
        );
        assert_eq!(t.comment_for("pass"), None);
        assert_eq!(t.comment_for("foo(bar)"), None);
    }

    #[test]
    fn test_indentation_preserved() {
        let source = "def f(x):\n\tif x:\n\t\treturn 1\n    pass";
        let out = PYTHON_TEMPLATES.annotate(source);
        let expected = "# Define function f\ndef f(x):\n\t# Conditional statement\n\tif x:\n\t\t# Return value from function\n\t\treturn 1\n    pass";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_existing_comments_and_blank_lines_untouched() {
        let source = "# already = documented\n\n   \nx = 1";
        let out = PYTHON_TEMPLATES.annotate(source);
        assert_eq!(out, "# already = documented\n\n   \n# Assign value to x\nx = 1");
    }

    #[test]
    fn test_javascript_table() {
        let source = "// header\nconst app = express();\n/* block */\n  console.log(app);\n} else {";
        let out = JAVASCRIPT_TEMPLATES.annotate(source);
        assert_eq!(
            out,
            "// header\n// Declare constant app\nconst app = express();\n/* block */\n  // Log to console\n  console.log(app);\n} else {"
        );
    }

    #[test]
    fn test_javascript_else_if_not_shadowed() {
        assert_eq!(
            JAVASCRIPT_TEMPLATES.comment_for("else if (x) {").as_deref(),
            Some("Alternative condition")
        );
        assert_eq!(
            JAVASCRIPT_TEMPLATES.comment_for("else {").as_deref(),
            Some("Default case")
        );
    }

    #[test]
    fn test_original_lines_survive_verbatim() {
        let source = "import os  \r\nvalue = 3\n";
        let out = PYTHON_TEMPLATES.annotate(source);
        let originals: Vec<_> = out.split('\n').filter(|l| !l.trim_start().starts_with('#')).collect();
        assert_eq!(originals, vec!["import os  \r", "value = 3", ""]);
    }
}
