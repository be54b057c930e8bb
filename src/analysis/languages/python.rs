//! Python structural analyzer using tree-sitter.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

use crate::analysis::facts::{count_lines, format_signature};
use crate::analysis::{AnalysisError, StructuralAnalyzer, StructuralFacts};

const DECLARATION_QUERY: &str = r#"
; Function definitions (sync and async, nested included)
(function_definition
  name: (identifier) @func_name
  parameters: (parameters) @params
) @function

; Class definitions
(class_definition
  name: (identifier) @class_name
) @class
"#;

/// Node kinds that add one to a function's complexity.
///
/// `elif_clause` is counted because an elif is a nested `if` in Python's own
/// grammar.
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "with_statement",
    "try_statement",
    "except_clause",
    "except_group_clause",
];

/// Python 2 statement forms the grammar still accepts but Python 3 rejects.
const LEGACY_STATEMENT_KINDS: &[&str] = &["print_statement", "exec_statement"];

/// A function or class found by the declaration query.
enum Declaration {
    Function {
        start: usize,
        signature: String,
        complexity: u32,
    },
    Class {
        start: usize,
        name: String,
    },
}

impl Declaration {
    fn start(&self) -> usize {
        match self {
            Declaration::Function { start, .. } | Declaration::Class { start, .. } => *start,
        }
    }
}

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn extract_declarations(
        &self,
        tree: &Tree,
        source: &[u8],
    ) -> Result<Vec<Declaration>, AnalysisError> {
        let query = Query::new(&self.language, DECLARATION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source);

        let mut declarations = Vec::new();

        while let Some(m) = matches.next() {
            let mut func_name = None;
            let mut params = None;
            let mut func_node = None;
            let mut class_name = None;
            let mut class_node = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "func_name" => func_name = Some(node_text(capture.node, source)),
                    "params" => params = Some(capture.node),
                    "function" => func_node = Some(capture.node),
                    "class_name" => class_name = Some(node_text(capture.node, source)),
                    "class" => class_node = Some(capture.node),
                    _ => {}
                }
            }

            if let (Some(name), Some(params), Some(node)) = (func_name, params, func_node) {
                declarations.push(Declaration::Function {
                    start: node.start_byte(),
                    signature: format_signature(name, &parameter_names(params, source)),
                    complexity: 1 + count_branches(node),
                });
            } else if let (Some(name), Some(node)) = (class_name, class_node) {
                declarations.push(Declaration::Class {
                    start: node.start_byte(),
                    name: name.to_string(),
                });
            }
        }

        declarations.sort_by_key(|d| d.start());
        Ok(declarations)
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralAnalyzer for PythonAnalyzer {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn analyze(&self, source: &str) -> Result<StructuralFacts, AnalysisError> {
        let mut parser = self.create_parser()?;
        let bytes = source.as_bytes();

        let tree = match parser.parse(bytes, None) {
            Some(tree) if parses_as_python3(tree.root_node()) => tree,
            _ => {
                tracing::debug!("python source did not parse cleanly, reporting empty facts");
                return Ok(StructuralFacts::empty());
            }
        };

        let mut facts = StructuralFacts {
            lines: count_lines(source),
            imports: collect_imports(tree.root_node(), bytes),
            ..StructuralFacts::default()
        };

        for decl in self.extract_declarations(&tree, bytes)? {
            match decl {
                Declaration::Function {
                    signature,
                    complexity,
                    ..
                } => {
                    facts.functions.push(signature);
                    facts.complexity += complexity;
                }
                Declaration::Class { name, .. } => facts.classes.push(name),
            }
        }

        Ok(facts)
    }
}

/// False for trees with error nodes or Python 2 only statements.
fn parses_as_python3(root: Node) -> bool {
    if root.has_error() {
        return false;
    }

    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if LEGACY_STATEMENT_KINDS.contains(&node.kind()) {
            return false;
        }
        stack.extend(node.named_children(&mut cursor));
    }
    true
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Regular positional parameter names, in order.
///
/// Positional-only names before `/` are dropped. Collection stops at `*args`
/// or a bare `*`; `**kwargs` is skipped.
fn parameter_names(params: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();

    for child in params.named_children(&mut cursor) {
        let name = match child.kind() {
            "identifier" => Some(child),
            "default_parameter" | "typed_default_parameter" => child.child_by_field_name("name"),
            "typed_parameter" => match child.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => Some(inner),
                Some(inner) if inner.kind() == "list_splat_pattern" => break,
                _ => None,
            },
            "positional_separator" => {
                names.clear();
                None
            }
            "list_splat_pattern" | "keyword_separator" => break,
            _ => None,
        };

        if let Some(node) = name {
            names.push(node_text(node, source).to_string());
        }
    }

    names
}

/// Count branch constructs anywhere under `node`, nested functions included.
fn count_branches(node: Node) -> u32 {
    let mut count = 0;
    let mut cursor = node.walk();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if BRANCH_KINDS.contains(&current.kind()) {
            count += 1;
        }
        stack.extend(current.named_children(&mut cursor));
    }

    count
}

/// Imported module names in source order.
///
/// `import a.b as c` yields `a.b`. Relative imports drop their dots:
/// `from .pkg import x` yields `pkg` and `from . import y` yields an empty name.
fn collect_imports(root: Node, source: &[u8]) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                let mut names_cursor = node.walk();
                for name in node.children_by_field_name("name", &mut names_cursor) {
                    let module = match name.kind() {
                        "aliased_import" => name.child_by_field_name("name"),
                        _ => Some(name),
                    };
                    if let Some(module) = module {
                        imports.push(node_text(module, source).to_string());
                    }
                }
                continue;
            }
            "import_from_statement" => {
                let module = node
                    .child_by_field_name("module_name")
                    .and_then(|m| match m.kind() {
                        "relative_import" => {
                            let mut prefix_cursor = m.walk();
                            let dotted = m
                                .named_children(&mut prefix_cursor)
                                .find(|c| c.kind() == "dotted_name");
                            dotted
                        }
                        _ => Some(m),
                    })
                    .map(|m| node_text(m, source).to_string())
                    .unwrap_or_default();
                imports.push(module);
                continue;
            }
            "future_import_statement" => {
                imports.push("__future__".to_string());
                continue;
            }
            _ => {}
        }

        // Reverse so the stack pops children in source order.
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    imports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> StructuralFacts {
        PythonAnalyzer::new().analyze(source).unwrap()
    }

    #[test]
    fn test_extract_functions_and_classes() {
        let source = r#"
def simple():
    pass

def with_args(x, y):
    return x + y

class MyClass:
    def method(self):
        pass

class AnotherClass:
    pass
"#;
        let facts = analyze(source);

        assert_eq!(
            facts.functions,
            vec!["simple()", "with_args(x, y)", "method(self)"]
        );
        assert_eq!(facts.classes, vec!["MyClass", "AnotherClass"]);
        assert_eq!(facts.lines, 14);
    }

    #[test]
    fn test_extract_imports_in_source_order() {
        let source = r#"
import os
import sys, json as j
from collections import OrderedDict
from typing import List, Optional
from . import local_module
import numpy.linalg as la
"#;
        let facts = analyze(source);

        assert_eq!(
            facts.imports,
            vec!["os", "sys", "json", "collections", "typing", "", "numpy.linalg"]
        );
    }

    #[test]
    fn test_relative_imports_drop_leading_dots() {
        let facts = analyze("from .pkg import x\nfrom . import y\nfrom ..core.util import z\n");
        assert_eq!(facts.imports, vec!["pkg", "", "core.util"]);
    }

    #[test]
    fn test_complexity_two_ifs() {
        let source = r#"
def check(a, b):
    if a:
        print(a)
    if b:
        print(b)
"#;
        assert_eq!(analyze(source).complexity, 3);
    }

    #[test]
    fn test_complexity_counts_loops_and_handlers() {
        let source = r#"
def loopy(items):
    for item in items:
        while item > 0:
            item -= 1
    try:
        pass
    except ValueError:
        pass
    with open("f") as fh:
        pass
"#;
        // 1 + for + while + try + except + with
        assert_eq!(analyze(source).complexity, 6);
    }

    #[test]
    fn test_complexity_elif_counts_as_if() {
        let source = r#"
def branchy(x):
    if x > 0:
        return 1
    elif x < 0:
        return -1
    else:
        return 0
"#;
        assert_eq!(analyze(source).complexity, 3);
    }

    #[test]
    fn test_complexity_nested_functions_counted_in_both() {
        let source = r#"
def outer():
    def inner():
        if True:
            pass
    return inner
"#;
        let facts = analyze(source);
        // outer: 1 + nested if; inner: 1 + if
        assert_eq!(facts.complexity, 4);
        assert_eq!(facts.functions, vec!["outer()", "inner()"]);
    }

    #[test]
    fn test_boolean_operators_do_not_count() {
        let source = r#"
def check(a, b):
    return a and b or not a
"#;
        assert_eq!(analyze(source).complexity, 1);
    }

    #[test]
    fn test_parameter_shapes() {
        let source = r#"
def f(a, b: int, c=1, d: str = "x", *args, e, **kwargs):
    pass

def g(p, /, q, *, r):
    pass
"#;
        let facts = analyze(source);
        assert_eq!(facts.functions, vec!["f(a, b, c, d)", "g(q)"]);
    }

    #[test]
    fn test_async_function() {
        let source = r#"
async def fetch(url):
    async with session.get(url) as resp:
        async for chunk in resp:
            pass
"#;
        let facts = analyze(source);
        assert_eq!(facts.functions, vec!["fetch(url)"]);
        assert_eq!(facts.complexity, 3);
    }

    #[test]
    fn test_parse_error_yields_empty_facts() {
        let facts = analyze("def broken(:\n    return\n");
        assert_eq!(facts, StructuralFacts::empty());
        assert_eq!(facts.lines, 0);
    }

    #[test]
    fn test_python2_statements_yield_empty_facts() {
        let facts = analyze("def greet(name):\n    print \"hi\", name\n");
        assert_eq!(facts, StructuralFacts::empty());

        let facts = analyze("exec \"x = 1\"\n");
        assert_eq!(facts, StructuralFacts::empty());
    }

    #[test]
    fn test_print_call_still_parses() {
        let facts = analyze("def greet(name):\n    print(\"hi\", name)\n");
        assert_eq!(facts.functions, vec!["greet(name)"]);
        assert_eq!(facts.lines, 3);
    }

    #[test]
    fn test_module_without_functions() {
        let facts = analyze("x = 1\ny = 2");
        assert!(facts.functions.is_empty());
        assert_eq!(facts.complexity, 0);
        assert_eq!(facts.lines, 2);
    }
}
