//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal summary for human readability
//! - JSON: projected result objects for programmatic consumption

use colored::*;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::engine::AnalysisResult;
use crate::scan::{Finding, Severity};

/// Which subset of a result to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisType {
    Basic,
    #[default]
    Full,
    Security,
    Performance,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Basic => "basic",
            AnalysisType::Full => "full",
            AnalysisType::Security => "security",
            AnalysisType::Performance => "performance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(AnalysisType::Basic),
            "full" => Some(AnalysisType::Full),
            "security" => Some(AnalysisType::Security),
            "performance" => Some(AnalysisType::Performance),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project a result onto the fields an analysis type exposes.
pub fn project(result: &AnalysisResult, analysis_type: AnalysisType) -> Value {
    let language = result.language().as_str();

    match analysis_type {
        AnalysisType::Basic => json!({
            "commented_code": result.commented_code(),
            "language": language,
            "lines_of_code": result.lines_of_code(),
        }),
        AnalysisType::Security => json!({
            "security_issues": result.security_issues(),
            "language": language,
        }),
        AnalysisType::Performance => json!({
            "performance_suggestions": result.performance_suggestions(),
            "complexity_score": result.complexity_score(),
            "language": language,
        }),
        AnalysisType::Full => {
            let facts = result.facts();
            json!({
                "commented_code": result.commented_code(),
                "language": language,
                "complexity_score": result.complexity_score(),
                "security_issues": result.security_issues(),
                "performance_suggestions": result.performance_suggestions(),
                "code_quality_score": result.quality_score(),
                "documentation_generated": result.documentation(),
                "function_signatures": facts.functions,
                "class_definitions": facts.classes,
                "imports_used": facts.imports,
                "lines_of_code": facts.lines,
                "cyclomatic_complexity": facts.complexity,
                "degraded": result.is_degraded(),
            })
        }
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    analysis_type: &'static str,
    files: Vec<Value>,
}

/// Build the JSON report: one projected object per input, tagged with its path.
pub fn json_report(entries: &[(String, AnalysisResult)], analysis_type: AnalysisType) -> Value {
    let files = entries
        .iter()
        .map(|(path, result)| {
            let mut object = Map::new();
            object.insert("path".to_string(), Value::String(path.clone()));
            if let Value::Object(fields) = project(result, analysis_type) {
                object.extend(fields);
            }
            Value::Object(object)
        })
        .collect();

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        analysis_type: analysis_type.as_str(),
        files,
    };
    serde_json::to_value(report).unwrap_or(Value::Null)
}

/// Write results in JSON format.
pub fn write_json(
    entries: &[(String, AnalysisResult)],
    analysis_type: AnalysisType,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(entries, analysis_type))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(entries: &[(String, AnalysisResult)], analysis_type: AnalysisType) {
    println!();
    print!("  ");
    print!("{}", "codescribe".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    for (path, result) in entries {
        write_entry(path, result, analysis_type);
        println!();
    }

    if entries.len() > 1 {
        write_totals(entries);
        println!();
    }
}

fn write_entry(path: &str, result: &AnalysisResult, analysis_type: AnalysisType) {
    print!("  {}", "File: ".dimmed());
    print!("{}", path.blue());
    if result.is_degraded() {
        print!("  {}", "(degraded)".yellow());
    }
    println!();

    print!("  {}", "Language: ".dimmed());
    println!("{}", result.language().display_name());

    if matches!(analysis_type, AnalysisType::Full | AnalysisType::Basic) {
        print!("  {}", "Lines: ".dimmed());
        println!("{}", result.lines_of_code());
    }

    if matches!(analysis_type, AnalysisType::Full | AnalysisType::Performance) {
        print!("  {}", "Complexity: ".dimmed());
        println!("{}", result.facts().complexity);
    }

    if analysis_type == AnalysisType::Full {
        print!("  Quality: ");
        write_colored_score(result.quality_score());
        println!();
    }

    if matches!(analysis_type, AnalysisType::Full | AnalysisType::Security)
        && !result.security_issues().is_empty()
    {
        println!();
        write_findings(result.security_issues());
    }

    if matches!(analysis_type, AnalysisType::Full | AnalysisType::Performance)
        && !result.performance_suggestions().is_empty()
    {
        println!();
        println!(
            "  {} ({}):",
            "Suggestions".bold(),
            result.performance_suggestions().len()
        );
        for suggestion in result.performance_suggestions() {
            println!("    - {}", suggestion);
        }
    }

    if analysis_type == AnalysisType::Basic {
        println!();
        for line in result.commented_code().lines() {
            println!("    {}", line);
        }
    }
}

fn write_colored_score(s: f64) {
    let text = format!("{:.1}", s);
    match s {
        s if s >= 90.0 => print!("{}", text.green().bold()),
        s if s >= 75.0 => print!("{}", text.green()),
        s if s >= 60.0 => print!("{}", text.yellow()),
        s if s >= 40.0 => print!("{}", text.yellow().bold()),
        _ => print!("{}", text.red()),
    }
}

fn write_findings(findings: &[Finding]) {
    println!("  {} ({}):", "Security issues".bold(), findings.len());
    println!();

    for f in findings {
        write_severity_tag(f.severity);
        print!("   ");
        print!("{:<24}", f.category.as_str().dimmed());
        println!("{}", format!("line {}", f.line).dimmed());
        println!("            {}", f.code);
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::High => print!("    {} ", "HIGH".red()),
        Severity::Medium => print!("    {} ", "MED ".yellow()),
    }
}

fn write_totals(entries: &[(String, AnalysisResult)]) {
    let issues: usize = entries.iter().map(|(_, r)| r.security_issues().len()).sum();
    let mean = entries.iter().map(|(_, r)| r.quality_score()).sum::<f64>() / entries.len() as f64;

    print!("  {}", format!("Files: {}", entries.len()).dimmed());
    print!("  {}", format!("Security issues: {}", issues).dimmed());
    print!("  Mean quality: ");
    write_colored_score(mean);
    println!();
}
