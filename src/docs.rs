//! Markdown documentation rendered from structural facts.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::analysis::StructuralFacts;
use crate::language::SourceLanguage;

/// strftime pattern for the "Generated at" section.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render documentation stamped with the current local time.
pub fn render(facts: &StructuralFacts, language: SourceLanguage) -> String {
    render_at(facts, language, Local::now())
}

/// Render documentation with an explicit timestamp.
///
/// Every section heading is always present; empty collections leave the
/// section body blank.
pub fn render_at<Tz>(facts: &StructuralFacts, language: SourceLanguage, at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let doc = format!(
        "# Code Documentation\n\
         \n\
         ## Overview\n\
         - **Language**: {language}\n\
         - **Lines of Code**: {lines}\n\
         - **Complexity Score**: {complexity}\n\
         \n\
         ## Functions\n\
         {functions}\n\
         \n\
         ## Classes\n\
         {classes}\n\
         \n\
         ## Dependencies\n\
         {imports}\n\
         \n\
         ## Generated at\n\
         {stamp}",
        language = language.display_name(),
        lines = facts.lines,
        complexity = facts.complexity,
        functions = bullets(&facts.functions),
        classes = bullets(&facts.classes),
        imports = bullets(&facts.imports),
        stamp = at.format(TIMESTAMP_FORMAT),
    );
    doc.trim().to_string()
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
