//! Import of recipes from markdown chat exports.
//!
//! Conversational assistants write recipes as loosely structured markdown:
//! a bold title, an intro paragraph, "Ingredients" and "Instructions"
//! sections with bullets or numbers, and usually some tips at the end. The
//! headings, bolding and bullet glyphs vary from answer to answer, so the
//! parser is a single forward scan with permissive keyword matching. It
//! prefers a partial recipe with warnings over a hard failure because a
//! person reviews the result before saving it.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::duration::parse_duration;
use crate::ingredient::IngredientParser;
use crate::model::ImportedRecipe;

/// Notes shorter than this are replaced by the intro text.
const MIN_NOTES_LEN: usize = 20;

/// Lines with more words than this are content, not section headers, unless
/// they are formatted as a heading.
const MAX_HEADER_WORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Ingredients,
    Instructions,
    Notes,
}

/// Ordered header keywords; the first section with a keyword in the line wins.
const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (Section::Ingredients, &["ingredients"]),
    (
        Section::Instructions,
        &["instructions", "step-by-step", "method", "full step", "directions"],
    ),
    (
        Section::Notes,
        &["tips", "notes", "success", "suggestions", "serve"],
    ),
];

lazy_static! {
    static ref YOUTUBE_URL: Regex =
        Regex::new(r"(?i)https?://(?:www\.|m\.)?(?:youtube\.com|youtu\.be)/[^\s)\]>]+")
            .expect("valid pattern");
    static ref BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").expect("valid pattern");
    static ref SERVINGS: Regex =
        Regex::new(r"(\d+)\s*(?:-|–|to)\s*(\d+)|(\d+)").expect("valid pattern");
    static ref TIME: Regex = Regex::new(
        r"(?i)\b(prep|active|cook|bake|roast|total)\s*(?:time)?\s*[:~-]?\s*(?:about|approx\.?|roughly|~)?\s*(\d[\d\s\-–]*)\s*(minutes?|mins?|hours?|hrs?)\b"
    )
    .expect("valid pattern");
    static ref SUBHEADING: Regex = Regex::new(r"^\*\*(.+?):\*\*$").expect("valid pattern");
    static ref STEP_LABEL: Regex =
        Regex::new(r"^\*\*(.+?)(?::\*\*|\*\*:)\s*").expect("valid pattern");
}

/// A successfully imported recipe together with anything the reviewer should
/// double-check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownImport {
    pub recipe: ImportedRecipe,
    pub warnings: Vec<String>,
}

/// Why a markdown export could not be imported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkdownImportError {
    #[error("No content provided")]
    NoContent,

    #[error("Could not detect recipe title")]
    MissingTitle,

    #[error("Incomplete recipe: missing key sections (ingredients or instructions)")]
    Incomplete { warnings: Vec<String> },
}

impl MarkdownImportError {
    /// Warnings gathered before the import gave up.
    pub fn warnings(&self) -> &[String] {
        match self {
            MarkdownImportError::Incomplete { warnings } => warnings,
            _ => &[],
        }
    }
}

/// Markdown chat-export parser.
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    ingredients: IngredientParser,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(IngredientParser::for_markdown())
    }
}

impl MarkdownParser {
    pub fn new(ingredients: IngredientParser) -> Self {
        Self { ingredients }
    }

    pub fn parse(&self, markdown: &str) -> Result<MarkdownImport, MarkdownImportError> {
        if markdown.trim().is_empty() {
            return Err(MarkdownImportError::NoContent);
        }

        let mut scan = Scan::new(&self.ingredients);
        for line in markdown.lines().map(str::trim) {
            if line.is_empty() || is_rule(line) {
                continue;
            }
            scan.line(line);
        }
        scan.finish()
    }
}

/// Parses a markdown chat export with the default markdown settings.
pub fn parse_markdown_recipe(markdown: &str) -> Result<MarkdownImport, MarkdownImportError> {
    MarkdownParser::default().parse(markdown)
}

struct Scan<'a> {
    parser: &'a IngredientParser,
    section: Section,
    recipe: ImportedRecipe,
    notes: Option<String>,
    intro: Vec<String>,
    warnings: Vec<String>,
}

impl<'a> Scan<'a> {
    fn new(parser: &'a IngredientParser) -> Self {
        Self {
            parser,
            section: Section::None,
            recipe: ImportedRecipe::default(),
            notes: None,
            intro: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn line(&mut self, line: &str) {
        let lower = line.to_lowercase();

        if self.recipe.source_url.is_none() {
            if let Some(m) = YOUTUBE_URL.find(line) {
                let url = m.as_str().trim_end_matches(['.', ',', ')', ';', '!']);
                self.recipe.source_url = Some(url.to_string());
            }
        }

        let servings = servings_in(&lower);
        let mut header = header_section(line, &lower);
        if servings.is_some() && header == Some(Section::Notes) && !names_notes(&lower) {
            // "Serves 4" says "serve" without opening a serving-suggestions section
            header = None;
        }

        if self.recipe.title.is_empty() {
            if let Some(title) = bold_title(line) {
                self.recipe.title = title;
                return;
            }
            if self.section == Section::None
                && header.is_none()
                && line.chars().count() > 15
                && strip_list_marker(line).is_none()
                && !line.starts_with("**For")
                && !lower.contains("serves")
            {
                self.recipe.title = clean_title(line);
            }
        }

        if self.section == Section::None && header.is_none() && !line.starts_with('#') {
            self.intro.push(line.to_string());
        }

        if let Some(servings) = servings {
            self.recipe.servings = servings;
        }

        self.times(line);

        if let Some(section) = header {
            debug!("Markdown section {:?} starts at {:?}", section, line);
            self.section = section;
            if section == Section::Notes && self.notes.is_none() {
                self.notes = Some(String::new());
            }
            return;
        }

        match self.section {
            Section::None => {}
            Section::Ingredients => self.ingredient_line(line),
            Section::Instructions => self.instruction_line(line),
            Section::Notes => self.notes_line(line),
        }
    }

    fn times(&mut self, line: &str) {
        for caps in TIME.captures_iter(line) {
            let kind = caps[1].to_lowercase();
            let Some(minutes) = parse_duration(&format!("{} {}", caps[2].trim(), &caps[3])) else {
                continue;
            };
            let slot = if kind == "prep" || kind == "active" {
                &mut self.recipe.prep_time
            } else {
                // cook, bake, roast; total is also recorded as cook time
                &mut self.recipe.cook_time
            };
            if slot.is_none() {
                *slot = Some(minutes);
            }
        }
    }

    fn ingredient_line(&mut self, line: &str) {
        if let Some(caps) = SUBHEADING.captures(line) {
            self.warnings.push(format!(
                "Detected ingredient subheading \"{}\"; it is not attached to the ingredients below it",
                caps[1].trim()
            ));
            return;
        }

        if let Some(item) = strip_list_marker(line) {
            if let Some(ingredient) = self.parser.parse(item) {
                self.recipe.ingredients.push(ingredient);
            }
        } else if !is_heading(line) {
            if let Some(last) = self.recipe.ingredients.last_mut() {
                last.append_note(line);
            }
        }
    }

    fn instruction_line(&mut self, line: &str) {
        if let Some(item) = strip_list_marker(line) {
            let step = STEP_LABEL.replace(item, "$1: ");
            let step = step.trim();
            if !step.is_empty() {
                self.recipe.instructions.push(step.to_string());
            }
        } else if !is_heading(line) {
            if let Some(last) = self.recipe.instructions.last_mut() {
                last.push(' ');
                last.push_str(line);
            }
        }
    }

    fn notes_line(&mut self, line: &str) {
        if is_heading(line) {
            return;
        }
        let notes = self.notes.get_or_insert_with(String::new);
        if !notes.is_empty() {
            notes.push('\n');
        }
        notes.push_str(line);
    }

    fn finish(mut self) -> Result<MarkdownImport, MarkdownImportError> {
        if self.recipe.title.is_empty() {
            return Err(MarkdownImportError::MissingTitle);
        }

        let notes = self.notes.take().unwrap_or_default();
        let notes = notes.trim();
        if !self.intro.is_empty() && notes.chars().count() < MIN_NOTES_LEN {
            self.recipe.notes = Some(self.intro.join("\n").trim().to_string());
            self.warnings
                .push("No separate tips/notes section found; used intro paragraph as notes".to_string());
        } else if !notes.is_empty() {
            self.recipe.notes = Some(notes.to_string());
        }

        if self.recipe.ingredients.is_empty() {
            self.warnings
                .push("No ingredients were parsed; check the markdown format".to_string());
        }
        if self.recipe.instructions.is_empty() {
            self.warnings
                .push("No instructions were parsed; check the markdown format".to_string());
        }

        if self.recipe.ingredients.is_empty() || self.recipe.instructions.is_empty() {
            return Err(MarkdownImportError::Incomplete {
                warnings: self.warnings,
            });
        }

        Ok(MarkdownImport {
            recipe: self.recipe,
            warnings: self.warnings,
        })
    }
}

/// Section introduced by this line, if it is a header.
fn header_section(line: &str, lower: &str) -> Option<Section> {
    if strip_list_marker(line).is_some() {
        return None;
    }
    let heading_like = is_heading(line) || line.ends_with(':');
    if !heading_like && line.split_whitespace().count() > MAX_HEADER_WORDS {
        return None;
    }

    if let Some(section) = keyword_section(lower) {
        return Some(section);
    }

    if line.starts_with('#') && lower.contains("step") {
        return Some(Section::Instructions);
    }
    None
}

fn keyword_section(lower: &str) -> Option<Section> {
    SECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(section, _)| *section)
}

/// True when a notes keyword remains once the servings wording is removed.
fn names_notes(lower: &str) -> bool {
    let rest = lower.replace("serves", "").replace("serving", "");
    keyword_section(&rest) == Some(Section::Notes)
}

/// Servings count on a "serves"/"makes about"/"serving" line. For a range
/// the upper bound is used.
fn servings_in(lower: &str) -> Option<u32> {
    if !(lower.contains("serves") || lower.contains("makes about") || lower.contains("serving")) {
        return None;
    }
    let caps = SERVINGS.captures(lower)?;
    caps.get(2)
        .or_else(|| caps.get(3))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

fn bold_title(line: &str) -> Option<String> {
    let caps = BOLD.captures(line)?;
    let inner = caps[1].trim();
    let lower = inner.to_lowercase();
    if inner.chars().count() <= 5
        || lower.contains("channel")
        || header_section(inner, &lower).is_some()
    {
        return None;
    }
    Some(clean_title(inner))
}

fn clean_title(text: &str) -> String {
    text.trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”'))
        .trim()
        .to_string()
}

/// Strips a bullet or list number, returning the item text.
pub(crate) fn strip_list_marker(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with("**") {
        return None;
    }
    if let Some(rest) = line.strip_prefix(['-', '*', '•', '–']) {
        return Some(rest.trim());
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(['.', ')'])?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with("**") || line.starts_with('#')
}

/// Horizontal rules such as `---` or `***`.
fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '*' | '_' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("- 2 cups flour"), Some("2 cups flour"));
        assert_eq!(strip_list_marker("• salt"), Some("salt"));
        assert_eq!(strip_list_marker("* pepper"), Some("pepper"));
        assert_eq!(strip_list_marker("12. Bake"), Some("Bake"));
        assert_eq!(strip_list_marker("3) Stir"), Some("Stir"));
        assert_eq!(strip_list_marker("1.5 cups milk"), None);
        assert_eq!(strip_list_marker("**Bold**"), None);
        assert_eq!(strip_list_marker("Plain text"), None);
    }

    #[test]
    fn test_header_detection() {
        let header = |line: &str| header_section(line, &line.to_lowercase());
        assert_eq!(header("### Ingredients"), Some(Section::Ingredients));
        assert_eq!(header("**Instructions:**"), Some(Section::Instructions));
        assert_eq!(header("Method"), Some(Section::Instructions));
        assert_eq!(header("## Step 1"), Some(Section::Instructions));
        assert_eq!(header("Tips for Success"), Some(Section::Notes));
        assert_eq!(header("- 1 tsp salt, to serve"), None);
        assert_eq!(
            header("Rest the dough and serve it with plenty of butter and jam on the side"),
            None
        );
    }

    #[test]
    fn test_servings_wording_is_not_a_notes_keyword() {
        assert!(!names_notes("serves 4"));
        assert!(!names_notes("makes about 6 servings"));
        assert!(names_notes("### tips (serves 4)"));
    }

    #[test]
    fn test_servings_prefers_upper_bound() {
        assert_eq!(servings_in("serves 4-6"), Some(6));
        assert_eq!(servings_in("serves 4 to 6 people"), Some(6));
        assert_eq!(servings_in("makes about 12 cookies"), Some(12));
        assert_eq!(servings_in("serving suggestions"), None);
        assert_eq!(servings_in("bake 20 minutes"), None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("\"Grandma's Lasagna\""), "Grandma's Lasagna");
        assert_eq!(clean_title("# The Best Banana Bread."), "The Best Banana Bread");
    }

    #[test]
    fn test_bold_title_rules() {
        assert_eq!(bold_title("**Ultimate Chili**"), Some("Ultimate Chili".to_string()));
        assert_eq!(bold_title("**Tip**"), None);
        assert_eq!(bold_title("**Check out my channel**"), None);
        assert_eq!(bold_title("**Ingredients:**"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_markdown_recipe(""), Err(MarkdownImportError::NoContent));
        assert_eq!(parse_markdown_recipe("  \n\t "), Err(MarkdownImportError::NoContent));
        assert_eq!(
            MarkdownImportError::NoContent.to_string(),
            "No content provided"
        );
    }
}
