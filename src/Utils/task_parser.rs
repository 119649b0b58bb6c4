/// parse task documents with structure like
/// ```text
/// function
///   inputs: x1, x2
///   outputs: x1*sin(x2), cos(x1 + x2)
/// settings
///   loglevel: info
/// ```
/// A title stands alone on its line, every following `key: value1, value2` line belongs to it
/// until the next title. Values run until a comma, a semicolon or the end of the line, so they
/// may contain spaces. Lines starting with //, #, % or ; are comments, and a `//` ends the line
/// anywhere else. A key may appear only once per section.
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, char, line_ending, space0},
    combinator::{eof, map, opt, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{pair, terminated},
};
use std::collections::HashMap;

pub type KeyValueList = Vec<(String, Vec<String>)>;
pub type SectionMap = HashMap<String, Vec<String>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// word characters without spaces, starting with a letter or underscore
fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )
    .parse(input)
}

/// Parses a title: an identifier alone on its line
pub fn parse_title(input: &str) -> IResult<&str, String> {
    terminated(identifier, (space0, alt((line_ending, eof)))).parse(input)
}

pub fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

fn parse_value(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !matches!(c, ',' | ';' | '\n' | '\r')),
        |s: &str| s.trim().to_string(),
    )
    .parse(input)
}

/// comma separated values, blank entries dropped (`inputs:` alone gives an empty list)
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, values) = separated_list0(char(','), parse_value).parse(input)?;
    Ok((input, values.into_iter().filter(|v| !v.is_empty()).collect()))
}

/// Parses one `key: values` line, an optional trailing `;` is allowed
pub fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<String>)> {
    let (input, (_, key, _, _, values, _, _, _)) = (
        space0,
        parse_key,
        space0,
        char(':'),
        parse_value_list,
        opt(char(';')),
        space0,
        alt((line_ending, eof)),
    )
        .parse(input)?;
    Ok((input, (key, values)))
}

/// Parses a section with a title and at least one key-value line, keys in document order
pub fn parse_section(input: &str) -> IResult<&str, (String, KeyValueList)> {
    let (input, (_, title, pairs)) =
        (space0, parse_title, many1(parse_key_value_pair)).parse(input)?;
    Ok((input, (title, pairs)))
}

/// Filters out comment lines (starting with //, #, %, or ;), trailing `//` comments and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .map(|line| match line.find("//") {
            Some(start) => line[..start].trim_end(),
            None => line.trim_end(),
        })
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses sections until the first line that is neither a title nor a key-value pair.
pub fn parse_document(input: &str) -> IResult<&str, Vec<(String, KeyValueList)>> {
    many1(parse_section).parse(input)
}

/// Builds the document map. A title repeated later in the document is merged into the first
/// one; a key given twice for the same title is an error.
pub fn collect_sections(sections: Vec<(String, KeyValueList)>) -> Result<DocumentMap, String> {
    let mut result: DocumentMap = HashMap::new();
    for (title, pairs) in sections {
        let section = result.entry(title.clone()).or_default();
        for (key, values) in pairs {
            if section.contains_key(&key) {
                return Err(format!(
                    "key '{}' is given more than once in section '{}'",
                    key, title
                ));
            }
            section.insert(key, values);
        }
    }
    Ok(result)
}

/// Parses a whole document (comments allowed). Fails if some text is not understood.
pub fn parse_document_as_strings(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Err("document is empty".to_string());
    }
    match parse_document(&filtered) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "failed to parse entire document, remaining: '{}'",
                    remaining.lines().next().unwrap_or_default().trim()
                ));
            }
            let parsed = collect_sections(sections)?;
            debug!("parsed task document with {} section(s)", parsed.len());
            Ok(parsed)
        }
        Err(e) => Err(format!("parsing error: {:?}", e)),
    }
}
