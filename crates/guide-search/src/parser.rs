/// Parser for the guide spreadsheet CSV export.
///
/// The export is line-oriented CSV with a deterministic layout:
/// - Row 0 is a header and is always skipped.
/// - Fields may be double-quoted; `""` inside quotes escapes a literal quote.
/// - Column mapping is positional: title, description, url, category, tags.
///
/// Parser approach: per-line character scan with an explicit quote state
/// machine. Rows that cannot yield a guide are skipped; the parser never
/// fails.
use crate::model::Guide;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_DESCRIPTION: &str = "No description available";
const DEFAULT_URL: &str = "#";
const DEFAULT_CATEGORY: &str = "General";

/// Parse CSV content into a list of guides.
///
/// Blank lines are skipped, and rows with fewer than two fields are silently
/// dropped. Each guide's `id` is derived from the row's source line position
/// (1-based, header is line 0), which keeps ids unique within one parse run
/// and stable across runs over the same sheet.
pub fn parse_guides(content: &str) -> Vec<Guide> {
    let mut guides = Vec::new();

    for (line_no, raw_line) in content.split('\n').enumerate() {
        if line_no == 0 {
            // header row
            continue;
        }
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_csv_line(line);
        if row.len() < 2 {
            continue;
        }

        guides.push(Guide {
            id: format!("guide-{line_no}"),
            title: field_or(&row, 0, DEFAULT_TITLE),
            description: field_or(&row, 1, DEFAULT_DESCRIPTION),
            url: field_or(&row, 2, DEFAULT_URL),
            category: field_or(&row, 3, DEFAULT_CATEGORY),
            tags: parse_tags(row.get(4)),
        });
    }

    guides
}

/// Split one CSV line into fields with an explicit quote state machine.
///
/// Inside quotes a doubled `""` emits one literal quote and stays in quote
/// mode; a lone `"` leaves quote mode. End of line always flushes the current
/// field, so a line with zero commas still yields a single field.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                other => current.push(other),
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
    }
    fields.push(current);
    fields
}

/// Pick the field at `index`, falling back to `default` when the column is
/// missing or empty. Non-empty fields are cleaned before use.
fn field_or(row: &[String], index: usize, default: &str) -> String {
    match row.get(index) {
        Some(value) if !value.is_empty() => clean_field(value),
        _ => default.to_string(),
    }
}

/// Split the tags column on commas, trimming each piece. A missing or empty
/// column yields no tags.
fn parse_tags(field: Option<&String>) -> Vec<String> {
    match field {
        Some(value) if !value.is_empty() => clean_field(value)
            .split(',')
            .map(|tag| tag.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Strip one surrounding quote pair, collapse doubled quotes, and trim
/// whitespace. Covers fields the state machine did not fully unwrap, e.g.
/// partially quoted values from hand-edited sheets.
fn clean_field(field: &str) -> String {
    let unwrapped = field.strip_prefix('"').unwrap_or(field);
    let unwrapped = unwrapped.strip_suffix('"').unwrap_or(unwrapped);
    unwrapped.replace("\"\"", "\"").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_guide_per_data_row() {
        let content = "Title,Description,Link,Category,Tags\n\
                       Reset password,How to reset,https://example.com/reset,Account,login\n\
                       Billing FAQ,Common questions,https://example.com/billing,Billing,invoice";
        let guides = parse_guides(content);
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0].id, "guide-1");
        assert_eq!(guides[0].title, "Reset password");
        assert_eq!(guides[0].url, "https://example.com/reset");
        assert_eq!(guides[1].id, "guide-2");
        assert_eq!(guides[1].category, "Billing");
    }

    #[test]
    fn ids_are_unique_and_follow_line_position() {
        // A blank line between rows still advances the line counter.
        let content = "header\na,b\n\nc,d";
        let guides = parse_guides(content);
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0].id, "guide-1");
        assert_eq!(guides[1].id, "guide-3");
    }

    #[test]
    fn quoted_field_round_trip() {
        let row = parse_csv_line(r#""a, ""b"" c",second"#);
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], r#"a, "b" c"#);
        assert_eq!(row[1], "second");
    }

    #[test]
    fn line_without_commas_yields_single_field() {
        let row = parse_csv_line("only one value");
        assert_eq!(row, vec!["only one value".to_string()]);
    }

    #[test]
    fn short_rows_are_dropped() {
        let content = "header\nlonely-field\na,b";
        let guides = parse_guides(content);
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].title, "a");
    }

    #[test]
    fn empty_fields_take_defaults() {
        let content = "header\n,desc only,,";
        let guides = parse_guides(content);
        assert_eq!(guides.len(), 1);
        let g = &guides[0];
        assert_eq!(g.title, "Untitled");
        assert_eq!(g.description, "desc only");
        assert_eq!(g.url, "#");
        assert_eq!(g.category, "General");
        assert!(g.tags.is_empty());
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        let content = "header\ntitle,desc,url,cat,\"x, y,z\"";
        let guides = parse_guides(content);
        assert_eq!(guides[0].tags, vec!["x", "y", "z"]);
    }

    #[test]
    fn missing_tags_column_yields_empty_tags() {
        let content = "header\ntitle,desc,url,cat";
        let guides = parse_guides(content);
        assert!(guides[0].tags.is_empty());
    }

    #[test]
    fn clean_field_strips_stray_quotes() {
        assert_eq!(clean_field(r#""wrapped""#), "wrapped");
        assert_eq!(clean_field(r#"say ""hi"""#), r#"say "hi""#);
        assert_eq!(clean_field("  padded  "), "padded");
    }

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let content = "Title,Description\n\n   \nreal,row\n";
        let guides = parse_guides(content);
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].title, "real");
    }
}
