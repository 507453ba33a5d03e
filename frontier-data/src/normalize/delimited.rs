//! Quote-aware splitting of delimited lines.

/// A line ended while a quoted field was still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnterminatedQuote;

/// Split one line into trimmed fields.
///
/// A `"` toggles quoted mode and the delimiter only separates fields outside
/// quotes. Inside quotes, `""` stands for a literal quote. Quote characters
/// are not kept in the field.
pub(crate) fn split_fields(line: &str, delimiter: char) -> Result<Vec<String>, UnterminatedQuote> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => quoted = !quoted,
            ch if ch == delimiter && !quoted => {
                fields.push(field.trim().to_owned());
                field.clear();
            }
            ch => field.push(ch),
        }
    }
    if quoted {
        return Err(UnterminatedQuote);
    }
    fields.push(field.trim().to_owned());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Name,\"Country, Region\",1.0,2.0", vec!["Name", "Country, Region", "1.0", "2.0"])]
    #[case("a, b ,c", vec!["a", "b", "c"])]
    #[case("a,,c,", vec!["a", "", "c", ""])]
    #[case("\"He said \"\"hi\"\"\",x", vec!["He said \"hi\"", "x"])]
    #[case("  \"padded\"  ", vec!["padded"])]
    fn splits_fields(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_fields(line, ','), Ok(expected.into_iter().map(String::from).collect()));
    }

    #[rstest]
    fn honours_other_delimiters() {
        assert_eq!(
            split_fields("a;\"b;c\"", ';'),
            Ok(vec!["a".to_owned(), "b;c".to_owned()])
        );
    }

    #[rstest]
    fn reports_unterminated_quotes() {
        assert_eq!(split_fields("Name,\"Chad", ','), Err(UnterminatedQuote));
    }
}
