//! Ruby-flavoured expressions and `#{}` interpolation.
//!
//! Expressions are not evaluated here. They are rewritten token by token into
//! MiniJinja syntax and evaluated by the engine at render time.

use super::Segment;

/// Method calls that map onto a MiniJinja filter.
const METHOD_FILTERS: &[(&str, &str)] = &[
    ("size", "length"),
    ("length", "length"),
    ("count", "length"),
    ("to_s", "string"),
    ("to_i", "int"),
    ("to_f", "float"),
    ("upcase", "upper"),
    ("downcase", "lower"),
    ("capitalize", "capitalize"),
    ("strip", "trim"),
    ("first", "first"),
    ("last", "last"),
    ("reverse", "reverse"),
    ("sort", "sort"),
    ("join", "join"),
    ("round", "round"),
    ("abs", "abs"),
];

/// Rewrites a Ruby expression into MiniJinja syntax.
///
/// Handles boolean operators, `nil`, predicate methods, symbol keys and the
/// methods listed in `METHOD_FILTERS`. String literals are copied untouched.
pub fn translate(expr: &str) -> String {
    let chars: Vec<char> = expr.trim().chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let end = string_end(&chars, i);
                out.extend(&chars[i..end]);
                i = end;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                push_operator(&mut out, "and", chars.get(i + 2));
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                push_operator(&mut out, "or", chars.get(i + 2));
                i += 2;
            }
            '!' if chars.get(i + 1) != Some(&'=') => {
                push_operator(&mut out, "not", chars.get(i + 1));
                i += 1;
            }
            ':' if is_ident_start(chars.get(i + 1)) && last_significant(&out) == Some('[') => {
                let end = ident_end(&chars, i + 1);
                let name: String = chars[i + 1..end].iter().collect();
                out.push('"');
                out.push_str(&name);
                out.push('"');
                i = end;
            }
            '.' if is_ident_start(chars.get(i + 1)) => {
                let mut end = ident_end(&chars, i + 1);
                if chars.get(end) == Some(&'?') {
                    end += 1;
                }
                let method: String = chars[i + 1..end].iter().collect();
                match method.as_str() {
                    "empty?" => out.push_str("|length == 0"),
                    "nil?" => out.push_str(" is none"),
                    "any?" => out.push_str("|length > 0"),
                    _ => match METHOD_FILTERS.iter().find(|(m, _)| *m == method) {
                        Some((_, filter)) => {
                            out.push('|');
                            out.push_str(filter);
                        }
                        // Other predicates become plain attribute lookups.
                        None => {
                            out.push('.');
                            out.push_str(method.trim_end_matches('?'));
                        }
                    },
                }
                i = end;
            }
            c if is_ident_start(Some(&c)) => {
                let end = ident_end(&chars, i);
                let word: String = chars[i..end].iter().collect();
                if word == "nil" {
                    out.push_str("none");
                } else {
                    out.push_str(&word);
                }
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.trim().to_string()
}

/// Splits text into literal runs and `#{}` interpolations.
///
/// `#{expr}` is escaped on output, `#{{expr}}` is not, and `\#{` stays literal.
pub fn interpolate(text: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find("#{") {
        if rest[..pos].ends_with('\\') {
            literal.push_str(&rest[..pos - 1]);
            literal.push_str("#{");
            rest = &rest[pos + 2..];
            continue;
        }
        literal.push_str(&rest[..pos]);
        let body = &rest[pos + 2..];
        let (escape, body) = match body.strip_prefix('{') {
            Some(inner) => (false, inner),
            None => (true, body),
        };
        let end = closing_brace(body).ok_or("Text interpolation: Expected closing }")?;
        let expr = body[..end].trim();
        if expr.is_empty() {
            return Err("Text interpolation: Empty expression".to_string());
        }
        let mut after = &body[end + 1..];
        if !escape {
            after = after.strip_prefix('}').ok_or("Text interpolation: Expected closing }}")?;
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Interp { expr: translate(expr), escape });
        rest = after;
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Byte offset of the `}` closing an interpolation body, honouring nested
/// braces and string literals.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' if depth == 0 => return Some(idx),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Writes a word operator, adding only the spaces the neighbours lack.
fn push_operator(out: &mut String, word: &str, next: Option<&char>) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) && !out.ends_with('(') {
        out.push(' ');
    }
    out.push_str(word);
    if !matches!(next, Some(c) if c.is_whitespace()) {
        out.push(' ');
    }
}

fn string_end(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn is_ident_start(c: Option<&char>) -> bool {
    matches!(c, Some(c) if c.is_alphabetic() || *c == '_')
}

fn ident_end(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    i
}

fn last_significant(out: &str) -> Option<char> {
    out.chars().rev().find(|c| !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_boolean_operators() {
        assert_eq!(translate("a && !b || c"), "a and not b or c");
        assert_eq!(translate("!(a&&b)"), "not (a and b)");
        assert_eq!(translate("a != b"), "a != b");
    }

    #[test]
    fn translates_nil_and_predicates() {
        assert_eq!(translate("user.nil?"), "user is none");
        assert_eq!(translate("items.empty?"), "items|length == 0");
        assert_eq!(translate("x == nil"), "x == none");
        assert_eq!(translate("user.admin? && !user.banned?"), "user.admin and not user.banned");
    }

    #[test]
    fn translates_methods_to_filters() {
        assert_eq!(translate("items.size > 2"), "items|length > 2");
        assert_eq!(translate("name.upcase"), "name|upper");
        assert_eq!(translate("tags.join(\", \")"), "tags|join(\", \")");
        assert_eq!(translate("user.name"), "user.name");
    }

    #[test]
    fn translates_symbol_keys() {
        assert_eq!(translate("user[:name]"), "user[\"name\"]");
    }

    #[test]
    fn leaves_string_literals_alone() {
        assert_eq!(translate("'a && nil'"), "'a && nil'");
        assert_eq!(translate("\"x.size\""), "\"x.size\"");
    }

    #[test]
    fn leaves_numbers_alone() {
        assert_eq!(translate("price * 1.5"), "price * 1.5");
    }

    #[test]
    fn interpolates_escaped_and_raw() {
        let segments = interpolate("Hello #{name}, #{{html}}!").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("Hello ".into()),
                Segment::Interp { expr: "name".into(), escape: true },
                Segment::Literal(", ".into()),
                Segment::Interp { expr: "html".into(), escape: false },
                Segment::Literal("!".into()),
            ]
        );
    }

    #[test]
    fn escaped_interpolation_is_literal() {
        let segments = interpolate(r"cost \#{price}").unwrap();
        assert_eq!(segments, vec![Segment::Literal("cost #{price}".into())]);
    }

    #[test]
    fn interpolation_with_nested_braces() {
        let segments = interpolate("#{ {'a': 1}['a'] }").unwrap();
        assert_eq!(segments, vec![Segment::Interp { expr: "{'a': 1}['a']".into(), escape: true }]);
    }

    #[test]
    fn unterminated_interpolation_is_an_error() {
        assert!(interpolate("Hello #{name").is_err());
        assert!(interpolate("Hello #{}").is_err());
    }
}
