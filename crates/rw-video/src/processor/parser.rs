//! Whole-line directive syntax: `::name[arg]{attrs}`, `:::name[arg]{attrs}`, `:::`.

/// A line that looks like a block directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DirectiveLine<'a> {
    /// `::name[argument]{attrs}`
    Leaf {
        name: &'a str,
        argument: &'a str,
        attrs: &'a str,
    },
    /// `:::name[argument]{attrs}`
    ContainerStart {
        name: &'a str,
        argument: &'a str,
        attrs: &'a str,
        colon_count: usize,
    },
    /// `:::`
    ContainerEnd { colon_count: usize },
}

/// Parse a line as a block directive. Returns `None` for ordinary text and
/// for lines with trailing content after the directive.
pub(crate) fn parse_line(line: &str) -> Option<DirectiveLine<'_>> {
    let trimmed = line.trim();
    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    if colon_count < 2 {
        return None;
    }

    let rest = &trimmed[colon_count..];
    if rest.is_empty() {
        return (colon_count >= 3).then_some(DirectiveLine::ContainerEnd { colon_count });
    }

    let name_end = rest
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !is_valid_name(name) {
        return None;
    }

    let mut pos = name_end;
    let argument = delimited(&rest[pos..], '[', ']').map_or("", |(inner, used)| {
        pos += used;
        inner
    });
    let attrs = delimited(&rest[pos..], '{', '}').map_or("", |(inner, used)| {
        pos += used;
        inner
    });

    if !rest[pos..].trim().is_empty() {
        return None;
    }

    Some(if colon_count == 2 {
        DirectiveLine::Leaf {
            name,
            argument,
            attrs,
        }
    } else {
        DirectiveLine::ContainerStart {
            name,
            argument,
            attrs,
            colon_count,
        }
    })
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Content between matching `open`/`close` at the start of `s`, with the
/// number of bytes consumed including the delimiters.
fn delimited(s: &str, open: char, close: char) -> Option<(&str, usize)> {
    if !s.starts_with(open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[open.len_utf8()..i], i + close.len_utf8()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf() {
        assert_eq!(
            parse_line("::youtube[anwy2MPT5RE]{width=560 align=center}"),
            Some(DirectiveLine::Leaf {
                name: "youtube",
                argument: "anwy2MPT5RE",
                attrs: "width=560 align=center",
            })
        );
    }

    #[test]
    fn test_leaf_without_attrs() {
        assert_eq!(
            parse_line("  ::vimeo[42]  "),
            Some(DirectiveLine::Leaf {
                name: "vimeo",
                argument: "42",
                attrs: "",
            })
        );
    }

    #[test]
    fn test_container_start() {
        assert_eq!(
            parse_line(":::video[d1]{controls loop}"),
            Some(DirectiveLine::ContainerStart {
                name: "video",
                argument: "d1",
                attrs: "controls loop",
                colon_count: 3,
            })
        );
    }

    #[test]
    fn test_container_end() {
        assert_eq!(
            parse_line(":::"),
            Some(DirectiveLine::ContainerEnd { colon_count: 3 })
        );
        assert_eq!(
            parse_line("::::  "),
            Some(DirectiveLine::ContainerEnd { colon_count: 4 })
        );
    }

    #[test]
    fn test_not_directives() {
        assert_eq!(parse_line("plain text"), None);
        assert_eq!(parse_line(":kbd[Ctrl]"), None);
        assert_eq!(parse_line("::"), None);
        assert_eq!(parse_line("::youtube[abc] trailing text"), None);
        assert_eq!(parse_line("::bad name[abc]"), None);
        assert_eq!(parse_line("::youtube[unclosed"), None);
    }

    #[test]
    fn test_nested_brackets() {
        assert_eq!(
            parse_line("::youtube[a[b]c]"),
            Some(DirectiveLine::Leaf {
                name: "youtube",
                argument: "a[b]c",
                attrs: "",
            })
        );
    }
}
