/// Helper for HTML highlighting markup.
pub struct Markup;

impl Markup {
    pub fn escape(text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => output.push_str("&amp;"),
                '<' => output.push_str("&lt;"),
                '>' => output.push_str("&gt;"),
                '"' => output.push_str("&quot;"),
                '\'' => output.push_str("&#039;"),
                _ => output.push(c),
            }
        }
        output
    }

    /// Wraps an already escaped fragment in a span carrying `class`.
    pub fn wrap(class: &str, text: &str) -> String {
        format!("<span class=\"{}\">{}</span>", class, text)
    }

    /// Wraps the leading keyword of a rendered fragment.
    ///
    /// The keyword is the first run of ASCII lowercase letters and
    /// underscores, after optional leading spaces. Nothing else in the
    /// fragment is inspected; a fragment that does not start with such a
    /// run is returned unchanged.
    pub fn wrap_leading_keyword(text: &str) -> String {
        let rest = text.trim_start_matches(' ');
        let indent = &text[..text.len() - rest.len()];
        let end = rest
            .find(|c: char| !(c.is_ascii_lowercase() || c == '_'))
            .unwrap_or(rest.len());
        if end == 0 {
            return text.to_string();
        }
        format!(
            "{}{}{}",
            indent,
            Self::wrap("keyword", &rest[..end]),
            &rest[end..]
        )
    }
}

/// Helper for normalizing comment text before it is re-indented.
pub struct CommentText;

impl CommentText {
    /// Trims the comment and realigns continuation lines.
    ///
    /// Doc-block style comments get every continuation line aligned to
    /// ` *`; other multi-line comments lose the run of spaces and tabs
    /// common to their continuation lines.
    pub fn reformat(text: &str) -> Vec<String> {
        let text = text.trim();
        let mut lines = text.lines().map(str::trim_end);
        let Some(first) = lines.next() else {
            return vec![String::new()];
        };
        let rest: Vec<&str> = lines.collect();

        let mut output = vec![first.to_string()];
        if rest.iter().all(|line| line.trim_start().starts_with('*')) {
            output.extend(rest.iter().map(|line| format!(" {}", line.trim_start())));
            return output;
        }

        let common = rest
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.bytes()
                    .take_while(|b| *b == b' ' || *b == b'\t')
                    .count()
            })
            .min()
            .unwrap_or(0);
        output.extend(rest.iter().map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line[common..].to_string()
            }
        }));
        output
    }

    /// `/**` followed by an `@file` tag.
    pub fn is_file_docblock(text: &str) -> bool {
        let Some(body) = text.trim_start().strip_prefix("/**") else {
            return false;
        };
        body.trim_start_matches(|c: char| c.is_whitespace() || c == '*')
            .starts_with("@file")
    }

    /// Joins lines with `newline`; empty lines get no indentation.
    pub fn join(lines: &[String], newline: &str) -> String {
        let mut output = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                if line.is_empty() {
                    output.push('\n');
                } else {
                    output.push_str(newline);
                }
            }
            output.push_str(line);
        }
        output
    }
}
