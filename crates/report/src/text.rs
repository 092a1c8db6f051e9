#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    pub(crate) fn resource_name(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

// Helvetica-Bold runs wider than the regular cut; scale instead of carrying a second table.
const BOLD_FACTOR: f32 = 1.08;

pub(crate) fn char_width(ch: char, font: Font, size: f32) -> f32 {
    let code = ch as u32;
    let units = if (32..=126).contains(&code) {
        f32::from(HELVETICA_WIDTHS[(code - 32) as usize])
    } else {
        556.0
    };
    let units = match font {
        Font::Regular => units,
        Font::Bold => units * BOLD_FACTOR,
    };
    units * size / 1000.0
}

pub(crate) fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|ch| char_width(ch, font, size)).sum()
}

/// Maps text onto the printable ASCII range the standard fonts can show.
pub(crate) fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' '..='~' => out.push(ch),
            '\n' => out.push('\n'),
            '\t' | '\r' | '\u{a0}' => out.push(' '),
            '\u{2018}' | '\u{2019}' | '\u{201a}' => out.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{00b7}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2192}' => out.push_str("->"),
            _ => out.push('?'),
        }
    }
    out
}

pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Greedy word wrap. Explicit newlines start a new line; words wider than
/// the line are broken by character.
pub(crate) fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let clean = sanitize(text);
    let mut lines = Vec::new();
    for paragraph in clean.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;
        let space = char_width(' ', font, size);
        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, font, size);
            if word_width > max_width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                for ch in word.chars() {
                    let width = char_width(ch, font, size);
                    if line_width + width > max_width && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += width;
                }
                continue;
            }
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_typographic_characters() {
        assert_eq!(sanitize("“Smart” – quotes…"), "\"Smart\" - quotes...");
        assert_eq!(sanitize("Données"), "Donn?es");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", Font::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn breaks_overlong_words() {
        let lines = wrap(&"x".repeat(100), Font::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat().len(), 100);
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        let lines = wrap("one\n\ntwo", Font::Regular, 10.0, 500.0);
        assert_eq!(lines, vec!["one", "", "two"]);
    }
}
