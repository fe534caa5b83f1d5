use std::{
    cmp,
    io::{self, Write},
};

use super::{parse::error::SyntaxError, Source, Span, Spanned};

use ansi_term::Colour::Red;
use unicode_width::UnicodeWidthStr;

pub fn print_error<W: Write>(msg: &str, writer: &mut W) -> io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn report_error<W: Write>(
    source: &Source,
    err: &Spanned<SyntaxError>,
    writer: &mut W,
    color: bool,
) -> io::Result<()> {
    print_error(
        &format_error(source, err.span, &err.node.to_string(), color),
        writer,
    )
}

pub fn format_error(source: &Source, err_tok_span: Span, msg: &str, color: bool) -> String {
    let (line_nr, index) = find_line_index(source, err_tok_span.start);

    format!(
        "error: {}\n--> {}:{}:{}\n{}",
        msg,
        source.name,
        line_nr,
        index,
        err_to_string(source, err_tok_span, line_nr, color)
    )
}

/// 1 based line and column of the byte offset `start`.
pub fn find_line_index(source: &Source, start: usize) -> (usize, usize) {
    let slice = &source.code[..start];

    let line_nr = slice.chars().filter(|c| *c == '\n').count() + 1;
    let index = slice.chars().rev().take_while(|c| *c != '\n').count() + 1;

    (line_nr, index)
}

fn find_dist(source: &Source, start: usize) -> usize {
    let slice = &source.code[..start];

    UnicodeWidthStr::width(
        slice
            .chars()
            .rev()
            .take_while(|c| *c != '\n')
            .collect::<String>()
            .as_str(),
    )
}

pub fn err_to_string(source: &Source, err_tok_span: Span, line_nr: usize, color: bool) -> String {
    // the number of digits in the number displayed as string
    let len_line_nr = line_nr.to_string().len();
    let filler = " ".repeat(len_line_nr + 1);

    // implicit terminators and EOF are zero width
    let len = cmp::max(UnicodeWidthStr::width(source.slice(err_tok_span)), 1);
    let dist = find_dist(source, err_tok_span.start);

    let marker = format!("{}{}", " ".repeat(dist), "^".repeat(len));
    let marker = if color {
        Red.paint(marker).to_string()
    } else {
        marker
    };

    let line = source.code.lines().nth(line_nr - 1).unwrap_or("");

    format!("{}|\n{} |{}\n{}|{}", filler, line_nr, line, filler, marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_line_index() {
        let source = Source::new("main", "let a = 1\nlet b = @");

        assert_eq!((1, 1), find_line_index(&source, 0));
        assert_eq!((2, 9), find_line_index(&source, 18));
    }

    #[test]
    fn test_marker_is_placed_under_wide_chars() {
        let source = Source::new("main", "a こ b");
        let start = "a ".len();
        let span = Span::new(start, start + 'こ'.len_utf8());

        assert_eq!(
            "  |\n1 |a こ b\n  |  ^^",
            err_to_string(&source, span, 1, false)
        );
    }

    #[test]
    fn test_zero_width_span_gets_one_caret() {
        let source = Source::new("main", "{ 1");

        assert_eq!(
            "error: expected '}', got end of file\n--> main:1:4\n  |\n1 |{ 1\n  |   ^",
            format_error(&source, Span::new(3, 3), "expected '}', got end of file", false)
        );
    }
}
