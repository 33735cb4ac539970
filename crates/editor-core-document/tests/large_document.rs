use editor_core_document::{LEGAL_LINE_DELIMITERS, TextDocument};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 16);
    for i in 0..line_count {
        out.push_str(&format!("Line {i}\n"));
    }
    out
}

#[test]
fn test_large_document_line_access() {
    let text = large_text(10_000);
    let doc = TextDocument::from_text(&text);

    // Trailing '\n' opens one more (empty) line.
    assert_eq!(doc.line_count(), 10_001);

    let start = doc.line_to_char(5000).unwrap();
    assert_eq!(doc.line_text(5000).as_deref(), Some("Line 5000\n"));
    assert_eq!(doc.char_to_line(start + 3), Some(5000));
    assert_eq!(doc.slice(start, 9).as_deref(), Some("Line 5000"));
}

#[test]
fn test_every_legal_delimiter_terminates_a_line() {
    for delimiter in LEGAL_LINE_DELIMITERS {
        let doc = TextDocument::from_text(&format!("a{delimiter}b"));
        assert_eq!(doc.line_count(), 2, "delimiter {delimiter:?}");
        assert_eq!(doc.line_to_char(1), Some(1 + delimiter.chars().count()));
    }
}
