use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMAGE_MARKUP: Regex = Regex::new(r"!\[.*?\]\(.*?\)").unwrap();
}

/// Removes inline `![alt](url)` images so an image rendered separately is not shown twice.
///
/// The result never contains the pattern, including markup that only forms once
/// an inner image is removed (`!![a](b)[c](d)` becomes empty).
pub fn strip_images(text: &str) -> String {
    if !IMAGE_MARKUP.is_match(text) {
        return text.to_owned();
    }
    splice_out_images(text)
}

/// Single left-to-right pass. `out` never holds a match, so a new one can only
/// end at a freshly pushed `)`; it starts at the earliest `![` of the current
/// line that precedes the latest `](`, and is cut off by truncating `out`.
fn splice_out_images(text: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(text.len());
    // start indices of `![` and `](` in `out`, current line only
    let mut opens: Vec<usize> = Vec::new();
    let mut closes: Vec<usize> = Vec::new();

    for c in text.chars() {
        let at = out.len();
        match c {
            '\n' => {
                opens.clear();
                closes.clear();
            }
            '[' if at > 0 && out[at - 1] == '!' => opens.push(at - 1),
            '(' if at > 0 && out[at - 1] == ']' => closes.push(at - 1),
            ')' => {
                if let (Some(&start), Some(&close)) = (opens.first(), closes.last()) {
                    if start + 2 <= close {
                        out.truncate(start);
                        while opens.last().map_or(false, |&p| p + 2 > start) {
                            opens.pop();
                        }
                        while closes.last().map_or(false, |&p| p + 2 > start) {
                            closes.pop();
                        }
                        continue;
                    }
                }
            }
            _ => {}
        }
        out.push(c);
    }

    out.into_iter().collect()
}
