use crate::foundation::error::GnxResult;

/// Greedy first-fit word wrap.
///
/// A word joins the current line while the measured width of `line + " " + word` stays strictly
/// below `max_width`; otherwise it starts a new line. Words are never split, so a single word
/// wider than `max_width` occupies a line of its own.
pub fn wrap_words<F>(text: &str, max_width: f32, mut measure: F) -> GnxResult<Vec<String>>
where
    F: FnMut(&str) -> GnxResult<f32>,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(Vec::new());
    };

    let mut lines = Vec::new();
    let mut line = first.to_string();
    for word in words {
        let candidate = format!("{line} {word}");
        if measure(&candidate)? < max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/wrap.rs"]
mod tests;
