const MAX_ERROR_LENGTH: usize = 2_000;
const MAX_PREVIEW_LENGTH: usize = 400;

/// Largest char boundary at or below `max`.
fn floor_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Cut a provider error body so it stays readable in logs.
pub fn truncate_error(error: &str) -> String {
    truncate_to(error, MAX_ERROR_LENGTH)
}

/// Short single-line preview of a raw model response.
pub fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_to(&flat, MAX_PREVIEW_LENGTH)
}

pub fn truncate_to(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        format!("{}...", &text[..floor_boundary(text, max)])
    }
}
