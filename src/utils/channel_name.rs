//! Cosmetic channel-name cleanup

/// Normalize a display name: fold full-width ASCII to half-width, trim, and
/// collapse runs of whitespace. Pure function, no side effects.
pub fn clean_channel_name(name: &str) -> String {
    let folded: String = name.chars().map(fold_width).collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_width(c: char) -> char {
    match c {
        // ideographic space
        '\u{3000}' => ' ',
        // full-width ASCII block
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(clean_channel_name("  CCTV 1   综合  "), "CCTV 1 综合");
    }

    #[test]
    fn folds_full_width_characters() {
        assert_eq!(clean_channel_name("ＣＣＴＶ１"), "CCTV1");
        assert_eq!(clean_channel_name("凤凰　中文"), "凤凰 中文");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(clean_channel_name("湖南卫视"), "湖南卫视");
    }
}
