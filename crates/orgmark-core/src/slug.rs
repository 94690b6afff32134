/// Turns heading or target text into an HTML anchor fragment.
///
/// Letters and digits are kept (lowercased), runs of whitespace, `-` and `_`
/// collapse into a single `-`, and other punctuation is dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "hello-world")]
    #[case("  Trade   Networks ", "trade-networks")]
    #[case("snake_case-and-kebab", "snake-case-and-kebab")]
    #[case("What's new?", "whats-new")]
    #[case("--leading and trailing--", "leading-and-trailing")]
    #[case("Über Straße", "über-straße")]
    #[case("!!!", "")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }
}
