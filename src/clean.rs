//! Text normalisation for scraped synopses, critic excerpts and titles.

/// Ordered substring rewrites. Applied left to right, each one over the
/// whole string, before the suffix trims.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\"", " "),
    ("'", " "),
    ("',", ", "),
    ("'", ""),
    (" (...) ", ". "),
    (" (…) ", ". "),
    ("“", ""),
    ("..", ". "),
    (" ,", ", "),
    ("  ", " "),
];

const ATTRIBUTION_SUFFIX: &str = "(FILMAFFINITY)";
const AKA_SUFFIX: &str = "aka";

fn clean_once(input: &str) -> String {
    let mut s = input.to_string();
    for (from, to) in REPLACEMENTS {
        s = s.replace(*from, to);
    }
    let mut s = s.trim();
    if let Some(stripped) = s.strip_suffix(ATTRIBUTION_SUFFIX) {
        s = stripped.trim();
    }
    if let Some(stripped) = s.strip_suffix(AKA_SUFFIX) {
        s = stripped.trim();
    }
    s.to_string()
}

/// Clean scraped text: drop quote characters, turn `(...)` ellipsis markers
/// into sentence breaks, collapse doubled periods and spaces, and trim the
/// site attribution and a dangling "aka".
///
/// The rewrite list is repeated until the text stops changing, so cleaning
/// cleaned text is a no-op. A single pass would leave runs of three or more
/// spaces (or a `" ,"` created by the collapse) partly in place; here they
/// settle, e.g. `"a   b"` becomes `"a b"` rather than `"a  b"`.
pub fn clean_text(input: &str) -> String {
    let mut current = clean_once(input);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Append a period unless the text already ends with one.
pub fn ensure_period(mut text: String) -> String {
    if !text.ends_with('.') {
        text.push('.');
    }
    text
}

/// Drop everything from the first occurrence of `label` on (the critic's
/// score annotation).
pub fn strip_rating(text: &str, label: &str) -> String {
    match text.find(label) {
        Some(idx) => text[..idx].trim().to_string(),
        None => text.to_string(),
    }
}

/// Build a search slug: split on spaces, trim and optionally lowercase each
/// word, percent-encode it, join with `separator`.
pub fn search_slug(title: &str, separator: &str, lowercase: bool) -> String {
    title
        .split(' ')
        .map(|word| {
            let word = word.trim();
            let word = if lowercase {
                word.to_lowercase()
            } else {
                word.to_string()
            };
            url::form_urlencoded::byte_serialize(word.as_bytes()).collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// First parenthesised group made only of digits, e.g. `2019` in
/// `"Star Wars: The Rise of Skywalker (2019) (TV Episode)"`.
pub fn find_year_in_unformatted_text(text: &str) -> Option<String> {
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let close = after.find(')')?;
        let inner = &after[..close];
        if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
            return Some(inner.to_string());
        }
        rest = &after[close + 1..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_quotes_and_ellipsis() {
        assert_eq!(clean_text(r#"A "quoted" word"#), "A quoted word");
        assert_eq!(clean_text("He says hello (...) then leaves."), "He says hello. then leaves.");
    }

    #[test]
    fn test_clean_unicode_ellipsis_marker() {
        assert_eq!(clean_text("First part (…) second part"), "First part. second part");
    }

    #[test]
    fn test_clean_trims_attribution_and_aka() {
        assert_eq!(clean_text("A quiet drama. (FILMAFFINITY)"), "A quiet drama.");
        assert_eq!(clean_text("Some Title aka"), "Some Title");
    }

    #[test]
    fn test_clean_collapses_double_periods() {
        assert_eq!(clean_text("Ends here.. Next"), "Ends here. Next");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            r#"A "quoted" line ,with  odd   spacing.. (...) and more aka aka"#,
            "x  , y",
            "Plain sentence.",
            "Trailing (FILMAFFINITY) (FILMAFFINITY)",
            "It's a 'test' … (…) end",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_clean_settles_long_space_runs() {
        // One pass over the rewrite list alone yields "a  b".
        assert_eq!(clean_once("a   b"), "a  b");
        assert_eq!(clean_text("a   b"), "a b");
        assert_eq!(clean_text("x  , y"), "x, y");
    }

    #[test]
    fn test_ensure_period() {
        assert_eq!(ensure_period("A story".to_string()), "A story.");
        assert_eq!(ensure_period("A story.".to_string()), "A story.");
    }

    #[test]
    fn test_strip_rating() {
        assert_eq!(
            strip_rating("Great film. Rating: 8/10", "Rating"),
            "Great film."
        );
        assert_eq!(strip_rating("No score here.", "Rating"), "No score here.");
        assert_eq!(strip_rating("Muy buena. Puntuación: 4", "Puntuación"), "Muy buena.");
    }

    #[test]
    fn test_search_slug() {
        assert_eq!(search_slug(" The  Dark Knight ", "-", true), "-the--dark-knight-");
        assert_eq!(search_slug("Spider-Man Far", "-", true), "spider-man-far");
        assert_eq!(search_slug("la la land", "+", false), "la+la+land");
        assert_eq!(search_slug("Amélie", "-", true), "am%C3%A9lie");
    }

    #[test]
    fn test_find_year_in_unformatted_text() {
        assert_eq!(
            find_year_in_unformatted_text("Star Wars: The Rise of Skywalker (2019) (TV Episode) - Season 2"),
            Some("2019".to_string())
        );
        assert_eq!(
            find_year_in_unformatted_text("IMDb on the Scene (TV Series) (2017)"),
            Some("2017".to_string())
        );
        assert_eq!(find_year_in_unformatted_text("No year (here)"), None);
        assert_eq!(find_year_in_unformatted_text("Broken (2019"), None);
    }
}
