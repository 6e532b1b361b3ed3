//! URL slug derivation for player and server names.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases, maps runs of non-alphanumeric characters to a single `-`,
/// and trims leading/trailing dashes. Clan tags like `[LW]` collapse into
/// the slug rather than producing stray separators.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Desert Fox"), "desert-fox");
    }

    #[test]
    fn test_slugify_clan_tag() {
        assert_eq!(slugify("[LW] Hammer"), "lw-hammer");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("a  --  b"), "a-b");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("!!Boom!!"), "boom");
    }

    #[test]
    fn test_slugify_numbers() {
        assert_eq!(slugify("Player 42"), "player-42");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("***"), "");
    }
}
