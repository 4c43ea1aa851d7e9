/// Descriptor for one codex kind. Every kind shares the same column shape;
/// the descriptor carries the identifiers that differ between kinds. These
/// constants are the only strings ever interpolated into codex SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodexKind {
    /// URL path segment, e.g. "magic-systems".
    pub slug: &'static str,
    /// Content table.
    pub table: &'static str,
    /// Book link table.
    pub link_table: &'static str,
    /// Entry id column inside the link table.
    pub link_column: &'static str,
    /// Human label for messages.
    pub label: &'static str,
}

pub const KINDS: &[CodexKind] = &[
    CodexKind {
        slug: "groups",
        table: "groups",
        link_table: "group_books",
        link_column: "group_id",
        label: "group",
    },
    CodexKind {
        slug: "magic-systems",
        table: "magic_systems",
        link_table: "magic_system_books",
        link_column: "magic_system_id",
        label: "magic system",
    },
    CodexKind {
        slug: "technologies",
        table: "technologies",
        link_table: "technology_books",
        link_column: "technology_id",
        label: "technology",
    },
    CodexKind {
        slug: "worlds",
        table: "worlds",
        link_table: "world_books",
        link_column: "world_id",
        label: "world",
    },
    CodexKind {
        slug: "characters",
        table: "characters",
        link_table: "character_books",
        link_column: "character_id",
        label: "character",
    },
    CodexKind {
        slug: "locations",
        table: "locations",
        link_table: "location_books",
        link_column: "location_id",
        label: "location",
    },
    CodexKind {
        slug: "items",
        table: "items",
        link_table: "item_books",
        link_column: "item_id",
        label: "item",
    },
    CodexKind {
        slug: "creatures",
        table: "creatures",
        link_table: "creature_books",
        link_column: "creature_id",
        label: "creature",
    },
    CodexKind {
        slug: "languages",
        table: "languages",
        link_table: "language_books",
        link_column: "language_id",
        label: "language",
    },
    CodexKind {
        slug: "religions",
        table: "religions",
        link_table: "religion_books",
        link_column: "religion_id",
        label: "religion",
    },
];

impl CodexKind {
    /// Look up a kind by its URL segment.
    pub fn from_slug(slug: &str) -> Option<&'static CodexKind> {
        KINDS.iter().find(|kind| kind.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_safe_identifier(name: &str) -> bool {
        !name.is_empty()
            && name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
    }

    #[test]
    fn test_lookup_by_slug() {
        let kind = CodexKind::from_slug("magic-systems").unwrap();
        assert_eq!(kind.table, "magic_systems");
        assert_eq!(kind.link_table, "magic_system_books");

        assert!(CodexKind::from_slug("spaceships").is_none());
        assert!(CodexKind::from_slug("").is_none());
        // Slugs are exact: no table name sneaks in through the URL.
        assert!(CodexKind::from_slug("magic_systems").is_none());
    }

    #[test]
    fn test_every_identifier_is_sql_safe() {
        for kind in KINDS {
            assert!(is_safe_identifier(kind.table), "table {}", kind.table);
            assert!(is_safe_identifier(kind.link_table), "link table {}", kind.link_table);
            assert!(is_safe_identifier(kind.link_column), "link column {}", kind.link_column);
        }
    }

    #[test]
    fn test_slugs_and_tables_are_unique() {
        for (i, a) in KINDS.iter().enumerate() {
            for b in &KINDS[i + 1..] {
                assert_ne!(a.slug, b.slug);
                assert_ne!(a.table, b.table);
                assert_ne!(a.link_table, b.link_table);
            }
        }
    }

    #[test]
    fn test_link_tables_follow_the_naming_scheme() {
        for kind in KINDS {
            assert!(kind.link_table.ends_with("_books"), "{}", kind.link_table);
            assert!(kind.link_column.ends_with("_id"), "{}", kind.link_column);
        }
    }
}
