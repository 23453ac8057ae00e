//! SQL text for the generic repositories.
//!
//! Every statement is rendered from a [`TableSpec`] so the same code serves
//! all entity tables. Placeholders are positional; the bind order expected
//! by each statement is documented on its builder.

/// Shape of one entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec<'a> {
    pub table: &'a str,
    pub id_column: &'a str,
    /// Every selected column, in the order rows are read and inserted.
    pub columns: &'a [&'a str],
    /// Columns a merge may overwrite.
    pub patch_columns: &'a [&'a str],
    pub sort_keys: &'a [&'a str],
    pub updated_at_column: &'a str,
}

/// A table holding `(owner, target)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

/// A column elsewhere that references an entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
}

fn column_list(spec: &TableSpec<'_>) -> String {
    spec.columns.join(", ")
}

pub fn select_all(spec: &TableSpec<'_>) -> String {
    format!("SELECT {} FROM {}", column_list(spec), spec.table)
}

pub fn select_sorted(spec: &TableSpec<'_>) -> String {
    if spec.sort_keys.is_empty() {
        return select_all(spec);
    }
    format!("{} ORDER BY {}", select_all(spec), spec.sort_keys.join(", "))
}

/// Binds: `$1` id.
pub fn select_one(spec: &TableSpec<'_>) -> String {
    format!("{} WHERE {} = $1", select_all(spec), spec.id_column)
}

/// Binds: one value per entry of `spec.columns`, in order.
pub fn insert(spec: &TableSpec<'_>) -> String {
    let placeholders: Vec<String> = (1..=spec.columns.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        spec.table,
        column_list(spec),
        placeholders.join(", ")
    )
}

/// Merge update: columns whose flag is true take the bound value, the rest
/// keep what is stored. `updated_at` never moves backwards.
///
/// Binds: `$1` id, then a `(flag, value)` pair per patch column, then the
/// new `updated_at`.
pub fn merge_update(spec: &TableSpec<'_>) -> String {
    let mut assignments: Vec<String> = spec
        .patch_columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let flag = 2 + 2 * i;
            format!(
                "{column} = CASE WHEN ${flag} THEN ${value} ELSE {column} END",
                column = column,
                flag = flag,
                value = flag + 1
            )
        })
        .collect();
    let stamp = 2 + 2 * spec.patch_columns.len();
    assignments.push(format!(
        "{col} = GREATEST({col}, ${stamp})",
        col = spec.updated_at_column,
        stamp = stamp
    ));

    format!(
        "UPDATE {} SET {} WHERE {} = $1 RETURNING {}",
        spec.table,
        assignments.join(", "),
        spec.id_column,
        column_list(spec)
    )
}

/// Binds: `$1` id.
pub fn delete(spec: &TableSpec<'_>) -> String {
    format!("DELETE FROM {} WHERE {} = $1", spec.table, spec.id_column)
}

/// Binds: `$1` referenced id.
pub fn delete_dependents(dependent: &Dependent) -> String {
    format!("DELETE FROM {} WHERE {} = $1", dependent.table, dependent.column)
}

/// Binds: `$1` owner id, `$2` target id.
pub fn insert_link(link: &LinkTable) -> String {
    format!(
        "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
        link.table, link.owner_column, link.target_column
    )
}

/// Rows come back as `owner_id`, `target_id`. Binds: `$1` text array of owner ids.
pub fn select_links(link: &LinkTable) -> String {
    format!(
        "SELECT {} AS owner_id, {} AS target_id FROM {} WHERE {} = ANY($1)",
        link.owner_column, link.target_column, link.table, link.owner_column
    )
}

/// Targets linked to one owner, each at most once, in `target`'s sort order.
///
/// Binds: `$1` owner id.
pub fn select_linked(target: &TableSpec<'_>, link: &LinkTable) -> String {
    format!(
        "{} WHERE {} IN (SELECT {} FROM {} WHERE {} = $1)",
        select_all(target),
        target.id_column,
        link.target_column,
        link.table,
        link.owner_column
    ) + &order_by(target)
}

fn order_by(spec: &TableSpec<'_>) -> String {
    if spec.sort_keys.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", spec.sort_keys.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FILMS: TableSpec<'static> = TableSpec {
        table: "films",
        id_column: "film_id",
        columns: &["film_id", "title", "rating", "created_at", "updated_at"],
        patch_columns: &["title", "rating"],
        sort_keys: &["title", "rating"],
        updated_at_column: "updated_at",
    };

    const USER_FILM: LinkTable = LinkTable {
        table: "user_film",
        owner_column: "user_id",
        target_column: "film_id",
    };

    #[test]
    fn test_select_statements() {
        assert_eq!(
            select_all(&FILMS),
            "SELECT film_id, title, rating, created_at, updated_at FROM films"
        );
        assert!(select_sorted(&FILMS).ends_with(" ORDER BY title, rating"));
        assert!(select_one(&FILMS).ends_with(" WHERE film_id = $1"));
    }

    #[test]
    fn test_insert_placeholders_follow_columns() {
        assert_eq!(
            insert(&FILMS),
            "INSERT INTO films (film_id, title, rating, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)"
        );
    }

    #[test]
    fn test_merge_update_shape() {
        assert_eq!(
            merge_update(&FILMS),
            "UPDATE films SET title = CASE WHEN $2 THEN $3 ELSE title END, \
             rating = CASE WHEN $4 THEN $5 ELSE rating END, \
             updated_at = GREATEST(updated_at, $6) \
             WHERE film_id = $1 \
             RETURNING film_id, title, rating, created_at, updated_at"
        );
    }

    #[test]
    fn test_link_statements() {
        assert_eq!(
            insert_link(&USER_FILM),
            "INSERT INTO user_film (user_id, film_id) VALUES ($1, $2)"
        );
        assert_eq!(
            select_links(&USER_FILM),
            "SELECT user_id AS owner_id, film_id AS target_id FROM user_film WHERE user_id = ANY($1)"
        );
        assert_eq!(
            delete_dependents(&Dependent {
                table: "user_film",
                column: "film_id"
            }),
            "DELETE FROM user_film WHERE film_id = $1"
        );
    }

    #[test]
    fn test_select_linked_filters_and_orders() {
        assert_eq!(
            select_linked(&FILMS, &USER_FILM),
            "SELECT film_id, title, rating, created_at, updated_at FROM films \
             WHERE film_id IN (SELECT film_id FROM user_film WHERE user_id = $1) \
             ORDER BY title, rating"
        );
    }

    #[test]
    fn test_unsorted_spec_has_no_order_by() {
        let spec = TableSpec {
            sort_keys: &[],
            ..FILMS
        };
        assert_eq!(select_sorted(&spec), select_all(&spec));
        assert!(!select_linked(&spec, &USER_FILM).contains("ORDER BY"));
    }

    proptest! {
        #[test]
        fn prop_merge_update_binds_every_column_once(
            columns in proptest::collection::btree_set("[a-z]{3,8}", 1..8)
        ) {
            let columns: Vec<String> = columns.into_iter().collect();
            let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
            let spec = TableSpec {
                table: "t",
                id_column: "id",
                columns: &refs,
                patch_columns: &refs,
                sort_keys: &[],
                updated_at_column: "updated_at",
            };
            let sql = merge_update(&spec);
            let n = refs.len();

            for (i, column) in refs.iter().enumerate() {
                let flag = 2 + 2 * i;
                let expected = format!(
                    "{c} = CASE WHEN ${f} THEN ${v} ELSE {c} END",
                    c = column, f = flag, v = flag + 1
                );
                prop_assert!(sql.contains(&expected));
            }
            let stamp = format!("GREATEST(updated_at, ${})", 2 + 2 * n);
            prop_assert!(sql.contains(&stamp));
            let highest = format!("${}", 2 + 2 * n + 1);
            prop_assert!(!sql.contains(&highest));
        }
    }
}
