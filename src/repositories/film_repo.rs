//! Table mapping for [`Film`].

use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::sql_types::{Date as SqlDate, Double, Nullable, Text, Timestamptz};
use jiff_diesel::ToDiesel;

use crate::db::sql::{Dependent, TableSpec};
use crate::models::{Film, FilmPatch, Patch};
use crate::repositories::entity::{BoxedQuery, Entity, bind_merge_field};
use crate::repositories::relation_repo::USER_FILM;

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(Pg))]
pub struct FilmRow {
    #[diesel(sql_type = Text)]
    pub film_id: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Double)]
    pub rating: f64,
    #[diesel(sql_type = SqlDate)]
    pub release_date: jiff_diesel::Date,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: jiff_diesel::Timestamp,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: jiff_diesel::Timestamp,
}

impl Entity for Film {
    const KIND: &'static str = "film";
    const SPEC: TableSpec<'static> = TableSpec {
        table: "films",
        id_column: "film_id",
        columns: &[
            "film_id",
            "title",
            "description",
            "rating",
            "release_date",
            "created_at",
            "updated_at",
        ],
        patch_columns: &["title", "description", "rating", "release_date"],
        sort_keys: &["title", "rating", "release_date"],
        updated_at_column: "updated_at",
    };
    const DEPENDENTS: &'static [Dependent] = &[Dependent {
        table: USER_FILM.table,
        column: USER_FILM.target_column,
    }];

    type Row = FilmRow;
    type Patch = FilmPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: FilmRow) -> Self {
        Film {
            id: row.film_id,
            title: row.title,
            description: row.description,
            rating: row.rating,
            release_date: row.release_date.to_jiff(),
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }

    fn bind_insert<'f>(&self, query: BoxedQuery<'f>) -> BoxedQuery<'f> {
        query
            .bind::<Text, _>(self.id.clone())
            .bind::<Text, _>(self.title.clone())
            .bind::<Nullable<Text>, _>(self.description.clone())
            .bind::<Double, _>(self.rating)
            .bind::<SqlDate, _>(self.release_date.to_diesel())
            .bind::<Timestamptz, _>(self.created_at.to_diesel())
            .bind::<Timestamptz, _>(self.updated_at.to_diesel())
    }

    fn bind_patch<'f>(patch: &FilmPatch, query: BoxedQuery<'f>) -> BoxedQuery<'f> {
        let (date_set, date) = patch.release_date.bind_parts();
        let query = bind_merge_field::<Text, _>(query, patch.title.bind_parts());
        let query = bind_merge_field::<Text, _>(query, patch.description.bind_nullable_parts());
        let query = bind_merge_field::<Double, _>(query, patch.rating.bind_parts());
        bind_merge_field::<SqlDate, _>(query, (date_set, date.map(|d| d.to_diesel())))
    }

    fn full_patch(&self) -> FilmPatch {
        FilmPatch {
            title: Patch::Set(self.title.clone()),
            description: Patch::keep_if_none(self.description.clone()),
            rating: Patch::Set(self.rating),
            release_date: Patch::Set(self.release_date),
        }
    }
}
