//! Table mapping for [`User`].

use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::sql_types::{Date as SqlDate, Nullable, Text, Timestamptz};
use jiff_diesel::ToDiesel;

use crate::db::sql::{Dependent, LinkTable, TableSpec};
use crate::models::{Patch, User, UserPatch};
use crate::repositories::entity::{BoxedQuery, Entity, bind_merge_field};
use crate::repositories::relation_repo::USER_FILM;

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(Pg))]
pub struct UserRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Nullable<SqlDate>)]
    pub date_of_birth: Option<jiff_diesel::Date>,
    #[diesel(sql_type = Nullable<Text>)]
    pub gender: Option<String>,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: jiff_diesel::Timestamp,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: jiff_diesel::Timestamp,
}

impl Entity for User {
    const KIND: &'static str = "user";
    const SPEC: TableSpec<'static> = TableSpec {
        table: "users",
        id_column: "id",
        columns: &[
            "id",
            "name",
            "email",
            "date_of_birth",
            "gender",
            "created_at",
            "updated_at",
        ],
        patch_columns: &["name", "email", "date_of_birth", "gender"],
        sort_keys: &["name", "email"],
        updated_at_column: "updated_at",
    };
    const DEPENDENTS: &'static [Dependent] = &[Dependent {
        table: USER_FILM.table,
        column: USER_FILM.owner_column,
    }];
    const LINK: Option<LinkTable> = Some(USER_FILM);

    type Row = UserRow;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            date_of_birth: row.date_of_birth.map(|d| d.to_jiff()),
            gender: row.gender,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
            film_ids: Vec::new(),
        }
    }

    fn bind_insert<'f>(&self, query: BoxedQuery<'f>) -> BoxedQuery<'f> {
        query
            .bind::<Text, _>(self.id.clone())
            .bind::<Text, _>(self.name.clone())
            .bind::<Text, _>(self.email.clone())
            .bind::<Nullable<SqlDate>, _>(self.date_of_birth.map(|d| d.to_diesel()))
            .bind::<Nullable<Text>, _>(self.gender.clone())
            .bind::<Timestamptz, _>(self.created_at.to_diesel())
            .bind::<Timestamptz, _>(self.updated_at.to_diesel())
    }

    fn bind_patch<'f>(patch: &UserPatch, query: BoxedQuery<'f>) -> BoxedQuery<'f> {
        let (dob_set, dob) = patch.date_of_birth.bind_nullable_parts();
        let query = bind_merge_field::<Text, _>(query, patch.name.bind_parts());
        let query = bind_merge_field::<Text, _>(query, patch.email.bind_parts());
        let query = bind_merge_field::<SqlDate, _>(query, (dob_set, dob.map(|d| d.to_diesel())));
        bind_merge_field::<Text, _>(query, patch.gender.bind_nullable_parts())
    }

    fn full_patch(&self) -> UserPatch {
        UserPatch {
            name: Patch::Set(self.name.clone()),
            email: Patch::Set(self.email.clone()),
            date_of_birth: Patch::keep_if_none(self.date_of_birth),
            gender: Patch::keep_if_none(self.gender.clone()),
        }
    }

    fn link_ids(&self) -> &[String] {
        &self.film_ids
    }

    fn attach_link_ids(&mut self, ids: Vec<String>) {
        self.film_ids = ids;
    }
}
