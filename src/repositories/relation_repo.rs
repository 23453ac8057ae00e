//! Reads over the user/film association table.

use std::collections::HashMap;

use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::sql_types::{Array, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::db::sql::{self, LinkTable};
use crate::db::{AsyncDbPool, OpContext};
use crate::error::{AppError, AppResult, StoreAccess};
use crate::models::Film;
use crate::repositories::entity::Entity;
use crate::repositories::film_repo::FilmRow;

/// `user_film(user_id, film_id)`. Pairs are not unique.
pub const USER_FILM: LinkTable = LinkTable {
    table: "user_film",
    owner_column: "user_id",
    target_column: "film_id",
};

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(Pg))]
struct LinkRow {
    #[diesel(sql_type = Text)]
    owner_id: String,
    #[diesel(sql_type = Text)]
    target_id: String,
}

/// Target ids grouped by owner, for every owner in `owners` that has links.
pub(crate) async fn load_link_ids(
    conn: &mut AsyncPgConnection,
    link: &LinkTable,
    owners: Vec<String>,
) -> Result<HashMap<String, Vec<String>>, diesel::result::Error> {
    let rows: Vec<LinkRow> = diesel::sql_query(sql::select_links(link))
        .bind::<Array<Text>, _>(owners)
        .load(conn)
        .await?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner_id).or_default().push(row.target_id);
    }
    Ok(grouped)
}

#[derive(Clone)]
pub struct RelationRepository {
    pool: AsyncDbPool,
}

impl RelationRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Films linked to `user_id`, each once, ordered like the sorted film
    /// listing. An unknown user yields an empty list.
    pub async fn films_for_user(&self, ctx: &OpContext, user_id: &str) -> AppResult<Vec<Film>> {
        ctx.run("films_for_user", async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<FilmRow> = diesel::sql_query(sql::select_linked(&Film::SPEC, &USER_FILM))
                .bind::<Text, _>(user_id)
                .load(&mut conn)
                .await
                .map_err(|e| AppError::from_store(e, StoreAccess::Read, "user_film", "films_for_user"))?;

            debug!(user_id, count = rows.len(), "Loaded films for user");
            Ok(rows.into_iter().map(Film::from_row).collect())
        })
        .await
    }

}
