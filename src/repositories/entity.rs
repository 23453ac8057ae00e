//! One repository implementation shared by every entity table.
//!
//! An [`Entity`] describes its table and how to bind itself; the
//! [`EntityRepository`] owns the statements and the error mapping.

use std::collections::HashMap;
use std::marker::PhantomData;

use diesel::pg::Pg;
use diesel::QueryableByName;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::serialize::ToSql;
use diesel::sql_types::{Bool, HasSqlType, Nullable, Text, Timestamptz};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use jiff_diesel::ToDiesel;
use tracing::{debug, error, warn};

use crate::db::sql::{self, Dependent, LinkTable, TableSpec};
use crate::db::{AsyncDbPool, OpContext};
use crate::error::{AppError, AppResult, StoreAccess};
use crate::repositories::relation_repo::load_link_ids;

/// Raw `sql_query` with dynamically appended binds.
pub type BoxedQuery<'f> = BoxedSqlQuery<'f, Pg, SqlQuery>;

/// Table description and bind logic for one persisted type.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Name used in errors and logs.
    const KIND: &'static str;
    const SPEC: TableSpec<'static>;
    /// Rows elsewhere that reference this entity and go away with it.
    const DEPENDENTS: &'static [Dependent] = &[];
    /// Association rows this entity owns, written on create and read back on load.
    const LINK: Option<LinkTable> = None;

    type Row: QueryableByName<Pg> + Send + 'static;
    type Patch: Send + Sync;

    fn id(&self) -> &str;

    fn from_row(row: Self::Row) -> Self;

    /// Appends one bind per entry of `SPEC.columns`, in order.
    fn bind_insert<'f>(&self, query: BoxedQuery<'f>) -> BoxedQuery<'f>;

    /// Appends a `(flag, value)` pair per entry of `SPEC.patch_columns`, in order.
    fn bind_patch<'f>(patch: &Self::Patch, query: BoxedQuery<'f>) -> BoxedQuery<'f>;

    /// The merge equivalent of a full replacement by `self`.
    fn full_patch(&self) -> Self::Patch;

    fn link_ids(&self) -> &[String] {
        &[]
    }

    fn attach_link_ids(&mut self, _ids: Vec<String>) {}
}

/// Binds one merge column: a flag saying whether to overwrite, then the value.
pub fn bind_merge_field<'f, ST, T>(query: BoxedQuery<'f>, parts: (bool, Option<T>)) -> BoxedQuery<'f>
where
    Pg: HasSqlType<Nullable<ST>>,
    Option<T>: ToSql<Nullable<ST>, Pg> + Send + 'f,
    Nullable<ST>: Send + 'f,
{
    let (overwrite, value) = parts;
    query.bind::<Bool, _>(overwrite).bind::<Nullable<ST>, _>(value)
}

/// Generic CRUD over an [`Entity`] table.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
pub struct EntityRepository<E> {
    pool: AsyncDbPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    fn store_error(access: StoreAccess, operation: &'static str) -> impl Fn(diesel::result::Error) -> AppError {
        move |e| {
            let converted = AppError::from_store(e, access, E::KIND, operation);
            if !converted.is_client_error() {
                error!(entity = E::KIND, operation, error = ?converted, "Store operation failed");
            }
            converted
        }
    }

    /// Inserts `entity` and its association rows (in the order given) in one
    /// transaction. The caller assigns the id and both timestamps.
    pub async fn create(&self, ctx: &OpContext, entity: E) -> AppResult<E> {
        ctx.run("create", async {
            let mut conn = self.pool.get().await?;
            let insert_sql = sql::insert(&E::SPEC);
            let link_sql = E::LINK.as_ref().map(sql::insert_link);
            let record = &entity;

            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    record
                        .bind_insert(diesel::sql_query(insert_sql).into_boxed())
                        .execute(conn)
                        .await?;

                    if let Some(link_sql) = link_sql {
                        for target in record.link_ids() {
                            diesel::sql_query(link_sql.as_str())
                                .bind::<Text, _>(record.id())
                                .bind::<Text, _>(target.as_str())
                                .execute(conn)
                                .await?;
                        }
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await
            .map_err(Self::store_error(StoreAccess::Write, "create"))?;
            drop(conn);

            debug!(entity = E::KIND, id = entity.id(), "Created");
            Ok(entity)
        })
        .await
    }

    /// Every row, in whatever order the store returns them.
    pub async fn find_all(&self, ctx: &OpContext) -> AppResult<Vec<E>> {
        self.load_many(ctx, "find_all", sql::select_all(&E::SPEC))
            .await
    }

    /// Every row ordered by the entity's sort keys, ascending.
    pub async fn find_all_sorted(&self, ctx: &OpContext) -> AppResult<Vec<E>> {
        self.load_many(ctx, "find_all_sorted", sql::select_sorted(&E::SPEC))
            .await
    }

    pub async fn find_one(&self, ctx: &OpContext, id: &str) -> AppResult<E> {
        ctx.run("find_one", async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<E::Row> = diesel::sql_query(sql::select_one(&E::SPEC))
                .bind::<Text, _>(id)
                .load(&mut conn)
                .await
                .map_err(Self::store_error(StoreAccess::Read, "find_one"))?;

            let mut entities = Self::single(rows, id)?;
            self.attach_links(&mut conn, &mut entities, "find_one").await?;
            entities.pop().ok_or_else(|| AppError::not_found(E::KIND, id))
        })
        .await
    }

    /// Replaces every field from `entity`; optional fields that are absent keep
    /// their stored value. Returns the stored entity.
    pub async fn update(&self, ctx: &OpContext, id: &str, entity: &E) -> AppResult<E> {
        let patch = entity.full_patch();
        self.merge(ctx, "update", id, &patch).await
    }

    /// Overwrites only the fields set in `patch`. Returns the stored entity.
    pub async fn partial_update(&self, ctx: &OpContext, id: &str, patch: &E::Patch) -> AppResult<E> {
        self.merge(ctx, "partial_update", id, patch).await
    }

    /// Removes the row and every row referencing it. A missing id is not an error.
    pub async fn delete(&self, ctx: &OpContext, id: &str) -> AppResult<()> {
        ctx.run("delete", async {
            let mut conn = self.pool.get().await?;

            let removed = conn
                .transaction::<_, diesel::result::Error, _>(|conn| {
                    async move {
                        for dependent in E::DEPENDENTS {
                            diesel::sql_query(sql::delete_dependents(dependent))
                                .bind::<Text, _>(id)
                                .execute(conn)
                                .await?;
                        }
                        diesel::sql_query(sql::delete(&E::SPEC))
                            .bind::<Text, _>(id)
                            .execute(conn)
                            .await
                    }
                    .scope_boxed()
                })
                .await
                .map_err(Self::store_error(StoreAccess::Write, "delete"))?;

            debug!(entity = E::KIND, id, removed, "Deleted");
            Ok(())
        })
        .await
    }

    async fn merge(&self, ctx: &OpContext, operation: &'static str, id: &str, patch: &E::Patch) -> AppResult<E> {
        ctx.run(operation, async {
            let mut conn = self.pool.get().await?;
            let query = diesel::sql_query(sql::merge_update(&E::SPEC))
                .into_boxed::<Pg>()
                .bind::<Text, _>(id.to_string());
            let query = E::bind_patch(patch, query)
                .bind::<Timestamptz, _>(jiff::Timestamp::now().to_diesel());

            let rows: Vec<E::Row> = query
                .load(&mut conn)
                .await
                .map_err(Self::store_error(StoreAccess::Write, operation))?;

            let mut entities = Self::single(rows, id)?;
            self.attach_links(&mut conn, &mut entities, operation).await?;
            entities.pop().ok_or_else(|| AppError::not_found(E::KIND, id))
        })
        .await
    }

    async fn load_many(&self, ctx: &OpContext, operation: &'static str, statement: String) -> AppResult<Vec<E>> {
        ctx.run(operation, async {
            let mut conn = self.pool.get().await?;
            let rows: Vec<E::Row> = diesel::sql_query(statement)
                .load(&mut conn)
                .await
                .map_err(Self::store_error(StoreAccess::Read, operation))?;

            let mut entities: Vec<E> = rows.into_iter().map(E::from_row).collect();
            self.attach_links(&mut conn, &mut entities, operation).await?;
            Ok(entities)
        })
        .await
    }

    fn single(rows: Vec<E::Row>, id: &str) -> AppResult<Vec<E>> {
        match rows.into_iter().next() {
            Some(row) => Ok(vec![E::from_row(row)]),
            None => {
                warn!(entity = E::KIND, id, "No row with this id");
                Err(AppError::not_found(E::KIND, id))
            }
        }
    }

    async fn attach_links(
        &self,
        conn: &mut AsyncPgConnection,
        entities: &mut [E],
        operation: &'static str,
    ) -> AppResult<()> {
        let Some(link) = E::LINK else {
            return Ok(());
        };
        if entities.is_empty() {
            return Ok(());
        }

        let owners: Vec<String> = entities.iter().map(|e| e.id().to_string()).collect();
        let mut by_owner: HashMap<String, Vec<String>> = load_link_ids(conn, &link, owners)
            .await
            .map_err(Self::store_error(StoreAccess::Read, operation))?;

        for entity in entities.iter_mut() {
            let ids = by_owner.remove(entity.id()).unwrap_or_default();
            entity.attach_link_ids(ids);
        }
        Ok(())
    }
}
