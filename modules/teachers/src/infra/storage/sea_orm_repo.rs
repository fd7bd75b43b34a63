//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction.

use anyhow::Context;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, NotSet, QueryFilter, QueryOrder, Schema, Set,
};

use crate::contract::model::{NewTeacher, Teacher};
use crate::domain::repo::TeachersRepository;
use crate::infra::storage::entity::{ActiveModel as TeacherAM, Column, Entity as TeacherEntity};
use crate::infra::storage::mapper::entity_to_contract;

/// Open a pooled connection. In-memory SQLite is pinned to a single
/// connection, since every connection would otherwise get its own database.
pub async fn connect(url: &str, max_conns: Option<u32>) -> anyhow::Result<DatabaseConnection> {
    let max = if url.contains(":memory:") {
        1
    } else {
        max_conns.unwrap_or(10)
    };

    let mut opts = ConnectOptions::new(url.to_owned());
    opts.max_connections(max).sqlx_logging(false);

    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{url}'"))
}

/// Create the `teachers` table from the entity definition if it is missing.
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    let backend = conn.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(TeacherEntity);
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt))
        .await
        .context("create teachers table failed")?;
    Ok(())
}

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmTeachersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmTeachersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Ids outside the column range cannot exist in the table.
fn to_key(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

#[async_trait::async_trait]
impl<C> TeachersRepository for SeaOrmTeachersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Teacher>> {
        let Some(key) = to_key(id) else {
            return Ok(None);
        };
        let found = TeacherEntity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(entity_to_contract))
    }

    async fn find_by_lastname_prefix(&self, prefix: &str) -> anyhow::Result<Vec<Teacher>> {
        let rows = TeacherEntity::find()
            .filter(Column::Lastname.starts_with(prefix))
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_by_lastname_prefix failed")?;

        // LIKE is case-insensitive on SQLite and treats `%`/`_` as wildcards,
        // so it returns a superset; narrow it to an exact prefix match.
        Ok(rows
            .into_iter()
            .filter(|m| m.lastname.starts_with(prefix))
            .map(entity_to_contract)
            .collect())
    }

    async fn insert(&self, new_teacher: NewTeacher) -> anyhow::Result<Teacher> {
        let m = TeacherAM {
            id: NotSet,
            firstname: Set(new_teacher.firstname),
            lastname: Set(new_teacher.lastname),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        Ok(entity_to_contract(saved))
    }

    async fn update(&self, t: Teacher) -> anyhow::Result<bool> {
        let Some(key) = to_key(t.id) else {
            return Ok(false);
        };
        let res = TeacherEntity::update_many()
            .col_expr(Column::Firstname, Expr::value(t.firstname))
            .col_expr(Column::Lastname, Expr::value(t.lastname))
            .filter(Column::Id.eq(key))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<Option<Teacher>> {
        let Some(key) = to_key(id) else {
            return Ok(None);
        };
        let Some(existing) = TeacherEntity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("delete lookup failed")?
        else {
            return Ok(None);
        };

        let res = TeacherEntity::delete_by_id(key)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok((res.rows_affected > 0).then(|| entity_to_contract(existing)))
    }
}
