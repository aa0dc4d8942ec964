use crate::entities::{actors, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

pub struct ActorRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ActorRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<actors::Model>, DbErr> {
        Actors::find()
            .filter(actors::Column::Name.eq(name))
            .one(self.conn)
            .await
    }

    /// Returns the actor with exactly this name, inserting it first if
    /// needed. The boolean is true when a row was inserted.
    pub async fn find_or_create(&self, name: &str) -> Result<(actors::Model, bool), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Actors::insert(actors::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(actors::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.conn)
        .await?;

        let actor = self
            .find_by_name(name)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("actor '{name}' after upsert")))?;

        Ok((actor, inserted > 0))
    }

    /// Resolves every name, preserving order and dropping repeats.
    pub async fn find_or_create_all(&self, names: &[String]) -> Result<Vec<actors::Model>, DbErr> {
        let mut resolved: Vec<actors::Model> = Vec::with_capacity(names.len());

        for name in names {
            let (actor, _) = self.find_or_create(name).await?;
            if !resolved.iter().any(|a| a.id == actor.id) {
                resolved.push(actor);
            }
        }

        Ok(resolved)
    }
}
