use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // The composite primary key covers lookups by movie; actor-side
        // filters need their own index.
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_movie_actors_actor ON movie_actors(actor_id)",
        )
        .await?;

        conn.execute_unprepared("CREATE INDEX IF NOT EXISTS idx_movies_year ON movies(year)")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_movie_actors_actor")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_movies_year")
            .await?;

        Ok(())
    }
}
