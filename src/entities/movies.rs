use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// Trimmed, lowercased title. Deduplication key for create and import.
    #[sea_orm(unique)]
    pub normalized_title: String,

    pub year: i32,

    /// One of `VHS`, `DVD`, `Blu-ray`.
    pub format: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
}

impl Related<super::movie_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actors::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actors::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
