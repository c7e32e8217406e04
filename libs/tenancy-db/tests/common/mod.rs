#![allow(dead_code)]

use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    Schema, Set,
};
use tenancy_db::{insert_scoped, TenantRef};
use uuid::Uuid;

pub mod tenant {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tenants")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod category {
    use sea_orm::entity::prelude::*;
    use tenancy_db::{TenantAssociation, TenantScoped};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub label: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tenant::Entity",
            from = "Column::TenantId",
            to = "super::tenant::Column::Id"
        )]
        Tenant,
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl TenantScoped for Entity {
        fn tenant_association() -> TenantAssociation<Column> {
            TenantAssociation::direct(Column::TenantId)
        }
    }
}

pub mod project {
    use sea_orm::entity::prelude::*;
    use tenancy_db::{TenantAssociation, TenantScoped};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "projects")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub category_id: Option<Uuid>,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tenant::Entity",
            from = "Column::TenantId",
            to = "super::tenant::Column::Id"
        )]
        Tenant,
        #[sea_orm(
            belongs_to = "super::category::Entity",
            from = "Column::CategoryId",
            to = "super::category::Column::Id"
        )]
        Category,
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl TenantScoped for Entity {
        fn tenant_association() -> TenantAssociation<Column> {
            TenantAssociation::direct(Column::TenantId)
        }
    }
}

pub mod task {
    use sea_orm::entity::prelude::*;
    use tenancy_db::{TenantAssociation, TenantScoped};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub project_id: Uuid,
        pub title: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::project::Entity",
            from = "Column::ProjectId",
            to = "super::project::Column::Id"
        )]
        Project,
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl TenantScoped for Entity {
        fn tenant_association() -> TenantAssociation<Column> {
            TenantAssociation::through(
                vec![
                    Relation::Project.def(),
                    super::project::Relation::Tenant.def(),
                ],
                super::tenant::Entity,
                super::tenant::Column::Id,
            )
        }
    }
}

/// In-memory sqlite with a single connection so every statement sees the
/// same database.
pub async fn setup() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts).await.expect("connect to sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let backend = conn.get_database_backend();
    for stmt in [
        schema.create_table_from_entity(tenant::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(project::Entity),
        schema.create_table_from_entity(task::Entity),
    ] {
        conn.execute(backend.build(&stmt))
            .await
            .expect("create table");
    }
    conn
}

pub async fn seed_tenant(conn: &DatabaseConnection, name: &str) -> TenantRef {
    let id = Uuid::new_v4();
    tenant::ActiveModel {
        id: Set(id),
        name: Set(name.to_owned()),
    }
    .insert(conn)
    .await
    .expect("insert tenant");
    TenantRef::new(id)
}

/// Creates a project under the ambient tenant (the FK is stamped by
/// `insert_scoped`).
pub async fn create_project(conn: &DatabaseConnection, name: &str) -> project::Model {
    insert_scoped::<project::Entity, _>(
        project::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_owned()),
            ..Default::default()
        },
        conn,
    )
    .await
    .expect("insert project")
}

pub async fn create_task(
    conn: &DatabaseConnection,
    project_id: Uuid,
    title: &str,
) -> task::Model {
    task::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        title: Set(title.to_owned()),
    }
    .insert(conn)
    .await
    .expect("insert task")
}

pub async fn create_category(conn: &DatabaseConnection, label: &str) -> category::Model {
    insert_scoped::<category::Entity, _>(
        category::ActiveModel {
            id: Set(Uuid::new_v4()),
            label: Set(label.to_owned()),
            ..Default::default()
        },
        conn,
    )
    .await
    .expect("insert category")
}
