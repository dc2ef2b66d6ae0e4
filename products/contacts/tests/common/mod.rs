use std::sync::Arc;

use chrono::Utc;
use entity::contact;
use migration::{Migrator, MigratorTrait};
use platform_authz::{AuthzSettings, Principal, roles};
use platform_db::{DatabaseSettings, DbPool, connect};
use products_contacts::{ContactInput, ContactService};
use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait};
use uuid::Uuid;

pub struct TestEnv {
    pub db: Arc<DbPool>,
    pub service: ContactService,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_settings(AuthzSettings::default()).await
    }

    pub async fn with_settings(settings: AuthzSettings) -> Self {
        // One connection: every pooled `sqlite::memory:` connection is its own database.
        let db_settings = DatabaseSettings {
            max_connections: 1,
            ..DatabaseSettings::new("sqlite::memory:")
        };
        let conn = connect(&db_settings).await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        let db = Arc::new(conn);
        let service = ContactService::new(db.clone(), &settings);
        Self { db, service }
    }
}

pub fn admin() -> Principal {
    Principal::new("admin-1").with_role(roles::ADMINISTRATORS)
}

pub fn manager() -> Principal {
    Principal::new("manager-1").with_role(roles::MANAGERS)
}

pub fn user(id: &str) -> Principal {
    Principal::new(id).with_role(roles::USERS)
}

pub fn input(first: &str, last: &str) -> ContactInput {
    ContactInput {
        first_name: first.into(),
        last_name: last.into(),
        address: "1234 Main St".into(),
        city: Some("Redmond".into()),
        state: Some("WA".into()),
        zip: "109990".into(),
        email: format!("{}@example.com", first.to_lowercase()),
    }
}

/// Write a row directly, bypassing the workflow, like an import would.
pub async fn insert_contact(db: &DbPool, owner: &str, status: contact::Status) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now().into();
    let row = contact::ActiveModel {
        id: Set(id),
        owner_id: Set(owner.to_string()),
        first_name: Set("Yuhong".into()),
        last_name: Set(format!("Li-{}", &id.simple().to_string()[..8])),
        address: Set("9012 State st".into()),
        city: Set(None),
        state: Set(None),
        zip: Set("109990".into()),
        email: Set("yuhong@example.com".into()),
        status: Set(status),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };
    contact::Entity::insert(row)
        .exec_without_returning(db)
        .await
        .unwrap();
    id
}

/// Make every `event` (`UPDATE` or `DELETE`) on `contact` silently match
/// nothing, as if another writer had bumped the version first.
pub async fn swallow_writes(db: &DbPool, event: &str) {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER contact_swallow_{event} BEFORE {event} ON contact \
         BEGIN SELECT RAISE(IGNORE); END;"
    ))
    .await
    .unwrap();
}

/// Delete the row inside the write that targets it.
pub async fn vanish_on_update(db: &DbPool) {
    db.execute_unprepared(
        "CREATE TRIGGER contact_vanish BEFORE UPDATE ON contact \
         BEGIN DELETE FROM contact WHERE id = OLD.id; SELECT RAISE(IGNORE); END;",
    )
    .await
    .unwrap();
}
