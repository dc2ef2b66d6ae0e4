use chrono::Utc;
use entity::contact;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use tracing::info;
use uuid::Uuid;

use crate::{Contact, ContactStatus};

const DEMO_CONTACTS: &[(&str, &str, &str, &str, ContactStatus)] = &[
    ("Debra", "Garcia", "1234 Main St", "debra@example.com", ContactStatus::Approved),
    ("Thorsten", "Weinrich", "5678 1st Ave W", "thorsten@example.com", ContactStatus::Submitted),
    ("Yuhong", "Li", "9012 State st", "yuhong@example.com", ContactStatus::Rejected),
    ("Jon", "Orton", "3456 Maple St", "jon@example.com", ContactStatus::Submitted),
    ("Diliana", "Alexieva-Bosseva", "7890 2nd Ave E", "diliana@example.com", ContactStatus::Submitted),
];

/// Insert the demo address book owned by `owner_id`. Does nothing once any
/// contact exists; returns how many rows were written.
pub async fn seed_demo_contacts(db: &DatabaseConnection, owner_id: &str) -> Result<usize, DbErr> {
    if contact::Entity::find().count(db).await? > 0 {
        info!("contacts already present; skipping demo seed");
        return Ok(0);
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = DEMO_CONTACTS
        .iter()
        .map(|(first, last, address, email, status)| {
            Contact {
                id: Uuid::new_v4(),
                owner_id: owner_id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                address: address.to_string(),
                city: Some("Redmond".into()),
                state: Some("WA".into()),
                zip: "10999".into(),
                email: email.to_string(),
                status: *status,
                version: 1,
                created_at: now,
                updated_at: now,
            }
            .to_active_model()
        })
        .collect::<Vec<_>>();
    let inserted = rows.len();
    contact::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    info!(inserted, owner_id, "demo contacts seeded");
    Ok(inserted)
}
