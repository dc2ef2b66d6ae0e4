use std::sync::Arc;

use chrono::Utc;
use entity::contact;
use platform_authz::{AuthorizationEngine, AuthzSettings, Decision, Operation, Principal, RoleNames};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    Contact, ContactError, ContactInput, ContactResult, ContactStatus, can_view,
    validation::validate_owner, visibility_condition,
};

/// Edit payload. Status is deliberately absent: only `change_status` moves a
/// contact through its lifecycle.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateContact {
    pub input: ContactInput,
    pub owner_id: Option<String>,
    pub expected_version: i32,
}

#[derive(Clone)]
pub struct ContactService {
    db: Arc<DatabaseConnection>,
    engine: AuthorizationEngine<Contact>,
    roles: RoleNames,
}

impl ContactService {
    pub fn new(db: Arc<DatabaseConnection>, settings: &AuthzSettings) -> Self {
        Self::with_engine(
            db,
            AuthorizationEngine::from_settings(settings),
            settings.roles.clone(),
        )
    }

    pub fn with_engine(
        db: Arc<DatabaseConnection>,
        engine: AuthorizationEngine<Contact>,
        roles: RoleNames,
    ) -> Self {
        Self { db, engine, roles }
    }

    #[instrument(skip_all, fields(principal = principal_id(principal)))]
    pub async fn index(&self, principal: Option<&Principal>) -> ContactResult<Vec<Contact>> {
        let rows = contact::Entity::find()
            .filter(visibility_condition(principal, &self.roles))
            .order_by_asc(contact::Column::LastName)
            .order_by_asc(contact::Column::FirstName)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    #[instrument(skip_all, fields(principal = principal_id(principal), %id))]
    pub async fn details(&self, principal: Option<&Principal>, id: Uuid) -> ContactResult<Contact> {
        let contact = self.load(id).await?;
        if !can_view(principal, &contact, &self.roles) {
            return Err(forbidden(principal, Operation::Read));
        }
        Ok(contact)
    }

    /// Raw engine decision, with or without a stored contact to check against.
    pub async fn evaluate(
        &self,
        principal: Option<&Principal>,
        id: Option<Uuid>,
        operation: Operation,
    ) -> ContactResult<Decision> {
        let contact = match id {
            Some(id) => Some(self.load(id).await?),
            None => None,
        };
        Ok(self.engine.authorize(principal, contact.as_ref(), operation))
    }

    #[instrument(skip_all, fields(principal = principal_id(principal)))]
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: ContactInput,
    ) -> ContactResult<Contact> {
        let input = input.validate()?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let draft = Contact {
            id: Uuid::new_v4(),
            owner_id: principal.map(|p| p.id().to_string()).unwrap_or_default(),
            first_name: input.first_name,
            last_name: input.last_name,
            address: input.address,
            city: input.city,
            state: input.state,
            zip: input.zip,
            email: input.email,
            status: ContactStatus::Submitted,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.authorize(principal, &draft, Operation::Create)?;

        contact::Entity::insert(draft.to_active_model())
            .exec_without_returning(self.db.as_ref())
            .await?;
        info!(contact_id = %draft.id, "contact created");
        self.load(draft.id).await
    }

    /// Gate for showing the edit form.
    pub async fn prepare_edit(&self, principal: Option<&Principal>, id: Uuid) -> ContactResult<Contact> {
        let contact = self.load(id).await?;
        self.authorize(principal, &contact, Operation::Update)?;
        Ok(contact)
    }

    #[instrument(skip_all, fields(principal = principal_id(principal), %id))]
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        update: UpdateContact,
    ) -> ContactResult<Contact> {
        let input = update.input.validate()?;
        let owner_id = update.owner_id.as_deref().map(validate_owner).transpose()?;
        let existing = self.load(id).await?;
        self.authorize(principal, &existing, Operation::Update)?;
        if existing.version != update.expected_version {
            return Err(ContactError::Conflict);
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = contact::Entity::update_many()
            .col_expr(contact::Column::FirstName, Expr::value(input.first_name))
            .col_expr(contact::Column::LastName, Expr::value(input.last_name))
            .col_expr(contact::Column::Address, Expr::value(input.address))
            .col_expr(contact::Column::City, Expr::value(input.city))
            .col_expr(contact::Column::State, Expr::value(input.state))
            .col_expr(contact::Column::Zip, Expr::value(input.zip))
            .col_expr(contact::Column::Email, Expr::value(input.email))
            .col_expr(
                contact::Column::OwnerId,
                Expr::value(owner_id.unwrap_or(existing.owner_id)),
            )
            .col_expr(contact::Column::UpdatedAt, Expr::value(now))
            .col_expr(contact::Column::Version, Expr::col(contact::Column::Version).add(1))
            .filter(contact::Column::Id.eq(id))
            .filter(contact::Column::Version.eq(existing.version))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(self.lost_write(id).await);
        }
        info!("contact updated");
        self.load(id).await
    }

    /// Gate for showing the delete confirmation.
    pub async fn prepare_delete(&self, principal: Option<&Principal>, id: Uuid) -> ContactResult<Contact> {
        let contact = self.load(id).await?;
        self.authorize(principal, &contact, Operation::Delete)?;
        Ok(contact)
    }

    #[instrument(skip_all, fields(principal = principal_id(principal), %id))]
    pub async fn delete(&self, principal: Option<&Principal>, id: Uuid) -> ContactResult<()> {
        let existing = self.load(id).await?;
        self.authorize(principal, &existing, Operation::Delete)?;

        let result = contact::Entity::delete_many()
            .filter(contact::Column::Id.eq(id))
            .filter(contact::Column::Version.eq(existing.version))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(self.lost_write(id).await);
        }
        info!("contact deleted");
        Ok(())
    }

    /// The only path that moves a contact between lifecycle states.
    #[instrument(skip_all, fields(principal = principal_id(principal), %id, %status))]
    pub async fn change_status(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        status: ContactStatus,
    ) -> ContactResult<Contact> {
        let operation = if status == ContactStatus::Approved {
            Operation::Approve
        } else {
            Operation::Reject
        };
        let existing = self.load(id).await?;
        self.authorize(principal, &existing, operation)?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = contact::Entity::update_many()
            .col_expr(contact::Column::Status, Expr::value(contact::Status::from(status)))
            .col_expr(contact::Column::UpdatedAt, Expr::value(now))
            .col_expr(contact::Column::Version, Expr::col(contact::Column::Version).add(1))
            .filter(contact::Column::Id.eq(id))
            .filter(contact::Column::Version.eq(existing.version))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(self.lost_write(id).await);
        }
        info!(from = %existing.status, "contact status changed");
        self.load(id).await
    }

    async fn load(&self, id: Uuid) -> ContactResult<Contact> {
        contact::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Contact::from)
            .ok_or(ContactError::NotFound)
    }

    fn authorize(
        &self,
        principal: Option<&Principal>,
        contact: &Contact,
        operation: Operation,
    ) -> ContactResult<()> {
        if self
            .engine
            .authorize(principal, Some(contact), operation)
            .succeeded()
        {
            Ok(())
        } else {
            Err(forbidden(principal, operation))
        }
    }

    /// A guarded write matched nothing: either the row is gone or someone
    /// else bumped its version in between.
    async fn lost_write(&self, id: Uuid) -> ContactError {
        match contact::Entity::find_by_id(id).one(self.db.as_ref()).await {
            Ok(Some(_)) => {
                info!(%id, "concurrent modification detected");
                ContactError::Conflict
            }
            Ok(None) => ContactError::NotFound,
            Err(err) => ContactError::Database(err),
        }
    }
}

fn principal_id(principal: Option<&Principal>) -> &str {
    principal.map(Principal::id).unwrap_or("<anonymous>")
}

fn forbidden(principal: Option<&Principal>, operation: Operation) -> ContactError {
    info!(principal = principal_id(principal), %operation, "access forbidden");
    ContactError::Forbidden { operation }
}
