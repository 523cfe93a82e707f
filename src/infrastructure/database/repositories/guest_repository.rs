//! SeaORM implementation of GuestRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::guest::{Guest, GuestProfile, GuestRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::guest;

pub struct SeaOrmGuestRepository {
    db: DatabaseConnection,
}

impl SeaOrmGuestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> DomainResult<Option<guest::Model>> {
        guest::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: guest::Model) -> Guest {
    Guest {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        phone: m.phone,
        passport_number: m.passport_number,
        date_of_birth: m.date_of_birth,
        address: m.address,
        created_at: m.created_at,
        is_active: m.is_active,
    }
}

fn apply_profile(active: &mut guest::ActiveModel, p: GuestProfile) {
    active.first_name = Set(p.first_name);
    active.last_name = Set(p.last_name);
    active.email = Set(p.email);
    active.phone = Set(p.phone);
    active.passport_number = Set(p.passport_number);
    active.date_of_birth = Set(p.date_of_birth);
    active.address = Set(p.address);
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── GuestRepository impl ────────────────────────────────────────

#[async_trait]
impl GuestRepository for SeaOrmGuestRepository {
    async fn find_active(&self) -> DomainResult<Vec<Guest>> {
        let models = guest::Entity::find()
            .filter(guest::Column::IsActive.eq(true))
            .order_by_asc(guest::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active_by_id(&self, id: i32) -> DomainResult<Option<Guest>> {
        Ok(self
            .find_model(id)
            .await?
            .filter(|m| m.is_active)
            .map(model_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Guest>> {
        Ok(self.find_model(id).await?.map(model_to_domain))
    }

    async fn insert(&self, profile: GuestProfile) -> DomainResult<Guest> {
        debug!("Inserting guest: {} {}", profile.first_name, profile.last_name);

        let mut model = guest::ActiveModel {
            id: NotSet,
            created_at: Set(Utc::now()),
            is_active: Set(true),
            ..Default::default()
        };
        apply_profile(&mut model, profile);
        let model = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, id: i32, profile: GuestProfile) -> DomainResult<Option<Guest>> {
        debug!("Updating guest: {}", id);

        let Some(existing) = self.find_model(id).await?.filter(|m| m.is_active) else {
            return Ok(None);
        };
        let mut active: guest::ActiveModel = existing.into();
        apply_profile(&mut active, profile);
        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(model)))
    }

    async fn deactivate(&self, id: i32) -> DomainResult<Option<Guest>> {
        debug!("Deactivating guest: {}", id);

        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };
        let mut active: guest::ActiveModel = existing.into();
        active.is_active = Set(false);
        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(model_to_domain(model)))
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Guest>> {
        let mut query = guest::Entity::find().filter(guest::Column::IsActive.eq(true));

        // LIKE folds ASCII case only, so it narrows the rows for plain
        // ASCII terms and `Guest::matches` has the final word.
        if term.is_ascii() && !term.contains(['%', '_', '\\']) {
            query = query.filter(
                Condition::any()
                    .add(guest::Column::FirstName.contains(term))
                    .add(guest::Column::LastName.contains(term))
                    .add(guest::Column::Email.contains(term))
                    .add(guest::Column::Phone.contains(term))
                    .add(guest::Column::PassportNumber.contains(term)),
            );
        }

        let models = query
            .order_by_asc(guest::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models
            .into_iter()
            .map(model_to_domain)
            .filter(|g| g.matches(term))
            .collect())
    }
}
