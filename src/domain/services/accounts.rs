use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::role::{Permission, Role};
use crate::domain::models::session::ResolvedSession;
use crate::domain::models::user::{NewAccount, ProfileUpdate, UserRecord};
use crate::domain::ports::{ActivityStore, UserStore};
use crate::domain::services::{normalized, require, required_text};
use crate::error::AppError;

/// Account lifecycle operations. Every mutation re-checks the acting
/// principal's grants here, so handing out a store reference elsewhere
/// cannot bypass the gate.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, activity: Arc<dyn ActivityStore>) -> Self {
        Self { users, activity }
    }

    #[instrument(skip(self, acting, data), fields(acting_uid = %acting.user.uid))]
    pub async fn create_account(
        &self,
        acting: &ResolvedSession,
        data: NewAccount,
    ) -> Result<UserRecord, AppError> {
        require(acting, Permission::CreateTutors)?;
        if data.role.is_super_admin() && !acting.role.is_super_admin() {
            return Err(AppError::PermissionDenied(
                "only a super admin may create a super admin account".to_string(),
            ));
        }

        let uid = required_text(data.uid, "uid")?;
        let email = required_text(data.email, "email")?;
        let display_name = required_text(data.display_name, "display_name")?;

        if self.users.get(&uid).await?.is_some() {
            return Err(AppError::Conflict(
                "An account already exists for this identity".to_string(),
            ));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account already exists for this email".to_string(),
            ));
        }

        if let Some(rate) = data.hourly_rate {
            if rate < 0.0 {
                return Err(AppError::Validation("hourly_rate cannot be negative".to_string()));
            }
        }

        let mut record = UserRecord::new(uid, email, display_name, data.role, &acting.user.uid);
        record.location = data.location.and_then(normalized);
        record.phone = data.phone.and_then(normalized);
        record.subjects = data.subjects.into_iter().filter_map(normalized).collect();
        record.hourly_rate = data.hourly_rate;
        record.start_date = data.start_date;

        let created = self.users.insert(&record).await?;
        info!(uid = %created.uid, role = %created.role, "account created");
        self.log(&acting.user.uid, "account.created", &created.uid, Some(created.role.as_str().to_string()))
            .await;
        Ok(created)
    }

    /// Bootstrap path: provisions the very first account as a super admin
    /// without a permission check, because nobody exists yet to hold one.
    /// Only legal while the store is empty.
    #[instrument(skip(self))]
    pub async fn create_initial_admin(
        &self,
        uid: &str,
        email: &str,
        display_name: &str,
    ) -> Result<UserRecord, AppError> {
        if !self.users.is_empty().await? {
            return Err(AppError::Conflict(
                "Initial admin setup has already been completed".to_string(),
            ));
        }

        let uid = required_text(uid.to_string(), "uid")?;
        let email = required_text(email.to_string(), "email")?;
        let display_name = required_text(display_name.to_string(), "display_name")?;

        let record = UserRecord::new(uid.clone(), email, display_name, Role::SuperAdmin, &uid);
        let created = self.users.insert(&record).await?;
        info!(uid = %created.uid, "initial super admin created");
        self.log(&created.uid, "account.created", &created.uid, Some("bootstrap".to_string()))
            .await;
        Ok(created)
    }

    /// Merge-style profile edit. Owners may edit their own non-admin
    /// fields; admin-managed fields and other people's records need
    /// admin-level grants. Stamps the profile metadata on every call.
    #[instrument(skip(self, acting, update), fields(acting_uid = %acting.user.uid))]
    pub async fn update_profile(
        &self,
        acting: &ResolvedSession,
        target_uid: &str,
        update: ProfileUpdate,
    ) -> Result<UserRecord, AppError> {
        let editing_self = acting.user.uid == target_uid;
        if !editing_self && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only admins may edit another account's profile".to_string(),
            ));
        }
        if update.touches_admin_fields() && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "hourly rate, admin notes and start date are admin-managed".to_string(),
            ));
        }

        let mut record = self
            .users
            .get(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        apply_profile_update(&mut record, update)?;
        record.profile_last_updated = Some(Utc::now());
        record.profile_updated_by = Some(acting.user.uid.clone());

        let saved = self.users.save(&record).await?;
        self.log(&acting.user.uid, "account.profile_updated", target_uid, None)
            .await;
        Ok(saved)
    }

    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn change_role(
        &self,
        acting: &ResolvedSession,
        target_uid: &str,
        new_role: Role,
    ) -> Result<UserRecord, AppError> {
        if !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only admins may change roles".to_string(),
            ));
        }
        if new_role.is_super_admin() && !acting.role.is_super_admin() {
            return Err(AppError::PermissionDenied(
                "only a super admin may promote to super admin".to_string(),
            ));
        }

        let mut record = self
            .users
            .get(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        if record.role == new_role {
            return Ok(record);
        }

        let previous = record.role;
        record.role = new_role;
        let saved = self.users.save(&record).await?;
        info!(target_uid, from = %previous, to = %new_role, "role changed");
        self.log(
            &acting.user.uid,
            "account.role_changed",
            target_uid,
            Some(format!("{} -> {}", previous, new_role)),
        )
        .await;
        Ok(saved)
    }

    /// Soft delete. Archiving an already-archived account is a no-op
    /// success with no write and no metadata stamp.
    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn archive_account(
        &self,
        acting: &ResolvedSession,
        target_uid: &str,
    ) -> Result<UserRecord, AppError> {
        require(acting, Permission::ArchiveTutors)?;
        if acting.user.uid == target_uid {
            return Err(AppError::Conflict(
                "Cannot archive your own account".to_string(),
            ));
        }

        let mut record = self
            .users
            .get(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        if !record.is_active {
            return Ok(record);
        }

        record.is_active = false;
        let saved = self.users.save(&record).await?;
        info!(target_uid, "account archived");
        self.log(&acting.user.uid, "account.archived", target_uid, None)
            .await;
        Ok(saved)
    }

    /// Symmetric to archive and just as idempotent.
    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn reactivate_account(
        &self,
        acting: &ResolvedSession,
        target_uid: &str,
    ) -> Result<UserRecord, AppError> {
        require(acting, Permission::ArchiveTutors)?;

        let mut record = self
            .users
            .get(target_uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        if record.is_active {
            return Ok(record);
        }

        record.is_active = true;
        let saved = self.users.save(&record).await?;
        info!(target_uid, "account reactivated");
        self.log(&acting.user.uid, "account.reactivated", target_uid, None)
            .await;
        Ok(saved)
    }

    pub async fn list_accounts(
        &self,
        acting: &ResolvedSession,
        include_archived: bool,
    ) -> Result<Vec<UserRecord>, AppError> {
        if !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only admins may list accounts".to_string(),
            ));
        }
        self.users.list(include_archived).await
    }

    pub async fn get_account(
        &self,
        acting: &ResolvedSession,
        uid: &str,
    ) -> Result<UserRecord, AppError> {
        if acting.user.uid != uid && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only admins may view another account".to_string(),
            ));
        }
        self.users
            .get(uid)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    async fn log(&self, actor: &str, action: &str, target: &str, detail: Option<String>) {
        let mut entry = ActivityEntry::new(actor, action, target);
        if let Some(detail) = detail {
            entry = entry.with_detail(detail);
        }
        if let Err(err) = self.activity.append(&entry).await {
            warn!(action, error = %err, "failed to record activity entry");
        }
    }
}

fn apply_profile_update(record: &mut UserRecord, update: ProfileUpdate) -> Result<(), AppError> {
    if let Some(name) = update.display_name {
        record.display_name = required_text(name, "display_name")?;
    }
    if let Some(value) = update.location {
        record.location = normalized(value);
    }
    if let Some(value) = update.phone {
        record.phone = normalized(value);
    }
    if let Some(list) = update.subjects {
        record.subjects = list.into_iter().filter_map(normalized).collect();
    }
    if let Some(value) = update.bio {
        record.bio = normalized(value);
    }
    if let Some(value) = update.availability {
        record.availability = normalized(value);
    }
    if let Some(value) = update.experience {
        record.experience = normalized(value);
    }
    if let Some(value) = update.education {
        record.education = normalized(value);
    }
    if let Some(rate) = update.hourly_rate {
        if rate < 0.0 {
            return Err(AppError::Validation("hourly_rate cannot be negative".to_string()));
        }
        record.hourly_rate = Some(rate);
    }
    if let Some(value) = update.admin_notes {
        record.admin_notes = normalized(value);
    }
    if let Some(date) = update.start_date {
        record.start_date = Some(date);
    }
    Ok(())
}
