use crate::domain::{models::user::UserRecord, ports::UserStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

const COLUMNS: &str = "uid, email, display_name, role, is_active, created_by, created_date, \
     location, phone, subjects_json, bio, availability, experience, education, \
     hourly_rate, admin_notes, start_date, profile_last_updated, profile_updated_by";

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Raw row shape. Role and subjects stay textual here; conversion to the
/// domain record is where a bad role value becomes `InvalidRole`.
#[derive(sqlx::FromRow)]
struct UserRow {
    uid: String,
    email: String,
    display_name: String,
    role: String,
    is_active: bool,
    created_by: String,
    created_date: DateTime<Utc>,
    location: Option<String>,
    phone: Option<String>,
    subjects_json: String,
    bio: Option<String>,
    availability: Option<String>,
    experience: Option<String>,
    education: Option<String>,
    hourly_rate: Option<f64>,
    admin_notes: Option<String>,
    start_date: Option<NaiveDate>,
    profile_last_updated: Option<DateTime<Utc>>,
    profile_updated_by: Option<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, AppError> {
        let role = row.role.parse()?;
        let subjects = serde_json::from_str(&row.subjects_json).map_err(|e| {
            AppError::InternalWithMsg(format!("corrupt subjects column for {}: {}", row.uid, e))
        })?;
        Ok(UserRecord {
            uid: row.uid,
            email: row.email,
            display_name: row.display_name,
            role,
            is_active: row.is_active,
            created_by: row.created_by,
            created_date: row.created_date,
            location: row.location,
            phone: row.phone,
            subjects,
            bio: row.bio,
            availability: row.availability,
            experience: row.experience,
            education: row.education,
            hourly_rate: row.hourly_rate,
            admin_notes: row.admin_notes,
            start_date: row.start_date,
            profile_last_updated: row.profile_last_updated,
            profile_updated_by: row.profile_updated_by,
        })
    }
}

fn subjects_json(record: &UserRecord) -> Result<String, AppError> {
    serde_json::to_string(&record.subjects)
        .map_err(|e| AppError::InternalWithMsg(format!("failed to encode subjects: {}", e)))
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, record: &UserRecord) -> Result<UserRecord, AppError> {
        let subjects = subjects_json(record)?;
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&record.uid)
        .bind(&record.email)
        .bind(&record.display_name)
        .bind(record.role.as_str())
        .bind(record.is_active)
        .bind(&record.created_by)
        .bind(record.created_date)
        .bind(&record.location)
        .bind(&record.phone)
        .bind(&subjects)
        .bind(&record.bio)
        .bind(&record.availability)
        .bind(&record.experience)
        .bind(&record.education)
        .bind(record.hourly_rate)
        .bind(&record.admin_notes)
        .bind(record.start_date)
        .bind(record.profile_last_updated)
        .bind(&record.profile_updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.try_into()
    }

    async fn get(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users WHERE uid = ?"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn save(&self, record: &UserRecord) -> Result<UserRecord, AppError> {
        let subjects = subjects_json(record)?;
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET email = ?, display_name = ?, role = ?, is_active = ?, \
             location = ?, phone = ?, subjects_json = ?, bio = ?, availability = ?, \
             experience = ?, education = ?, hourly_rate = ?, admin_notes = ?, start_date = ?, \
             profile_last_updated = ?, profile_updated_by = ? WHERE uid = ? RETURNING {COLUMNS}"
        ))
        .bind(&record.email)
        .bind(&record.display_name)
        .bind(record.role.as_str())
        .bind(record.is_active)
        .bind(&record.location)
        .bind(&record.phone)
        .bind(&subjects)
        .bind(&record.bio)
        .bind(&record.availability)
        .bind(&record.experience)
        .bind(&record.education)
        .bind(record.hourly_rate)
        .bind(&record.admin_notes)
        .bind(record.start_date)
        .bind(record.profile_last_updated)
        .bind(&record.profile_updated_by)
        .bind(&record.uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::NotFound("Account not found".to_string())),
        }
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<UserRecord>, AppError> {
        let sql = if include_archived {
            format!("SELECT {COLUMNS} FROM users ORDER BY display_name ASC")
        } else {
            format!("SELECT {COLUMNS} FROM users WHERE is_active = 1 ORDER BY display_name ASC")
        };
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(UserRecord::try_from).collect()
    }

    async fn is_empty(&self) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count == 0)
    }
}
