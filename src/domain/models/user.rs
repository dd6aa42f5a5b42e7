use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// One human account. The identity key comes from the external identity
/// provider and never changes; role and profile live here, not in tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub subjects: Vec<String>,
    pub bio: Option<String>,
    pub availability: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub admin_notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub profile_last_updated: Option<DateTime<Utc>>,
    pub profile_updated_by: Option<String>,
}

impl UserRecord {
    pub fn new(
        uid: String,
        email: String,
        display_name: String,
        role: Role,
        created_by: &str,
    ) -> Self {
        Self {
            uid,
            email,
            display_name,
            role,
            is_active: true,
            created_by: created_by.to_string(),
            created_date: Utc::now(),
            location: None,
            phone: None,
            subjects: Vec::new(),
            bio: None,
            availability: None,
            experience: None,
            education: None,
            hourly_rate: None,
            admin_notes: None,
            start_date: None,
            profile_last_updated: None,
            profile_updated_by: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    #[serde(default = "default_new_role")]
    pub role: Role,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_new_role() -> Role {
    Role::Tutor
}

/// Partial profile edit. `None` leaves a field alone; a present empty
/// string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub bio: Option<String>,
    pub availability: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub admin_notes: Option<String>,
    pub start_date: Option<NaiveDate>,
}

impl ProfileUpdate {
    pub fn touches_admin_fields(&self) -> bool {
        self.hourly_rate.is_some() || self.admin_notes.is_some() || self.start_date.is_some()
    }
}
