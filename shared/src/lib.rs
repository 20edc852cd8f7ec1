use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// Constants
// =========================================================

/// LocalStorage keys of the Credential Record.
/// Presence/absence of these keys is the only durable state across reloads.
pub const STORAGE_TOKEN: &str = "token";
pub const STORAGE_REFRESH_TOKEN: &str = "refreshToken";
pub const STORAGE_DEMO_MODE: &str = "demoMode";
pub const STORAGE_DEMO_USER: &str = "demoUser";

/// The one hardcoded demo credential pair.
pub const DEMO_EMAIL: &str = "demo@school.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Synthetic token the demo session carries after a reload
/// (no real token pair is minted on re-hydration).
pub const DEMO_REHYDRATED_TOKEN: &str = "demo-token";

// =========================================================
// User / Auth Payloads
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Primary role; `roles` may grant more.
    pub role: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl User {
    /// A user matches a role requirement via either the primary `role`
    /// or any entry of `roles`. No implicit admin bypass.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        required
            .iter()
            .any(|r| self.role == *r || self.roles.iter().any(|owned| owned == r))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Response body of `POST /auth/login` and `POST /auth/refresh`.
///
/// A payload with an empty `access_token` is invalid regardless of HTTP
/// status; the session machine enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

///// Generic `{ "message": ... }` body used by auth endpoints and error
/// responses alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =========================================================
// Pagination
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// One page of an entity listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Wrap a full result set as a single fixed page.
    ///
    /// The fixture provider always answers with one page; this is a stub,
    /// not a real pagination contract.
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u32;
        Page {
            items,
            pagination: Pagination {
                page: 1,
                limit: 10,
                total,
                total_pages: 1,
            },
        }
    }
}

// =========================================================
// School Entities
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub section: String,
    pub capacity: u32,
    pub current_enrollment: u32,
    pub teacher: String,
    pub subjects: Vec<String>,
    pub schedule: String,
    pub room: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub capacity: u32,
    pub current_enrollment: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub grade: String,
    pub teacher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub grade: String,
    pub section: String,
    pub roll_number: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub subjects: Vec<String>,
    pub qualification: String,
    pub experience: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    #[serde(rename = "type")]
    pub fee_type: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: &str, roles: &[&str]) -> User {
        User {
            id: "u-1".into(),
            email: "t@school.com".into(),
            first_name: "T".into(),
            last_name: "User".into(),
            full_name: "T User".into(),
            role: role.into(),
            roles: roles.iter().map(|s| s.to_string()).collect(),
            profile_picture: None,
            phone: None,
            address: None,
            date_of_birth: None,
            gender: None,
            created_at: None,
            updated_at: None,
            status: "active".into(),
            permissions: Vec::new(),
        }
    }

    #[test]
    fn role_match_via_primary_role() {
        let u = user_with("teacher", &[]);
        assert!(u.has_any_role(&["teacher"]));
        assert!(!u.has_any_role(&["admin"]));
    }

    #[test]
    fn role_match_via_roles_list_only() {
        // Primary role differs but the list grants admin.
        let u = user_with("teacher", &["admin"]);
        assert!(u.has_any_role(&["admin"]));
    }

    #[test]
    fn empty_requirement_never_matches() {
        let u = user_with("admin", &["admin"]);
        assert!(!u.has_any_role(&[]));
    }

    #[test]
    fn auth_payload_tolerates_missing_fields() {
        let payload: AuthPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.user.is_none());
        assert!(payload.access_token.is_empty());
    }

    #[test]
    fn page_single_reports_fixed_pagination() {
        let page = Page::single(vec![1, 2, 3]);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 1);
    }
}
