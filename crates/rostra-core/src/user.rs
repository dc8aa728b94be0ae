//! User profiles mirrored from the external identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local record of an authenticated user. The UUID is issued by the identity
/// provider; everything else is cached from its token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub user_id:    Uuid,
  /// Unique across profiles.
  pub username:   String,
  pub email:      String,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::DebateStore::ensure_user_profile`].
#[derive(Debug, Clone)]
pub struct NewUserProfile {
  pub user_id:    Uuid,
  /// Preferred username; the store may suffix it to keep usernames unique.
  pub username:   String,
  pub email:      String,
  pub avatar_url: Option<String>,
}
