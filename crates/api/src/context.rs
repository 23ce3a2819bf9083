use folio_content::User;
use folio_core::UserId;

/// The authenticated user for a request.
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone)]
pub struct AuthContext {
    user: User,
}

impl AuthContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }
}
