use std::rc::Rc;

use yew::Reducible;

use crate::api::models::AuthUser;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Only staff accounts get the in-page edit toggle.
    pub fn is_staff(&self) -> bool {
        self.user.as_ref().map_or(false, |u| u.is_staff)
    }
}

pub enum AuthAction {
    LoggedIn { token: String, user: AuthUser },
    LoggedOut,
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            AuthAction::LoggedIn { token, user } => Rc::new(AuthState {
                token: Some(token),
                user: Some(user),
            }),
            AuthAction::LoggedOut => Rc::new(AuthState::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> AuthUser {
        AuthUser {
            id: 1,
            email: "admin@example.com".into(),
            full_name: "Admin".into(),
            is_staff: true,
        }
    }

    #[test]
    fn login_and_logout() {
        let state = Rc::new(AuthState::default());
        assert!(!state.is_logged_in());

        let state = state.reduce(AuthAction::LoggedIn { token: "abc".into(), user: staff() });
        assert!(state.is_logged_in());
        assert!(state.is_staff());

        let state = state.reduce(AuthAction::LoggedOut);
        assert_eq!(*state, AuthState::default());
        assert!(!state.is_staff());
    }
}
