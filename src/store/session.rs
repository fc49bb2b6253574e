use super::Action;
use crate::auth::dto::SafeUser;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SafeUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetUser(SafeUser),
    RemoveUser,
}

impl SessionAction {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionAction::SetUser(_) => "session/set_user",
            SessionAction::RemoveUser => "session/remove_user",
        }
    }
}

pub fn reduce(state: SessionState, action: &Action) -> SessionState {
    match action {
        Action::Session(SessionAction::SetUser(user)) => SessionState {
            user: Some(user.clone()),
        },
        Action::Session(SessionAction::RemoveUser) => SessionState { user: None },
        _ => state,
    }
}
