use reqwest::Method;
use serde::Serialize;
use tracing::{error, info, instrument};

use super::{ApiClient, ClientError};
use crate::{
    auth::dto::{MessageResponse, SafeUser, SessionResponse},
    store::{session::SessionAction, Store},
};

#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    credential: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// POST /api/session, then `SetUser`. The session cookie is kept by the
    /// client for later calls.
    #[instrument(skip(self, store, password))]
    pub async fn login(
        &self,
        store: &Store,
        credential: &str,
        password: &str,
    ) -> Result<SafeUser, ClientError> {
        let res: SessionResponse = self
            .send_json(
                self.request(Method::POST, "/api/session")
                    .json(&LoginForm { credential, password }),
            )
            .await
            .inspect_err(|e| error!(error = %e, "login failed"))?;
        let Some(user) = res.user else {
            return Err(ClientError::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: serde_json::Value::Null,
            });
        };
        info!(user_id = %user.id, "logged in");
        store.dispatch(SessionAction::SetUser(user.clone()));
        Ok(user)
    }

    /// GET /api/session, then `SetUser` or `RemoveUser`.
    #[instrument(skip_all)]
    pub async fn restore_user(&self, store: &Store) -> Result<Option<SafeUser>, ClientError> {
        let res: SessionResponse = self
            .send_json(self.request(Method::GET, "/api/session"))
            .await
            .inspect_err(|e| error!(error = %e, "restore_user failed"))?;
        match &res.user {
            Some(user) => store.dispatch(SessionAction::SetUser(user.clone())),
            None => store.dispatch(SessionAction::RemoveUser),
        }
        Ok(res.user)
    }

    /// DELETE /api/session, then `RemoveUser`.
    #[instrument(skip_all)]
    pub async fn logout(&self, store: &Store) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send_json(self.request(Method::DELETE, "/api/session"))
            .await
            .inspect_err(|e| error!(error = %e, "logout failed"))?;
        store.dispatch(SessionAction::RemoveUser);
        Ok(())
    }
}
