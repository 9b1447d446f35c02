//! Admin management and session commands

use crate::app::AppState;
use crate::database::{Admin, AdminRole};
use crate::error::Result;
use crate::routes::Route;
use crate::storage::KeyValueStore;

pub async fn login<S: KeyValueStore>(
    state: &AppState<S>,
    email: &str,
    password: &str,
) -> Result<Admin> {
    state.auth_service.login(email, password).await
}

pub async fn logout<S: KeyValueStore>(state: &AppState<S>) -> Result<()> {
    state.auth_service.logout().await
}

/// The admin of the saved session, if any
pub async fn whoami<S: KeyValueStore>(state: &AppState<S>) -> Result<Option<Admin>> {
    state.auth_service.restore_session().await
}

/// Which page `path` shows for the current session
pub async fn resolve_route<S: KeyValueStore>(state: &AppState<S>, path: &str) -> Result<Route> {
    let logged_in = state.auth_service.restore_session().await?.is_some();
    Ok(Route::resolve(path, logged_in))
}

pub async fn list_admins<S: KeyValueStore>(state: &AppState<S>) -> Result<Vec<Admin>> {
    state.dashboard().await?.list_admins().await
}

pub async fn add_admin<S: KeyValueStore>(
    state: &AppState<S>,
    email: &str,
    role: AdminRole,
) -> Result<Admin> {
    state.dashboard().await?.add_admin(email, role).await
}

pub async fn update_admin<S: KeyValueStore>(
    state: &AppState<S>,
    id: &str,
    email: &str,
    role: AdminRole,
) -> Result<Admin> {
    state.dashboard().await?.update_admin(id, email, role).await
}

pub async fn remove_admin<S: KeyValueStore>(state: &AppState<S>, id: &str) -> Result<()> {
    state.dashboard().await?.remove_admin(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::AppSettings;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_routes_follow_session() {
        let temp = TempDir::new().unwrap();
        let state = AppState::new(
            temp.path().to_path_buf(),
            AppSettings::default(),
            MemoryStore::new(),
            None,
        );

        assert_eq!(resolve_route(&state, "/admin").await.unwrap(), Route::AdminLogin);

        login(&state, "admin@church.com", "longenough").await.unwrap();
        assert_eq!(
            resolve_route(&state, "/admin/login").await.unwrap(),
            Route::AdminDashboard
        );

        let viewer = add_admin(&state, "viewer@church.com", AdminRole::Viewer)
            .await
            .unwrap();
        logout(&state).await.unwrap();
        assert!(whoami(&state).await.unwrap().is_none());

        login(&state, "viewer@church.com", "longenough").await.unwrap();
        assert_eq!(list_admins(&state).await.unwrap().len(), 2);
        assert!(matches!(
            remove_admin(&state, &viewer.id).await,
            Err(AppError::PermissionDenied(_))
        ));
    }
}
