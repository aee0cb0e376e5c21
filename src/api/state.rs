//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::invitation::{InvitationService, InvitationServiceTrait, TeamPolicyConfig};
use crate::infrastructure::notification::{NotificationService, NotificationServiceTrait};
use crate::infrastructure::project::{ProjectService, ProjectServiceTrait};
use crate::infrastructure::storage::Repositories;
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub project_service: Arc<dyn ProjectServiceTrait>,
    pub invitation_service: Arc<dyn InvitationServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        user_service: Arc<UserService>,
        project_service: Arc<dyn ProjectServiceTrait>,
        invitation_service: Arc<dyn InvitationServiceTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            project_service,
            invitation_service,
            notification_service,
            jwt_service,
        }
    }

    /// Wire every service over one set of repositories
    pub fn from_repositories(
        repos: &Repositories,
        policy: TeamPolicyConfig,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        let notification_service: Arc<dyn NotificationServiceTrait> =
            Arc::new(NotificationService::new(repos.notifications.clone()));

        let project_service = Arc::new(ProjectService::new(
            repos.projects.clone(),
            repos.members.clone(),
            repos.users.clone(),
            notification_service.clone(),
        ));

        let invitation_service = Arc::new(
            InvitationService::new(
                repos.invitations.clone(),
                repos.projects.clone(),
                repos.members.clone(),
                repos.users.clone(),
                notification_service.clone(),
            )
            .with_config(policy),
        );

        Self::new(
            Arc::new(UserService::new(repos.users.clone())),
            project_service,
            invitation_service,
            notification_service,
            jwt_service,
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("user_service", &self.user_service)
            .finish_non_exhaustive()
    }
}
