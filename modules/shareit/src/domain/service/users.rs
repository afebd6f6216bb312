use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use super::{db_error, non_blank, Service};
use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("valid email regex"));

impl Service {
    #[instrument(name = "shareit.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");
        let user = self.require_user(id).await?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(name = "shareit.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.list().await.map_err(db_error)?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(
        name = "shareit.service.create_user",
        skip(self),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        self.validate_name("name", &new_user.name)?;
        self.validate_email(&new_user.email)?;

        if self
            .users
            .email_exists(&new_user.email)
            .await
            .map_err(db_error)?
        {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let user = self.users.insert(new_user).await.map_err(db_error)?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "shareit.service.update_user", skip(self), fields(user_id = id))]
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        let name = non_blank(patch.name);
        let email = non_blank(patch.email);
        if let Some(ref name) = name {
            self.validate_name("name", name)?;
        }
        if let Some(ref email) = email {
            self.validate_email(email)?;
        }

        let mut current = self.require_user(id).await?;

        if let Some(ref new_email) = email {
            if new_email != &current.email
                && self.users.email_exists(new_email).await.map_err(db_error)?
            {
                return Err(DomainError::email_already_exists(new_email.clone()));
            }
        }

        if let Some(name) = name {
            current.name = name;
        }
        if let Some(email) = email {
            current.email = email;
        }

        self.users.update(current.clone()).await.map_err(db_error)?;

        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "shareit.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        self.require_user(id).await?;
        if self.users.is_referenced(id).await.map_err(db_error)? {
            return Err(DomainError::user_in_use(id));
        }

        let deleted = self.users.delete(id).await.map_err(db_error)?;
        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        if email.len() > self.config.max_name_length || !EMAIL_RE.is_match(email) {
            return Err(DomainError::invalid_email(email.to_string()));
        }
        Ok(())
    }
}
