//! Typed CRUD clients for the managed entities.
//!
//! Every entity is served under the same REST pattern, so one generic
//! [`EntityClient`] covers all of them; the [`Resource`] impl supplies the
//! collection path and how to read an entity's id.

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{Group, Payment, Professor, Student, Subject, User};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// An entity served under its own REST collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path segment relative to the API base URL.
    const PATH: &'static str;

    /// Server-assigned id, absent until created.
    fn id(&self) -> Option<i64>;
}

impl Resource for Student {
    const PATH: &'static str = "students";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Resource for Professor {
    const PATH: &'static str = "professors";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

// The backend has no `/groups` resource; groups live under `/student-groups`.
impl Resource for Group {
    const PATH: &'static str = "student-groups";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Resource for Subject {
    const PATH: &'static str = "subjects";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Resource for Payment {
    const PATH: &'static str = "payments";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Administrators are plain user accounts.
impl Resource for User {
    const PATH: &'static str = "admins";
    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub type StudentClient = EntityClient<Student>;
pub type ProfessorClient = EntityClient<Professor>;
pub type GroupClient = EntityClient<Group>;
pub type SubjectClient = EntityClient<Subject>;
pub type PaymentClient = EntityClient<Payment>;
pub type AdminClient = EntityClient<User>;

/// CRUD client for one entity collection.
pub struct EntityClient<T> {
    api: ApiClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for EntityClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClient")
            .field("api", &self.api)
            .finish()
    }
}

impl<T: Resource> EntityClient<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    /// `POST /{path}`.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn create(&self, entity: &T) -> Result<T, ApiError> {
        debug!(target: "campus.api", resource = T::PATH, "Creating entity");
        self.api.send_body(Method::POST, &[T::PATH], entity).await
    }

    /// `GET /{path}/{id}`.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn find(&self, id: i64) -> Result<T, ApiError> {
        self.api.get_json(&[T::PATH, &id.to_string()], &[]).await
    }

    /// `GET /{path}`.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn find_all(&self) -> Result<Vec<T>, ApiError> {
        self.api.get_json(&[T::PATH], &[]).await
    }

    /// `GET /{path}` with arbitrary query parameters (filters, paging).
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn query(&self, params: &[(&str, String)]) -> Result<Vec<T>, ApiError> {
        self.api.get_json(&[T::PATH], params).await
    }

    /// `GET /{path}?page=&size=[&sort=]`.
    pub async fn find_all_paginated(
        &self,
        page: u32,
        size: u32,
        sort: Option<&str>,
    ) -> Result<Vec<T>, ApiError> {
        let mut params = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(sort) = sort {
            params.push(("sort", sort.to_string()));
        }
        self.query(&params).await
    }

    /// `PUT /{path}/{id}` with the full entity.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn update(&self, entity: &T) -> Result<T, ApiError> {
        let id = entity.id().ok_or(ApiError::MissingId)?;
        self.api
            .send_body(Method::PUT, &[T::PATH, &id.to_string()], entity)
            .await
    }

    /// `PATCH /{path}/{id}` carrying only the fields set on `entity`.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn partial_update(&self, entity: &T) -> Result<T, ApiError> {
        let id = entity.id().ok_or(ApiError::MissingId)?;
        self.api
            .send_body(Method::PATCH, &[T::PATH, &id.to_string()], entity)
            .await
    }

    /// `DELETE /{path}/{id}`.
    #[instrument(skip_all, fields(resource = T::PATH))]
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        debug!(target: "campus.api", resource = T::PATH, id, "Deleting entity");
        self.api.delete(&[T::PATH, &id.to_string()]).await
    }

    /// `GET /{path}/count`.
    pub async fn count(&self) -> Result<i64, ApiError> {
        self.api.get_json(&[T::PATH, "count"], &[]).await
    }
}

impl EntityClient<User> {
    /// `GET /admins/{login}`.
    pub async fn find_by_login(&self, login: &str) -> Result<User, ApiError> {
        self.api.get_json(&[User::PATH, login], &[]).await
    }
}
