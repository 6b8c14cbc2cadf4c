//! People and department endpoints of the HR API
//!
//! Each method binds one REST endpoint. Reads go through the offline cache;
//! writes always go to the network.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{Department, Person, PersonInput};
use crate::api::{decode, ApiError, CachedClient, NetworkState, RequestDescriptor};

const PEOPLE_PATH: &str = "People";
const DEPARTMENTS_PATH: &str = "Departments";

/// Named operations against the HR API
#[derive(Debug, Clone)]
pub struct RoiApi {
    client: CachedClient,
}

impl RoiApi {
    pub fn new(client: CachedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CachedClient {
        &self.client
    }

    fn person_url(&self, id: u32) -> String {
        self.client.inner().endpoint(&format!("{}/{}", PEOPLE_PATH, id))
    }

    /// Whether the API is reachable right now
    pub async fn connection_state(&self) -> NetworkState {
        self.client.network_state().await
    }

    /// GET /People
    ///
    /// `Ok(None)` means offline with nothing cached.
    pub async fn get_people(&self) -> Result<Option<Vec<Person>>, ApiError> {
        let state = self.connection_state().await;
        self.get_people_in(state).await
    }

    /// GET /People, deciding between network and cache from `state`
    pub async fn get_people_in(&self, state: NetworkState) -> Result<Option<Vec<Person>>, ApiError> {
        let url = self.client.inner().endpoint(PEOPLE_PATH);
        self.client.get_json_in(&url, state).await
    }

    /// When the people list currently in the cache was fetched
    pub fn people_cached_at(&self) -> Option<DateTime<Utc>> {
        let url = self.client.inner().endpoint(PEOPLE_PATH);
        self.client.cached_at(&RequestDescriptor::get(url))
    }

    /// GET /People/{id}
    pub async fn get_person(&self, id: u32) -> Result<Option<Person>, ApiError> {
        self.client.get_json(&self.person_url(id)).await
    }

    /// GET /Departments
    pub async fn get_departments(&self) -> Result<Option<Vec<Department>>, ApiError> {
        let url = self.client.inner().endpoint(DEPARTMENTS_PATH);
        self.client.get_json(&url).await
    }

    /// POST /People, returning the record the server created
    pub async fn create_person(&self, person: &PersonInput) -> Result<Person, ApiError> {
        let request = RequestDescriptor::post(self.client.inner().endpoint(PEOPLE_PATH))
            .with_data(serde_json::to_value(person)?)
            .returns_data(true);

        let created = self.client.fetch(&request).await?.unwrap_or(Value::Null);
        decode(created)
    }

    /// PUT /People/{id}
    pub async fn update_person(&self, id: u32, person: &PersonInput) -> Result<(), ApiError> {
        let request = RequestDescriptor::put(self.person_url(id))
            .with_data(serde_json::to_value(person)?)
            .with_param("id", id);

        self.client.fetch(&request).await?;
        Ok(())
    }

    /// DELETE /People/{id}
    pub async fn delete_person(&self, id: u32) -> Result<(), ApiError> {
        self.client
            .fetch(&RequestDescriptor::delete(self.person_url(id)))
            .await?;
        Ok(())
    }
}
