mod model;
pub use model::*;

use crate::lifecycle::PostStore;
use anyhow::{bail, Context, Result};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{header, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub static CLIENT_TOKEN: Lazy<ArcSwap<Option<String>>> = Lazy::new(|| ArcSwap::from_pointee(None));

static CLIENT: Lazy<ArcSwap<reqwest::Client>> = Lazy::new(|| ArcSwap::from_pointee(ClientBuilder::new().build().unwrap()));

const API_URL: &str = "https://api.evently.app/v1";

pub struct Client;

fn build_client(access_token: Option<&str>) -> Result<Arc<reqwest::Client>> {
    CLIENT_TOKEN.store(access_token.map(str::to_owned).into());
    let mut headers = header::HeaderMap::new();
    if let Some(token) = access_token {
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);
    }
    Ok(ClientBuilder::new().default_headers(headers).build()?.into())
}

pub fn set_access_token(access_token: Option<&str>) -> Result<()> {
    CLIENT.store(build_client(access_token)?);
    Ok(())
}

pub async fn recv_raw(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    if !response.status().is_success() {
        let status = response.status().as_str().to_owned();
        let text = response.text().await.context("failed to receive text")?;
        if let Ok(what) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Some(detail) = what["detail"].as_str() {
                bail!("request failed ({status}): {detail}");
            }
        }
        bail!("request failed ({status}): {text}");
    }
    Ok(response)
}

/// The store wraps list responses in a `data` envelope.
#[derive(Deserialize)]
struct Enveloped<T> {
    data: T,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum LoginParams<'a> {
    Password {
        email: &'a str,
        password: &'a str,
    },
    RefreshToken {
        #[serde(rename = "refreshToken")]
        token: &'a str,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: String,
    pub token: String,
    pub refresh_token: String,
    pub access: i32,
}

impl Client {
    #[inline]
    pub fn get(path: impl AsRef<str>) -> RequestBuilder {
        Self::request(Method::GET, path)
    }

    #[inline]
    pub fn post<T: Serialize>(path: impl AsRef<str>, data: &T) -> RequestBuilder {
        Self::request(Method::POST, path).json(data)
    }

    #[inline]
    pub fn patch<T: Serialize>(path: impl AsRef<str>, data: &T) -> RequestBuilder {
        Self::request(Method::PATCH, path).json(data)
    }

    #[inline]
    pub fn delete(path: impl AsRef<str>) -> RequestBuilder {
        Self::request(Method::DELETE, path)
    }

    pub fn request(method: Method, path: impl AsRef<str>) -> RequestBuilder {
        CLIENT.load().request(method, API_URL.to_string() + path.as_ref())
    }

    pub async fn login(params: LoginParams<'_>) -> Result<LoginResponse> {
        let resp: LoginResponse = recv_raw(Self::post("/user/login", &params)).await?.json().await?;
        set_access_token(Some(&resp.token))?;
        Ok(resp)
    }

    pub async fn logout() -> Result<()> {
        recv_raw(Self::post("/user/logout", &json!({}))).await?;
        set_access_token(None)
    }

    /// Fetches all events, with their role lists normalized. This is the
    /// only place the `everyone` sentinel is appended for events.
    pub async fn fetch_events() -> Result<Vec<Event>> {
        let resp: Enveloped<Vec<Event>> = recv_raw(Self::get("/event/all")).await?.json().await?;
        let mut events = resp.data;
        for event in &mut events {
            event.normalize_roles();
        }
        debug!("fetched {} events", events.len());
        Ok(events)
    }

    pub async fn fetch_posts(event_id: &str) -> Result<Vec<Post>> {
        let resp: Enveloped<Vec<Post>> = recv_raw(Self::get(format!("/posts/{event_id}"))).await?.json().await?;
        Ok(resp.data)
    }

    /// Declared roles of one event, with `everyone` appended once.
    pub async fn fetch_roles(event_id: &str) -> Result<Vec<String>> {
        let resp: Enveloped<Vec<String>> = recv_raw(Self::get(format!("/event/allRole/{event_id}"))).await?.json().await?;
        let mut roles = resp.data;
        if !roles.iter().any(|it| it == EVERYONE) {
            roles.push(EVERYONE.to_owned());
        }
        Ok(roles)
    }

    pub fn clear_cache<T: Object + 'static>(id: &str) -> Result<bool> {
        let map = obtain_map_cache::<T>();
        let mut guard = map.lock().unwrap();
        let Some(actual_map) = guard.downcast_mut::<ObjectMap<T>>() else {
            unreachable!()
        };
        Ok(actual_map.pop(id).is_some())
    }

    /// Cached fetch-by-id; falls back to the network on a miss.
    pub async fn load<T: Object + 'static>(id: &str) -> Result<Arc<T>> {
        {
            let map = obtain_map_cache::<T>();
            let mut guard = map.lock().unwrap();
            let Some(actual_map) = guard.downcast_mut::<ObjectMap<T>>() else {
                unreachable!()
            };
            if let Some(value) = actual_map.get(id) {
                return Ok(Arc::clone(value));
            }
        }
        let value = Arc::new(Self::fetch::<T>(id).await?.context("entry not found")?);
        let map = obtain_map_cache::<T>();
        let mut guard = map.lock().unwrap();
        let Some(actual_map) = guard.downcast_mut::<ObjectMap<T>>() else {
            unreachable!()
        };
        actual_map.put(id.to_owned(), Arc::clone(&value));
        Ok(value)
    }

    pub async fn fetch<T: Object>(id: &str) -> Result<Option<T>> {
        let resp = Self::get(format!("/{}/{id}", T::QUERY_PATH)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_str().to_owned();
            let text = resp.text().await.context("failed to receive text")?;
            bail!("request failed ({status}): {text}");
        }
        Ok(Some(resp.json().await?))
    }
}

#[async_trait]
impl PostStore for Client {
    async fn create_post(&self, event_id: &str, post: Post) -> Result<Post> {
        let payload = json!({
            "eventID": event_id,
            "updatedPost": post,
        });
        let resp: Enveloped<Post> = recv_raw(Self::post("/posts/create", &payload)).await?.json().await?;
        debug!("created post {} in event {event_id}", resp.data.id);
        Ok(resp.data)
    }

    async fn update_post(&self, post: Post) -> Result<Post> {
        let mut payload = serde_json::to_value(&post)?;
        payload["postID"] = json!(post.id);
        let resp: Enveloped<Post> = recv_raw(Self::patch("/posts/update", &payload)).await?.json().await?;
        Ok(resp.data)
    }

    async fn delete_post(&self, event_id: &str, post_id: &str) -> Result<()> {
        let request = Self::delete("/posts/delete").json(&json!({
            "eventID": event_id,
            "postID": post_id,
        }));
        recv_raw(request).await?;
        Ok(())
    }
}
