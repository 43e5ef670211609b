//! Menu persistence endpoints
//!
//! | Call          | Endpoint                              |
//! |---------------|---------------------------------------|
//! | `get_menu`    | `GET /menus/:id`                      |
//! | `get_items`   | `GET /menus/:id/items`                |
//! | `create_item` | `POST /menus/:id/items`               |
//! | `update_menu` | `PUT /menus/:id`                      |
//! | `reorder`     | `POST /menus/:id/reorder`             |
//! | `delete_item` | `DELETE /menus/:id/items/:itemId`     |

use crate::error::{MenuError, MenuResult};
use crate::item::{Menu, MenuItem, MenuUpdate};
use crate::tree::ReorderEntry;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait MenuApi: Send + Sync {
    async fn get_menu(&self, menu_id: i64) -> MenuResult<Menu>;

    /// Items in flat form
    async fn get_items(&self, menu_id: i64) -> MenuResult<Vec<MenuItem>>;

    /// Persist one item; the response carries its new id
    async fn create_item(&self, menu_id: i64, item: &MenuItem) -> MenuResult<MenuItem>;

    async fn update_menu(&self, menu_id: i64, update: &MenuUpdate) -> MenuResult<Menu>;

    async fn reorder(&self, menu_id: i64, entries: &[ReorderEntry]) -> MenuResult<()>;

    async fn delete_item(&self, menu_id: i64, item_id: i64) -> MenuResult<()>;
}

#[derive(Serialize)]
struct ReorderRequest<'a> {
    items: &'a [ReorderEntry],
}

/// JSON-over-HTTP client for the menu endpoints
pub struct HttpMenuApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpMenuApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> MenuResult<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: Option<&B>) -> MenuResult<String> {
        let url = self.url(path);
        debug!(%method, %url, "menu request");

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MenuError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> MenuResult<T> {
        let text = self.send::<()>(Method::GET, path, None).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl MenuApi for HttpMenuApi {
    async fn get_menu(&self, menu_id: i64) -> MenuResult<Menu> {
        self.fetch(&format!("/menus/{}", menu_id)).await
    }

    async fn get_items(&self, menu_id: i64) -> MenuResult<Vec<MenuItem>> {
        self.fetch(&format!("/menus/{}/items", menu_id)).await
    }

    async fn create_item(&self, menu_id: i64, item: &MenuItem) -> MenuResult<MenuItem> {
        let text = self
            .send(Method::POST, &format!("/menus/{}/items", menu_id), Some(item))
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn update_menu(&self, menu_id: i64, update: &MenuUpdate) -> MenuResult<Menu> {
        let text = self
            .send(Method::PUT, &format!("/menus/{}", menu_id), Some(update))
            .await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn reorder(&self, menu_id: i64, entries: &[ReorderEntry]) -> MenuResult<()> {
        self.send(
            Method::POST,
            &format!("/menus/{}/reorder", menu_id),
            Some(&ReorderRequest { items: entries }),
        )
        .await?;
        Ok(())
    }

    async fn delete_item(&self, menu_id: i64, item_id: i64) -> MenuResult<()> {
        self.send::<()>(Method::DELETE, &format!("/menus/{}/items/{}", menu_id, item_id), None)
            .await?;
        Ok(())
    }
}
