use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope::{unwrap_data, unwrap_page};
use crate::api::{ApiClient, ApiResult, Page, Paging, ToParams};
use crate::models::{Conversation, Message};

use super::resource::{item_path, ReadResource};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    participant_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<&'a str>,
}

/// Chat threads between customers, providers and staff.
#[derive(Clone, Debug)]
pub struct ConversationsService {
    client: ApiClient,
}

#[async_trait]
impl ReadResource for ConversationsService {
    type Summary = Conversation;
    type Detail = Conversation;
    type Filters = Paging;

    const PATH: &'static str = "/conversations";

    fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl ConversationsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Opens (or reuses) the thread with `participant_id`.
    pub async fn start(&self, participant_id: &str, booking_id: Option<&str>) -> ApiResult<Conversation> {
        let request = StartRequest {
            participant_id,
            booking_id,
        };
        let response = self
            .client
            .post::<Value, _>(Self::PATH, Some(&request))
            .await?;
        unwrap_data(response.data)
    }

    pub async fn messages(&self, conversation_id: &str, paging: Paging) -> ApiResult<Page<Message>> {
        let path = format!("{}/messages", item_path(Self::PATH, conversation_id));
        let params = paging.to_params();
        let response = self.client.get::<Value>(&path, Some(&params)).await?;
        unwrap_page(response.data)
    }

    pub async fn send_message(&self, conversation_id: &str, message: &SendMessage) -> ApiResult<Message> {
        let path = format!("{}/messages", item_path(Self::PATH, conversation_id));
        let response = self.client.post::<Value, _>(&path, Some(message)).await?;
        unwrap_data(response.data)
    }
}
