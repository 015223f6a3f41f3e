use crate::messages::ReplyMessage;
use crate::platform::{
    ChannelParams, ChannelRef, ChatPlatform, FormSpec, InteractionContext, PlatformError,
    TextInputStyle,
};
use serde::Deserialize;
use serde_json::json;

const EPHEMERAL_FLAG: u64 = 1 << 6;

/// Discord v10 REST implementation of the platform boundary.
pub struct DiscordPlatform {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
    application_id: String,
}

impl DiscordPlatform {
    pub fn new(bot_token: String, application_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://discord.com/api/v10".to_string(),
            bot_token,
            application_id,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(bot_token: String, application_id: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            bot_token,
            application_id,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(PlatformError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                code: Some(status.to_string()),
                message: error_text,
            });
        }

        Ok(response)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, PlatformError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn interaction_callback(
        &self,
        ctx: &InteractionContext,
        body: serde_json::Value,
    ) -> Result<(), PlatformError> {
        self.post_json(
            &format!("/interactions/{}/{}/callback", ctx.id, ctx.token),
            &body,
        )
        .await?;
        Ok(())
    }

    fn form_components(form: &FormSpec) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = form
            .inputs
            .iter()
            .map(|input| {
                json!({
                    "type": 1,
                    "components": [{
                        "type": 4,
                        "custom_id": input.custom_id,
                        "label": input.label,
                        "style": match input.style {
                            TextInputStyle::Short => 1,
                            TextInputStyle::Paragraph => 2,
                        },
                        "placeholder": input.placeholder,
                        "max_length": input.max_length,
                        "required": input.required,
                        "value": input.prefill,
                    }]
                })
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedChannel {
    id: String,
}

#[async_trait::async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn reply_ephemeral(
        &self,
        ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        self.interaction_callback(
            ctx,
            json!({
                "type": 4,
                "data": {
                    "content": message.content,
                    "embeds": message.embeds,
                    "components": message.components,
                    "flags": EPHEMERAL_FLAG,
                }
            }),
        )
        .await
    }

    async fn defer_reply(&self, ctx: &InteractionContext) -> Result<(), PlatformError> {
        self.interaction_callback(
            ctx,
            json!({
                "type": 5,
                "data": { "flags": EPHEMERAL_FLAG }
            }),
        )
        .await
    }

    async fn edit_reply(
        &self,
        ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        let response = self
            .client
            .patch(format!(
                "{}/webhooks/{}/{}/messages/@original",
                self.base_url, self.application_id, ctx.token
            ))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn post_to_channel(
        &self,
        channel_id: &str,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        self.post_json(
            &format!("/channels/{channel_id}/messages"),
            &serde_json::to_value(message).map_err(|e| PlatformError::Api {
                code: None,
                message: e.to_string(),
            })?,
        )
        .await?;
        Ok(())
    }

    async fn show_form(
        &self,
        ctx: &InteractionContext,
        form: &FormSpec,
    ) -> Result<(), PlatformError> {
        self.interaction_callback(
            ctx,
            json!({
                "type": 9,
                "data": {
                    "custom_id": form.custom_id,
                    "title": form.title,
                    "components": Self::form_components(form),
                }
            }),
        )
        .await
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        params: &ChannelParams,
    ) -> Result<ChannelRef, PlatformError> {
        let mut body = serde_json::to_value(params).map_err(|e| PlatformError::Api {
            code: None,
            message: e.to_string(),
        })?;
        // Guild text channel.
        body["type"] = json!(0);

        let response = self
            .post_json(&format!("/guilds/{guild_id}/channels"), &body)
            .await?;

        let created: CreatedChannel = response.json().await.map_err(|e| PlatformError::Api {
            code: None,
            message: e.to_string(),
        })?;

        Ok(ChannelRef {
            id: created.id,
            guild_id: guild_id.to_string(),
        })
    }

    async fn delete_channel(&self, channel: &ChannelRef) -> Result<(), PlatformError> {
        let response = self
            .client
            .delete(format!("{}/channels/{}", self.base_url, channel.id))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}
