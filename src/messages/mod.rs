use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COLOUR_DEFAULT: u32 = 0x5865F2;
pub const COLOUR_ERROR: u32 = 0xED4245;
pub const COLOUR_WARNING: u32 = 0xE67E22;
pub const COLOUR_SUCCESS: u32 = 0x57F287;

pub const EMOJI_ERROR: &str = "\u{274c}";
pub const EMOJI_WARNING: &str = "\u{26a0}\u{fe0f}";
pub const EMOJI_SUCCESS: &str = "\u{2705}";
pub const EMOJI_TIP: &str = "\u{1f4a1}";
pub const EMOJI_INFO: &str = "\u{2139}\u{fe0f}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Embed {
    pub fn new(color: u32) -> Self {
        Self {
            color: Some(color),
            timestamp: Some(Utc::now().to_rfc3339()),
            ..Self::default()
        }
    }

    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url: None,
        });
        self
    }

    pub fn author_with_icon(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: if inline { Some(true) } else { None },
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Danger,
}

impl From<ButtonStyle> for u8 {
    fn from(style: ButtonStyle) -> Self {
        match style {
            ButtonStyle::Primary => 1,
            ButtonStyle::Secondary => 2,
            ButtonStyle::Danger => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ButtonEmoji {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub custom_id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<ButtonEmoji>,
    pub style: ButtonStyle,
}

impl Button {
    pub fn new(
        custom_id: impl Into<String>,
        label: impl Into<String>,
        emoji: &str,
        style: ButtonStyle,
    ) -> Self {
        Self {
            kind: 2,
            custom_id: custom_id.into(),
            label: label.into(),
            emoji: Some(ButtonEmoji {
                name: emoji.to_string(),
            }),
            style,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Button>,
}

impl ActionRow {
    pub fn buttons(components: Vec<Button>) -> Self {
        Self { kind: 1, components }
    }
}

/// A rendered message ready for the platform boundary. Replies and channel
/// posts share this shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplyMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub components: Vec<ActionRow>,
}

impl ReplyMessage {
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn components(mut self, components: Vec<ActionRow>) -> Self {
        self.components = components;
        self
    }
}

pub fn inline_code(text: &str) -> String {
    format!("`{text}`")
}

pub fn code_block(lang: &str, body: &str) -> String {
    format!("```{lang}\n{body}\n```")
}

pub fn channel_mention(channel_id: &str) -> String {
    format!("<#{channel_id}>")
}

pub fn user_mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Platform token rendered client-side as "in 2 minutes" style relative time.
pub fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

pub fn error_label(message: &str) -> String {
    format!("{} {message}", inline_code(EMOJI_ERROR))
}

pub fn warning_label(message: &str) -> String {
    format!("{EMOJI_WARNING} {message}")
}

pub fn success_label(message: &str) -> String {
    format!("{} {message}", inline_code(EMOJI_SUCCESS))
}

pub fn tip_label(message: &str) -> String {
    format!("{} {message}", inline_code(EMOJI_TIP))
}

pub fn info_label(message: &str) -> String {
    format!("{} {message}", inline_code(EMOJI_INFO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn relative_timestamp_uses_unix_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_timestamp(at), format!("<t:{}:R>", at.timestamp()));
    }

    #[test]
    fn mentions_and_code_formatting() {
        assert_eq!(channel_mention("123"), "<#123>");
        assert_eq!(user_mention("456"), "<@456>");
        assert_eq!(inline_code("abc"), "`abc`");
        assert_eq!(code_block("rs", "x"), "```rs\nx\n```");
    }

    #[test]
    fn labels_carry_their_emoji() {
        assert!(error_label("boom").contains(EMOJI_ERROR));
        assert!(error_label("boom").ends_with("boom"));
        assert!(warning_label("careful").starts_with(EMOJI_WARNING));
        assert!(success_label("done").contains(EMOJI_SUCCESS));
        assert!(tip_label("hint").contains(EMOJI_TIP));
        assert!(info_label("fyi").contains(EMOJI_INFO));
    }

    #[test]
    fn button_rows_serialize_to_component_payloads() {
        let row = ActionRow::buttons(vec![Button::new(
            "lock",
            "Lock Ticket",
            "\u{1f510}",
            ButtonStyle::Secondary,
        )]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["components"][0]["type"], 2);
        assert_eq!(json["components"][0]["style"], 2);
        assert_eq!(json["components"][0]["emoji"]["name"], "\u{1f510}");
    }

    #[test]
    fn embed_serialization_skips_empty_parts() {
        let embed = Embed {
            color: Some(COLOUR_DEFAULT),
            ..Embed::default()
        };
        let json = serde_json::to_value(&embed).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("fields").is_none());
        assert_eq!(json["color"], COLOUR_DEFAULT);
    }
}
