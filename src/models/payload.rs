//! Platform notification payloads
//!
//! Android and iOS payloads have unrelated shapes, so [`Payload`] is a sum
//! type serialized without a tag: the gateway infers the platform from the
//! app key, and each variant serializes to exactly the JSON the vendor
//! documents for that platform.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{deserialize_opt_bool, serialize_opt_bool};
use crate::errors::{UpushError, UpushResult};

/// Keys the gateway reserves at the top level of an iOS payload
pub const IOS_RESERVED_KEYS: [&str; 3] = ["aps", "d", "p"];

/// Message body for a send request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Android(AndroidPayload),
    Ios(IosPayload),
    /// Caller-built JSON, sent verbatim
    Raw(Value),
}

impl Payload {
    pub fn validate(&self) -> UpushResult<()> {
        match self {
            Payload::Android(payload) => payload.validate(),
            Payload::Ios(payload) => payload.validate(),
            Payload::Raw(value) if value.is_object() => Ok(()),
            Payload::Raw(_) => Err(UpushError::invalid_request(
                "payload",
                "raw payload must be a JSON object",
            )),
        }
    }
}

impl From<AndroidPayload> for Payload {
    fn from(payload: AndroidPayload) -> Self {
        Payload::Android(payload)
    }
}

impl From<IosPayload> for Payload {
    fn from(payload: IosPayload) -> Self {
        Payload::Ios(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Notification,
    /// Delivered to the app silently, body carries only `custom`
    Message,
}

/// Action taken when the user taps a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterOpen {
    GoApp,
    GoUrl,
    GoActivity,
    GoCustom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidPayload {
    pub display_type: DisplayType,
    pub body: AndroidBody,
    /// Custom key-values, only honoured for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ticker: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "largeIcon", default, skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_bool",
        deserialize_with = "deserialize_opt_bool"
    )]
    pub play_vibrate: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_bool",
        deserialize_with = "deserialize_opt_bool"
    )]
    pub play_lights: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_bool",
        deserialize_with = "deserialize_opt_bool"
    )]
    pub play_sound: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_open: Option<AfterOpen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

impl AndroidPayload {
    /// A status-bar notification with the three required text fields
    pub fn notification(
        ticker: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            display_type: DisplayType::Notification,
            body: AndroidBody {
                ticker: ticker.into(),
                title: title.into(),
                text: text.into(),
                ..Default::default()
            },
            extra: None,
        }
    }

    /// A silent message handled by the app
    pub fn message(custom: Value) -> Self {
        Self {
            display_type: DisplayType::Message,
            body: AndroidBody {
                custom: Some(custom),
                ..Default::default()
            },
            extra: None,
        }
    }

    pub fn with_after_open(mut self, after_open: AfterOpen) -> Self {
        self.body.after_open = Some(after_open);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.body.after_open = Some(AfterOpen::GoUrl);
        self.body.url = Some(url.into());
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.body.after_open = Some(AfterOpen::GoActivity);
        self.body.activity = Some(activity.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> UpushResult<()> {
        let body = &self.body;
        match self.display_type {
            DisplayType::Notification => {
                for (field, value) in [
                    ("body.ticker", &body.ticker),
                    ("body.title", &body.title),
                    ("body.text", &body.text),
                ] {
                    if value.is_empty() {
                        return Err(UpushError::invalid_request(field, "required for notifications"));
                    }
                }
            }
            DisplayType::Message => {
                if body.custom.is_none() {
                    return Err(UpushError::invalid_request("body.custom", "required for messages"));
                }
            }
        }

        let has_http_url = body
            .url
            .as_deref()
            .is_some_and(|u| u.starts_with("http://") || u.starts_with("https://"));

        match body.after_open {
            Some(AfterOpen::GoUrl) if !has_http_url => Err(UpushError::invalid_request(
                "body.url",
                "go_url requires an http(s) URL",
            )),
            Some(AfterOpen::GoActivity) if body.activity.is_none() => Err(
                UpushError::invalid_request("body.activity", "required for go_activity"),
            ),
            Some(AfterOpen::GoCustom) if body.custom.is_none() => Err(
                UpushError::invalid_request("body.custom", "required for go_custom"),
            ),
            _ => Ok(()),
        }
    }
}

/// Alert text shown by iOS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IosAlert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// The APNs `aps` dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<IosAlert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(rename = "content-available", default, skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "mutable-content", default, skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// iOS payload: the `aps` dictionary plus free-form custom keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IosPayload {
    pub aps: Aps,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl IosPayload {
    pub fn alert(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            aps: Aps {
                alert: Some(IosAlert {
                    title: Some(title.into()),
                    subtitle: None,
                    body: Some(body.into()),
                }),
                ..Default::default()
            },
            custom: Map::new(),
        }
    }

    /// Background push with no visible alert
    pub fn silent() -> Self {
        Self {
            aps: Aps {
                content_available: Some(1),
                ..Default::default()
            },
            custom: Map::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.aps.alert.get_or_insert_with(IosAlert::default).subtitle = Some(subtitle.into());
        self
    }

    pub fn with_badge(mut self, badge: i64) -> Self {
        self.aps.badge = Some(badge);
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.aps.sound = Some(sound.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.aps.category = Some(category.into());
        self
    }

    /// Attach an image; APNs only loads it when `mutable-content` is set
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.aps.image = Some(image.into());
        self.aps.mutable_content = Some(1);
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    pub fn is_silent(&self) -> bool {
        self.aps.content_available == Some(1)
    }

    pub fn validate(&self) -> UpushResult<()> {
        if let Some(key) = self
            .custom
            .keys()
            .find(|key| IOS_RESERVED_KEYS.contains(&key.as_str()))
        {
            return Err(UpushError::invalid_request(
                key.clone(),
                "reserved key in iOS payload",
            ));
        }
        if !self.is_silent() && self.aps.alert.is_none() {
            return Err(UpushError::invalid_request(
                "aps.alert",
                "required unless content-available is 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_android_notification_wire_shape() {
        let payload = AndroidPayload::notification("tick", "Title", "Text")
            .with_url("https://example.com")
            .with_extra("order_id", 42);
        payload.validate().unwrap();

        let value = serde_json::to_value(Payload::from(payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "display_type": "notification",
                "body": {
                    "ticker": "tick",
                    "title": "Title",
                    "text": "Text",
                    "after_open": "go_url",
                    "url": "https://example.com"
                },
                "extra": {"order_id": 42}
            })
        );
    }

    #[test]
    fn test_android_flags_are_strings() {
        let mut payload = AndroidPayload::notification("t", "t", "t");
        payload.body.play_sound = Some(false);
        payload.body.large_icon = Some("big".to_string());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["body"]["play_sound"], "false");
        assert_eq!(value["body"]["largeIcon"], "big");
    }

    #[test]
    fn test_android_message_only_custom() {
        let payload = AndroidPayload::message(json!({"k": "v"}));
        payload.validate().unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"display_type": "message", "body": {"custom": {"k": "v"}}}));
    }

    #[test]
    fn test_android_validation() {
        let missing_text = AndroidPayload::notification("tick", "Title", "");
        assert!(missing_text.validate().is_err());

        let mut message = AndroidPayload::message(json!({}));
        message.body.custom = None;
        assert!(message.validate().is_err());

        let bad_url = AndroidPayload::notification("t", "t", "t").with_url("ftp://x");
        assert!(bad_url.validate().is_err());

        let no_custom = AndroidPayload::notification("t", "t", "t").with_after_open(AfterOpen::GoCustom);
        assert!(no_custom.validate().is_err());
    }

    #[test]
    fn test_ios_wire_shape() {
        let payload = IosPayload::alert("Hello", "World")
            .with_subtitle("Sub")
            .with_badge(3)
            .with_image("https://example.com/a.png")
            .with_custom("deeplink", "app://home");
        payload.validate().unwrap();

        let value = serde_json::to_value(Payload::Ios(payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "aps": {
                    "alert": {"title": "Hello", "subtitle": "Sub", "body": "World"},
                    "badge": 3,
                    "mutable-content": 1,
                    "image": "https://example.com/a.png"
                },
                "deeplink": "app://home"
            })
        );
    }

    #[test]
    fn test_ios_silent_needs_no_alert() {
        let payload = IosPayload::silent();
        assert!(payload.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"aps": {"content-available": 1}})
        );

        assert!(IosPayload::default().validate().is_err());
    }

    #[test]
    fn test_ios_reserved_keys_rejected() {
        for key in ["d", "p"] {
            let payload = IosPayload::alert("a", "b").with_custom(key, "x");
            match payload.validate() {
                Err(UpushError::InvalidRequest { field, .. }) => assert_eq!(field, key),
                other => panic!("expected reserved key error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_raw_payload_must_be_object() {
        assert!(Payload::Raw(json!({"title": "hi"})).validate().is_ok());
        assert!(Payload::Raw(json!("hi")).validate().is_err());
    }
}
