use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::UpushError;

/// Top-level `ret` field of every gateway response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RetCode {
    Success,
    Fail,
}

/// Outcome of a decoded gateway response
///
/// Implemented by every response shape so the transport can turn a `FAIL`
/// into an error without knowing which operation it served.
pub trait ApiResult: DeserializeOwned {
    /// Whether the gateway reported `SUCCESS`
    fn is_success(&self) -> bool;

    /// The vendor error carried by a failed response, `None` on success
    fn to_error(&self) -> Option<UpushError>;
}

pub(crate) fn vendor_failure(
    ret: RetCode,
    error_code: Option<&str>,
    error_msg: Option<&str>,
) -> Option<UpushError> {
    match ret {
        RetCode::Success => None,
        RetCode::Fail => Some(UpushError::vendor(
            error_code.unwrap_or_default(),
            error_msg.unwrap_or_default(),
        )),
    }
}

/// Current Unix time in seconds, as the decimal string the gateway expects
pub fn unix_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// The gateway encodes booleans as the strings `"true"` / `"false"`
pub(crate) fn serialize_opt_bool<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(true) => serializer.serialize_str("true"),
        Some(false) => serializer.serialize_str("false"),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn deserialize_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::String(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean string '{other}'"))),
        },
        Some(other) => Err(serde::de::Error::custom(format!("invalid boolean value {other}"))),
    }
}

/// Error codes arrive as strings in the docs but as numbers from some gateways
pub(crate) fn deserialize_opt_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("invalid error code {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Flags {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "serialize_opt_bool",
            deserialize_with = "deserialize_opt_bool"
        )]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_opt_code")]
        code: Option<String>,
    }

    #[test]
    fn test_bool_serialized_as_string() {
        let json = serde_json::to_string(&Flags { flag: Some(false), code: None }).unwrap();
        assert_eq!(json, r#"{"flag":"false","code":null}"#);

        let json = serde_json::to_string(&Flags { flag: None, code: None }).unwrap();
        assert_eq!(json, r#"{"code":null}"#);
    }

    #[test]
    fn test_bool_and_code_deserialization() {
        let flags: Flags = serde_json::from_str(r#"{"flag":"true","code":2000}"#).unwrap();
        assert_eq!(flags.flag, Some(true));
        assert_eq!(flags.code.as_deref(), Some("2000"));

        let flags: Flags = serde_json::from_str(r#"{"flag":true,"code":"40001"}"#).unwrap();
        assert_eq!(flags.flag, Some(true));
        assert_eq!(flags.code.as_deref(), Some("40001"));

        assert!(serde_json::from_str::<Flags>(r#"{"flag":"yes"}"#).is_err());
    }

    #[test]
    fn test_ret_code_wire_format() {
        assert_eq!(serde_json::to_string(&RetCode::Success).unwrap(), r#""SUCCESS""#);
        let ret: RetCode = serde_json::from_str(r#""FAIL""#).unwrap();
        assert_eq!(ret, RetCode::Fail);
    }

    #[test]
    fn test_vendor_failure_only_on_fail() {
        assert!(vendor_failure(RetCode::Success, None, None).is_none());

        let err = vendor_failure(RetCode::Fail, Some("2018"), Some("timestamp expired")).unwrap();
        assert_eq!(err.to_string(), "timestamp expired, code=2018");
    }

    #[test]
    fn test_unix_timestamp_is_seconds() {
        let ts: i64 = unix_timestamp().parse().unwrap();
        let now = chrono::Utc::now().timestamp();
        assert!((now - ts).abs() <= 1);
        assert_eq!(unix_timestamp().len(), 10);
    }
}
