// ── Session model ──
//
// A session is the bearer token plus the user record the backend returned
// at login. The user record is opaque: only a handful of fields are ever
// read out of it, and it is replaced wholesale on the next login.

pub mod store;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

/// Avatar service used when the user record carries no avatar.
const AVATAR_FALLBACK_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserRecord,
}

impl Session {
    pub fn new(token: SecretString, user: UserRecord) -> Self {
        Self { token, user }
    }
}

/// The backend's user object, kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a login response's `user` value. Anything other than a JSON
    /// object yields an empty record.
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self(map),
            None | Some(Value::Null) => Self::default(),
            Some(other) => {
                warn!(kind = json_kind(&other), "login returned a non-object user, ignoring it");
                Self::default()
            }
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get("id").filter(|v| !v.is_null())
    }

    /// First non-empty of `name`, `username`.
    pub fn display_name(&self) -> Option<&str> {
        self.str_field("name").or_else(|| self.str_field("username"))
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// The stored avatar, or a generated one seeded by the email address.
    pub fn avatar(&self) -> String {
        if let Some(avatar) = self.str_field("avatar") {
            return avatar.to_owned();
        }
        let mut url = Url::parse(AVATAR_FALLBACK_BASE).expect("avatar base URL is valid");
        url.query_pairs_mut()
            .append_pair("seed", self.email().unwrap_or_default());
        url.into()
    }

    /// String entries of the `roles` array. Missing or malformed roles
    /// yield an empty list.
    pub fn roles(&self) -> Vec<String> {
        self.0
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reshape into the identity the console displays.
    ///
    /// The computed `name` and `avatar` take precedence over the stored
    /// fields: an empty or non-string stored `name` still yields the
    /// username, and an empty `avatar` still yields the generated URL.
    pub fn identity(&self) -> Identity {
        let extra = self
            .0
            .iter()
            .filter(|(k, _)| !IDENTITY_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Identity {
            id: self.id().cloned(),
            name: self.display_name().map(str::to_owned),
            email: self.email().map(str::to_owned),
            avatar: self.avatar(),
            extra,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

const IDENTITY_KEYS: [&str; 4] = ["id", "name", "email", "avatar"];

/// Who is logged in, as shown in the console header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub avatar: String,
    /// Every other field of the user record (username, roles, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
