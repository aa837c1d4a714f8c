//! Typed mirror of the server-reported subclient configuration.
//!
//! The server speaks in nested JSON property bags; this module pins the
//! parts the SDK cares about into structs with named optional fields, so
//! absent keys become defaults instead of runtime key-presence checks.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::entities::SubclientEntity;
use crate::errors::Result;

/// Content operation discriminator meaning "replace the server-side list".
const CONTENT_OPERATION_REPLACE: u8 = 1;

/// Mirror of one subclient's configuration as last fetched from the
/// server. Unknown keys in the payload are ignored; missing keys default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubclientProperties {
    #[serde(rename = "postgreSQLSubclientProp")]
    pub postgresql_subclient_prop: PostgresSubclientProps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impersonate_user: Option<ImpersonateUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_client: Option<ProxyClient>,
    pub sub_client_entity: SubclientEntity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_properties: Option<CommonProperties>,
}

/// PostgreSQL-specific slice of the subclient configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostgresSubclientProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_backup_streams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_object_list_during_backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_based_backup: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpersonateUser {
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyClient {
    pub client_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_backup: Option<bool>,
}

/// One entry of the raw content list. Entries that lack the PostgreSQL
/// block or a database name are tolerated here and dropped on projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentEntry {
    #[serde(rename = "postgreSQLContent", skip_serializing_if = "Option::is_none")]
    pub postgresql_content: Option<PostgresContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostgresContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
}

impl SubclientProperties {
    /// Extracts properties from a get-subclient response.
    ///
    /// Some server versions wrap the properties in a one-element array;
    /// both shapes parse. A payload without the PostgreSQL sub-struct
    /// still parses, with that sub-struct defaulting to empty.
    pub fn from_response(payload: &Value) -> Result<Self> {
        let node = match payload.get("subClientProperties").cloned() {
            Some(Value::Array(items)) => items.into_iter().next().unwrap_or(Value::Null),
            Some(node) => node,
            None => Value::Null,
        };
        if node.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(node)?)
    }

    /// Ordered database names described by the content list, with leading
    /// slashes stripped. Malformed entries are skipped silently.
    pub fn database_names(&self) -> Vec<String> {
        self.content
            .iter()
            .flatten()
            .filter_map(|entry| entry.postgresql_content.as_ref())
            .filter_map(|content| content.database_name.as_deref())
            .map(|name| name.trim_start_matches('/').to_string())
            .collect()
    }

    /// Serializes the cache into the document shape the update-subclient
    /// endpoint expects. The content list is always replaced wholesale.
    pub fn to_request_document(&self) -> Value {
        json!({
            "subClientProperties": {
                "postgreSQLSubclientProp": self.postgresql_subclient_prop,
                "impersonateUser": self.impersonate_user,
                "proxyClient": self.proxy_client,
                "subClientEntity": self.sub_client_entity,
                "content": self.content,
                "commonProperties": self.common_properties,
                "contentOperationType": CONTENT_OPERATION_REPLACE,
            },
        })
    }
}
