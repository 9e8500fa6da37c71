use serde::{Deserialize, Serialize};

/// An external learning platform (Canvas, Kolibri, ...) programs are imported from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderPlatform {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub platform_type: String,
    pub description: String,
    pub icon_url: String,
    pub account_id: String,
    pub access_key: String,
    pub base_url: String,
    pub state: String,
}

/// Links a local user to their account on a provider platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderUserMapping {
    pub id: i64,
    pub user_id: i64,
    pub provider_platform_id: i64,
    pub external_username: String,
    pub external_user_id: String,
}
