//! JSON fixture files under the fixtures directory.

use crate::error::SeedError;
use crate::models::{Milestone, Program, ProviderPlatform, User};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub const PROVIDER_PLATFORMS_FILE: &str = "provider_platforms.json";
pub const USERS_FILE: &str = "users.json";
pub const PROGRAMS_FILE: &str = "programs.json";
pub const MILESTONES_FILE: &str = "milestones.json";

/// Every fixture needed by the test-data seed, loaded up front.
#[derive(Debug, Default)]
pub struct Fixtures {
    pub provider_platforms: Vec<ProviderPlatform>,
    pub users: Vec<User>,
    pub programs: Vec<Program>,
    pub milestones: Vec<Milestone>,
}

impl Fixtures {
    pub async fn load(dir: &Path) -> Result<Self, SeedError> {
        Ok(Fixtures {
            provider_platforms: read_fixture(&dir.join(PROVIDER_PLATFORMS_FILE)).await?,
            users: read_fixture(&dir.join(USERS_FILE)).await?,
            programs: read_fixture(&dir.join(PROGRAMS_FILE)).await?,
            milestones: read_fixture(&dir.join(MILESTONES_FILE)).await?,
        })
    }
}

pub async fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::ReadFixture {
            path: PathBuf::from(path),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::ParseFixture {
        path: PathBuf::from(path),
        source,
    })
}
