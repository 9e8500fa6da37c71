//! Startup seeding: default facility/admin/menu links, and fixture-driven test data.

pub mod fixtures;
pub mod generator;

use crate::error::{AppError, SeedError};
use crate::models::{Facility, LeftMenuLink, ProviderUserMapping, User};
use crate::store::BootstrapRepository;
use chrono::Utc;
use fixtures::Fixtures;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

pub const DEFAULT_FACILITY_NAME: &str = "Default";
pub const ADMIN_USER_ID: i64 = 1;
pub const ADMIN_USERNAME: &str = "SuperAdmin";
const ADMIN_DEFAULT_PASSWORD: &str = "ChangeMe!";

const DEFAULT_LEFT_MENU_LINKS: &str = r#"[{"name":"Unlocked Labs","rank":1,"links":[{"Unlocked Labs Website":"http:\/\/www.unlockedlabs.org\/"},{"Unlocked Labs LinkedIn":"https:\/\/www.linkedin.com\/company\/labs-unlocked\/"}],"created_at":null,"updated_at":null}]"#;

/// Row counts created by one `seed_test_data` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestDataSummary {
    pub provider_platforms: usize,
    pub users: usize,
    pub provider_user_mappings: usize,
    pub programs: usize,
    pub milestones: usize,
    pub activities: usize,
    pub outcomes: usize,
}

fn store_err(what: &'static str) -> impl FnOnce(AppError) -> SeedError {
    move |source| SeedError::Store { what, source }
}

pub fn default_left_menu_links() -> Result<Vec<LeftMenuLink>, SeedError> {
    serde_json::from_str(DEFAULT_LEFT_MENU_LINKS).map_err(SeedError::ParseDefaults)
}

/// Create the default facility, the admin user and the default menu links, unless the admin
/// user already exists. Returns `true` when anything was created.
pub async fn seed_default_data(store: &dyn BootstrapRepository) -> Result<bool, SeedError> {
    if store
        .user_exists(ADMIN_USER_ID)
        .await
        .map_err(store_err("admin user lookup"))?
    {
        tracing::debug!("admin user present, skipping default data");
        return Ok(false);
    }

    let facility = Facility {
        id: 0,
        name: DEFAULT_FACILITY_NAME.into(),
    };
    tracing::info!(name = %facility.name, "creating default facility");
    let facility_id = store
        .create_facility(&facility)
        .await
        .map_err(store_err("facility"))?;

    let mut admin = User {
        id: 0,
        username: ADMIN_USERNAME.into(),
        name_first: "Super".into(),
        name_last: "Admin".into(),
        email: "admin@unlocked.v2".into(),
        password: ADMIN_DEFAULT_PASSWORD.into(),
        password_reset: true,
        role: "admin".into(),
        facility_id,
    };
    admin.hash_password()?;
    tracing::info!(username = %admin.username, facility_id, "creating admin user");
    store.create_user(&admin).await.map_err(store_err("admin user"))?;

    let links = default_left_menu_links()?;
    store
        .create_left_menu_links(&links)
        .await
        .map_err(store_err("left menu links"))?;
    tracing::info!(count = links.len(), "created default left menu links");
    Ok(true)
}

/// Build the generator RNG. Without an explicit seed a random one is drawn and logged so the
/// run can be reproduced with `TEST_DATA_SEED`.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "test data generator seed");
    ChaCha8Rng::seed_from_u64(seed)
}

/// Insert every fixture row, then generate activity history and an outcome for every
/// user × program pair. Not idempotent: a second run stops with a conflict on the first
/// fixture username.
pub async fn seed_test_data(
    store: &dyn BootstrapRepository,
    fixtures_dir: &Path,
    rng: &mut ChaCha8Rng,
) -> Result<TestDataSummary, SeedError> {
    let mut fixtures = Fixtures::load(fixtures_dir).await?;
    let mut summary = TestDataSummary::default();

    for platform in &mut fixtures.provider_platforms {
        platform.id = store
            .create_provider_platform(platform)
            .await
            .map_err(store_err("provider platform"))?;
        summary.provider_platforms += 1;
    }

    for (idx, user) in fixtures.users.iter_mut().enumerate() {
        tracing::info!(username = %user.username, "creating user");
        user.hash_password()?;
        user.id = store.create_user(user).await.map_err(store_err("user"))?;
        summary.users += 1;
        for platform in &fixtures.provider_platforms {
            let mapping = ProviderUserMapping {
                id: 0,
                user_id: user.id,
                provider_platform_id: platform.id,
                external_username: user.username.clone(),
                external_user_id: idx.to_string(),
            };
            store
                .create_provider_user_mapping(&mapping)
                .await
                .map_err(store_err("provider user mapping"))?;
            summary.provider_user_mappings += 1;
        }
    }

    for program in &mut fixtures.programs {
        program.id = store.create_program(program).await.map_err(store_err("program"))?;
        summary.programs += 1;
    }

    for milestone in &fixtures.milestones {
        store
            .create_milestone_record(milestone)
            .await
            .map_err(store_err("milestone"))?;
        summary.milestones += 1;
    }

    let now = Utc::now();
    for user in &fixtures.users {
        for program in &fixtures.programs {
            for activity in generator::activity_history(rng, user.id, program.id, now) {
                store
                    .create_activity(&activity)
                    .await
                    .map_err(store_err("activity"))?;
                summary.activities += 1;
            }
            let outcome = generator::outcome(rng, user.id, program.id);
            store.create_outcome(&outcome).await.map_err(store_err("outcome"))?;
            summary.outcomes += 1;
        }
    }

    tracing::info!(?summary, "seeded test data");
    Ok(summary)
}
