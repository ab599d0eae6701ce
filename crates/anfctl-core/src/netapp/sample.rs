//! The pool-change sample as one sequence
//!
//! Creates an account, a primary and a secondary capacity pool and a volume in
//! the primary pool, moves the volume to the secondary pool, and optionally
//! removes everything again in reverse dependency order.

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::netapp::api::NetAppApi;
use crate::netapp::models::{CapacityPool, NetAppAccount, Volume};
use crate::netapp::workflows::{
    change_pool_and_wait, create_account_and_wait, create_pool_and_wait, create_volume_and_wait,
    delete_account_and_wait, delete_pool_and_wait, delete_volume_and_wait,
};
use crate::poller::ResourcePoller;
use crate::resource::ResourceHandle;

/// Milestones reported while the sample runs
#[derive(Debug, Clone, PartialEq)]
pub enum SampleStep {
    /// A create request is about to be sent
    Creating { id: ResourceHandle },
    /// The resource is readable
    Created { id: ResourceHandle },
    /// The volume is about to be moved
    ChangingPool {
        volume: ResourceHandle,
        to: ResourceHandle,
    },
    /// The volume is readable under its new pool
    PoolChanged {
        volume: ResourceHandle,
        from: String,
        to: String,
    },
    CleanupStarted,
    /// A delete request is about to be sent
    Deleting { id: ResourceHandle },
    /// The resource is gone
    Deleted { id: ResourceHandle },
}

/// What the sample produced
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub account: ResourceHandle,
    pub primary_pool: ResourceHandle,
    pub secondary_pool: ResourceHandle,
    /// The volume's handle after the pool change
    pub volume: ResourceHandle,
    pub cleaned_up: bool,
}

/// Run the full sample against `api`
///
/// `on_step` is called synchronously at every milestone.
pub async fn run_sample<F>(
    api: &dyn NetAppApi,
    config: &Config,
    poller: &ResourcePoller,
    mut on_step: F,
) -> Result<SampleReport>
where
    F: FnMut(SampleStep) + Send,
{
    config.validate()?;

    let account = config.account_id();
    let primary_pool = config.pool_id(&config.primary_pool);
    let secondary_pool = config.pool_id(&config.secondary_pool);
    let volume = config.volume_id();

    on_step(SampleStep::Creating {
        id: account.clone(),
    });
    create_account_and_wait(api, &account, &NetAppAccount::new(&config.location), poller).await?;
    on_step(SampleStep::Created {
        id: account.clone(),
    });

    for (id, pool) in [
        (&primary_pool, &config.primary_pool),
        (&secondary_pool, &config.secondary_pool),
    ] {
        on_step(SampleStep::Creating { id: id.clone() });
        let body = CapacityPool::new(&config.location, pool.service_level, config.pool_size);
        create_pool_and_wait(api, id, &body, poller).await?;
        on_step(SampleStep::Created { id: id.clone() });
    }

    on_step(SampleStep::Creating { id: volume.clone() });
    let body = Volume::nfs41(
        &config.location,
        config.primary_pool.service_level,
        &config.volume_name,
        &config.subnet_id,
        config.volume_size,
    );
    create_volume_and_wait(api, &volume, &body, poller).await?;
    on_step(SampleStep::Created { id: volume.clone() });

    on_step(SampleStep::ChangingPool {
        volume: volume.clone(),
        to: secondary_pool.clone(),
    });
    let (moved, _) = change_pool_and_wait(api, &volume, &secondary_pool, poller).await?;
    on_step(SampleStep::PoolChanged {
        volume: moved.clone(),
        from: config.primary_pool.name.clone(),
        to: config.secondary_pool.name.clone(),
    });
    info!(
        volume = %moved,
        from = %config.primary_pool.name,
        to = %config.secondary_pool.name,
        "Pool change complete"
    );

    if config.cleanup {
        on_step(SampleStep::CleanupStarted);

        on_step(SampleStep::Deleting { id: moved.clone() });
        delete_volume_and_wait(api, &moved, poller).await?;
        on_step(SampleStep::Deleted { id: moved.clone() });

        for id in [&primary_pool, &secondary_pool] {
            on_step(SampleStep::Deleting { id: id.clone() });
            delete_pool_and_wait(api, id, poller).await?;
            on_step(SampleStep::Deleted { id: id.clone() });
        }

        on_step(SampleStep::Deleting {
            id: account.clone(),
        });
        delete_account_and_wait(api, &account, poller).await?;
        on_step(SampleStep::Deleted {
            id: account.clone(),
        });
    }

    Ok(SampleReport {
        account,
        primary_pool,
        secondary_pool,
        volume: moved,
        cleaned_up: config.cleanup,
    })
}
