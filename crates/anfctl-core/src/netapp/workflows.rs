//! NetApp workflows - request-then-wait operations
//!
//! Each workflow issues one management call and then uses a
//! [`ResourcePoller`] to wait until the backend reflects it.

use tracing::info;

use crate::error::{CoreError, Result};
use crate::netapp::api::NetAppApi;
use crate::netapp::models::{CapacityPool, NetAppAccount, PoolChangeRequest, Volume};
use crate::poller::ResourcePoller;
use crate::resource::{ResourceHandle, ResourceKind};

/// Create (or update) an account and wait until it can be read back
pub async fn create_account_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    body: &NetAppAccount,
    poller: &ResourcePoller,
) -> Result<NetAppAccount> {
    id.expect_kind(ResourceKind::Account)?;
    poller.check_cancelled(&id.describe())?;
    api.create_or_update_account(id, body).await?;
    info!(resource = %id, "Account requested");

    poller
        .wait_until_present(&id.describe(), move || api.get_account(id))
        .await
}

/// Create (or update) a capacity pool and wait until it can be read back
pub async fn create_pool_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    body: &CapacityPool,
    poller: &ResourcePoller,
) -> Result<CapacityPool> {
    id.expect_kind(ResourceKind::Pool)?;
    poller.check_cancelled(&id.describe())?;
    api.create_or_update_pool(id, body).await?;
    info!(resource = %id, service_level = %body.properties.service_level, "Capacity pool requested");

    poller
        .wait_until_present(&id.describe(), move || api.get_pool(id))
        .await
}

/// Create (or update) a volume and wait until it can be read back
pub async fn create_volume_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    body: &Volume,
    poller: &ResourcePoller,
) -> Result<Volume> {
    id.expect_kind(ResourceKind::Volume)?;
    poller.check_cancelled(&id.describe())?;
    api.create_or_update_volume(id, body).await?;
    info!(resource = %id, "Volume requested");

    poller
        .wait_until_present(&id.describe(), move || api.get_volume(id))
        .await
}

/// Move a volume to another capacity pool of the same account
///
/// Waits until the volume is readable under the destination pool and returns
/// its new handle together with the fetched volume.
pub async fn change_pool_and_wait(
    api: &dyn NetAppApi,
    volume: &ResourceHandle,
    new_pool: &ResourceHandle,
    poller: &ResourcePoller,
) -> Result<(ResourceHandle, Volume)> {
    volume.expect_kind(ResourceKind::Volume)?;
    new_pool.expect_kind(ResourceKind::Pool)?;

    if volume.subscription_id() != new_pool.subscription_id()
        || volume.resource_group() != new_pool.resource_group()
        || volume.account_name() != new_pool.account_name()
    {
        return Err(CoreError::Validation(format!(
            "{} and {} belong to different accounts",
            volume.describe(),
            new_pool.describe()
        )));
    }
    if volume.pool_name() == Some(new_pool.name()) {
        return Err(CoreError::Validation(format!(
            "{} is already in {}",
            volume.describe(),
            new_pool.describe()
        )));
    }

    poller.check_cancelled(&volume.describe())?;
    api.pool_change(volume, &PoolChangeRequest::new(new_pool.as_str()))
        .await?;
    info!(volume = %volume, new_pool = %new_pool, "Pool change requested");

    let moved = volume.in_pool(new_pool.name())?;
    let target = &moved;
    let fetched = poller
        .wait_until_present(&moved.describe(), move || api.get_volume(target))
        .await?;
    Ok((moved, fetched))
}

/// Delete a volume and wait until it is gone
pub async fn delete_volume_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    poller: &ResourcePoller,
) -> Result<()> {
    id.expect_kind(ResourceKind::Volume)?;
    poller.check_cancelled(&id.describe())?;
    api.delete_volume(id).await?;
    info!(resource = %id, "Volume deletion requested");

    poller
        .wait_until_absent(&id.describe(), move || api.get_volume(id))
        .await
}

/// Delete a capacity pool and wait until it is gone
pub async fn delete_pool_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    poller: &ResourcePoller,
) -> Result<()> {
    id.expect_kind(ResourceKind::Pool)?;
    poller.check_cancelled(&id.describe())?;
    api.delete_pool(id).await?;
    info!(resource = %id, "Capacity pool deletion requested");

    poller
        .wait_until_absent(&id.describe(), move || api.get_pool(id))
        .await
}

/// Delete an account and wait until it is gone
pub async fn delete_account_and_wait(
    api: &dyn NetAppApi,
    id: &ResourceHandle,
    poller: &ResourcePoller,
) -> Result<()> {
    id.expect_kind(ResourceKind::Account)?;
    poller.check_cancelled(&id.describe())?;
    api.delete_account(id).await?;
    info!(resource = %id, "Account deletion requested");

    poller
        .wait_until_absent(&id.describe(), move || api.get_account(id))
        .await
}
