//! The management operations the sample needs

use async_trait::async_trait;

use crate::error::Result;
use crate::netapp::models::{CapacityPool, NetAppAccount, PoolChangeRequest, Volume};
use crate::resource::ResourceHandle;

/// NetApp Files management API
///
/// Every operation addresses its target by [`ResourceHandle`]. A missing
/// resource must be reported as [`crate::CoreError::NotFound`] so that waits can
/// tell it apart from real failures.
#[async_trait]
pub trait NetAppApi: Send + Sync {
    async fn create_or_update_account(
        &self,
        id: &ResourceHandle,
        body: &NetAppAccount,
    ) -> Result<NetAppAccount>;

    async fn get_account(&self, id: &ResourceHandle) -> Result<NetAppAccount>;

    async fn delete_account(&self, id: &ResourceHandle) -> Result<()>;

    async fn create_or_update_pool(
        &self,
        id: &ResourceHandle,
        body: &CapacityPool,
    ) -> Result<CapacityPool>;

    async fn get_pool(&self, id: &ResourceHandle) -> Result<CapacityPool>;

    async fn delete_pool(&self, id: &ResourceHandle) -> Result<()>;

    async fn create_or_update_volume(&self, id: &ResourceHandle, body: &Volume) -> Result<Volume>;

    async fn get_volume(&self, id: &ResourceHandle) -> Result<Volume>;

    async fn delete_volume(&self, id: &ResourceHandle) -> Result<()>;

    /// Move a volume to the capacity pool named in `request`
    async fn pool_change(&self, volume: &ResourceHandle, request: &PoolChangeRequest)
    -> Result<()>;
}
