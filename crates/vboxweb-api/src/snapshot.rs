//! `ISnapshot` and snapshot-tree traversal.

use crate::error::ApiResult;
use crate::operations::*;
use crate::types::SnapshotInfo;

managed_object! {
    Snapshot
}

impl Snapshot {
    pub async fn name(&self) -> ApiResult<String> {
        let resp = self.client.call(&ISnapshotGetName { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn id(&self) -> ApiResult<String> {
        let resp = self.client.call(&ISnapshotGetId { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn description(&self) -> ApiResult<String> {
        let resp = self
            .client
            .call(&ISnapshotGetDescription { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    pub async fn children(&self) -> ApiResult<Vec<Snapshot>> {
        let resp = self
            .client
            .call(&ISnapshotGetChildren { this: self.this() })
            .await?;
        Ok(resp
            .returnval
            .into_iter()
            .map(|r| Snapshot::new(self.client.clone(), r))
            .collect())
    }

    /// Walk the tree below (and including) this snapshot depth-first,
    /// children in server order. `current_id` marks the current snapshot.
    ///
    /// Returns the visited handles too so the caller can release them.
    pub async fn walk(&self, current_id: Option<&str>) -> ApiResult<(Vec<SnapshotInfo>, Vec<Snapshot>)> {
        let mut infos = Vec::new();
        let mut visited = Vec::new();
        let mut stack: Vec<(Snapshot, Option<String>, usize)> = vec![(self.clone(), None, 0)];

        while let Some((snap, parent_id, depth)) = stack.pop() {
            let id = snap.id().await?;
            infos.push(SnapshotInfo {
                name: snap.name().await?,
                description: snap.description().await?,
                current: current_id == Some(id.as_str()),
                parent_id,
                depth,
                id: id.clone(),
            });
            for child in snap.children().await?.into_iter().rev() {
                stack.push((child, Some(id.clone()), depth + 1));
            }
            visited.push(snap);
        }

        Ok((infos, visited))
    }
}
