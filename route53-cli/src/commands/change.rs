//! get-change command

use anyhow::Result;

use super::{Context, WaitArgs, print_change};

/// Show the status of a change, optionally waiting for it to sync.
pub async fn get(ctx: &Context, change_id: &str, wait: WaitArgs) -> Result<()> {
    let info = ctx.client.get_change(change_id).await?;
    let info = wait.settle(ctx.client.pending_change(info)).await?;
    ctx.emit(&info, print_change)
}
