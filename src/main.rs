use anyhow::Result;
use tokio_util::sync::CancellationToken;

use taskflow::cli::{cancel_on_ctrl_c, App, AppInfo};

#[tokio::main]
async fn main() -> Result<()> {
    let (mut app, args) = App::from_args(AppInfo::default())?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    app.run(args, cancel).await
}
