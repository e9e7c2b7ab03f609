use crate::cli::commands::{GlobalArgs, ReplArgs};
use crate::cli::context::{open_dashboard, resolve_settings};
use crate::config::Overrides;
use crate::errors::ShiplensError;
use crate::repl::ReplSession;

pub async fn handle_repl(global: &GlobalArgs, args: ReplArgs) -> Result<(), ShiplensError> {
    let settings = resolve_settings(global, Overrides::default()).await?;
    let dashboard = open_dashboard(&settings)?;
    ReplSession::new(dashboard, settings.llm.provider.clone(), settings.store_path.clone())
        .run(args.file)
        .await
}
