use crate::cli::commands::InspectArgs;
use crate::errors::BoefjeError;
use super::run::{build_runner, build_settings, load};

pub async fn handle_inspect(args: InspectArgs) -> Result<(), BoefjeError> {
    let file_config = load(&args.scanner).await?;
    let settings = build_settings(&args.scanner, &file_config);
    let runner = build_runner(&args.scanner, &file_config, settings)?;

    let plan = runner.plan(&args.input_url).await?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
