use clap::Args;

use super::context::{Context, describe};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account user name
    #[arg(long, env = "POS_USERNAME")]
    username: String,

    /// Account password
    #[arg(long, env = "POS_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(context: &Context, args: LoginArgs) -> Result<(), String> {
    let token = context
        .backend
        .login(&args.username, &args.password)
        .await
        .map_err(|error| describe(&error))?;

    println!("Signed in as {}", args.username);
    println!("export POS_API_TOKEN={token}");

    Ok(())
}
