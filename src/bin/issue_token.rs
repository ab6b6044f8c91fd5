//! Mint a bearer token for local development.
//!
//! Production tokens come from the identity provider; this signs one with the
//! same shared secret so the API can be exercised with curl.

use clap::Parser;
use time::Duration;

use fintrack::auth::{UserId, create_encoding_key, encode_token};

/// Print a signed bearer token for a user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The user ID to put in the `sub` claim.
    #[arg(long)]
    user_id: String,

    /// The shared secret to sign the token with.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// The `aud` claim to add to the token.
    #[arg(long, env = "JWT_AUDIENCE")]
    jwt_audience: Option<String>,

    /// How many hours the token is valid for.
    #[arg(long, default_value_t = 24)]
    hours: i64,
}

fn main() -> Result<(), fintrack::Error> {
    let args = Args::parse();

    let user_id = UserId::new(args.user_id)?;
    let token = encode_token(
        &user_id,
        args.jwt_audience.as_deref(),
        Duration::hours(args.hours),
        &create_encoding_key(&args.jwt_secret),
    )?;

    println!("{token}");

    Ok(())
}
