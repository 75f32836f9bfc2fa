use ablate_core::AblateError;
use ablate_exp::to_canonical_json_bytes;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata as JSON.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: String,
    version: String,
    features: Vec<String>,
}

pub fn run(args: &VersionArgs) -> Result<(), AblateError> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        name: env!("CARGO_BIN_NAME").into(),
        version: env!("CARGO_PKG_VERSION").into(),
        features: enabled_features(),
    };
    let json = to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8_lossy(&json));
    Ok(())
}

// The binary declares no optional cargo features yet.
fn enabled_features() -> Vec<String> {
    vec!["default".into()]
}
