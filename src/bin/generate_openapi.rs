//! Prints the sensor API's OpenAPI document, or writes it to a file.
//!
//!   generate_openapi                      # to stdout
//!   generate_openapi --output api.json    # or `-o api.json`

use std::{env, fs, io::Write, path::PathBuf};

use anyhow::{bail, Context, Result};
use sensor_service::api::handlers::ApiDoc;
use utoipa::OpenApi;

enum Target {
    Stdout,
    File(PathBuf),
}

impl Target {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.next().as_deref() {
            None => Ok(Target::Stdout),
            Some("--output" | "-o") => match args.next() {
                Some(path) => Ok(Target::File(PathBuf::from(path))),
                None => bail!("--output needs a file path"),
            },
            Some(other) => bail!("unexpected argument: {other}"),
        }
    }
}

fn main() -> Result<()> {
    let target = Target::from_args(env::args().skip(1))?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .context("OpenAPI document is not serialisable")?;

    match target {
        Target::Stdout => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{document}").context("writing OpenAPI document to stdout")?;
        }
        Target::File(path) => {
            fs::write(&path, document)
                .with_context(|| format!("writing OpenAPI document to {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}
