//! `refract generate`: run every configured emitter and write the result.

use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use refract_core::{Error, GeneratedFiles, Generator, GeneratorConfig, Model, Result};

use crate::writer;

/// Arguments of `refract generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Generator configuration (TOML)
    #[arg(long, value_name = "CONFIG")]
    pub config: PathBuf,
    /// Introspected model (JSON)
    #[arg(long, value_name = "MODEL")]
    pub model: PathBuf,
    /// Output directory, overriding `out_dir` from the configuration
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
    /// List the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Run `refract generate` and return the process exit code.
pub fn run(args: GenerateArgs) -> i32 {
    match generate(&args) {
        Ok(files) if args.dry_run => {
            for path in files.paths() {
                println!("{}", path.display());
            }
            0
        }
        Ok(files) => {
            println!("Generated {} files", files.len());
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Load configuration and model, generate, and write unless this is a dry run.
pub fn generate(args: &GenerateArgs) -> Result<GeneratedFiles> {
    let mut config = GeneratorConfig::from_path(&args.config)?;
    if let Some(out) = &args.out {
        config.out_dir.clone_from(out);
    }

    let text = fs::read_to_string(&args.model).map_err(|e| Error::io(&args.model, e))?;
    let model = Model::from_json(&text)?;

    debug!(
        config = %args.config.display(),
        model = %args.model.display(),
        origins = model.len(),
        out_dir = %config.out_dir.display(),
        "Loaded generator inputs."
    );

    let generator = Generator::new(config)?;
    let files = generator.generate(&model)?;

    if !args.dry_run {
        let config = generator.config();
        writer::write_all(&files, config.lint, &config.format)?;
    }

    Ok(files)
}
