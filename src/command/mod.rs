mod args;

use std::{
    fs,
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::{add_path, error},
    ext,
    config::Config,
    pop::Populations,
    runner::SysRunner,
    stages::{self, Tools, Workflow},
};
pub use args::{Args, parse_args};

/// Configuration file that the selection pipeline receives:
/// the file, explicitly provided by the user, or `system.default_config_file`, if available.
fn pipeline_config(args: &Args, config: &Config, loaded: &Path) -> PathBuf {
    match (&args.config, config.get("system", "default_config_file")) {
        (Some(path), _) => path.clone(),
        (None, Some(default)) => PathBuf::from(default),
        (None, None) => loaded.to_owned(),
    }
}

/// Loads configuration, locates tools and populations, and converts arguments into workflow settings.
/// Returns workflow, populations and environment variables for the external tools.
pub fn prepare(args: Args) -> Result<(Workflow, Populations, Vec<(String, String)>), Error> {
    let config_file = args.config_file();
    let config = Config::load(&config_file)?;
    let tools = Tools::resolve(&config)?;
    let env = config.environment();

    let vcf = args.vcf.as_ref().ok_or_else(|| error!(InvalidInput, "VCF file is not provided"))?;
    let vcf = fs::canonicalize(vcf).map_err(add_path!(vcf))?;
    let chrom = args.chrom.clone().ok_or_else(|| error!(InvalidInput, "Chromosome is not provided"))?;
    let pipeline_config = ext::sys::absolute(&pipeline_config(&args, &config, &config_file))?;
    if !pipeline_config.is_file() {
        log::warn!("Selection pipeline configuration {} does not exist", ext::fmt::path(&pipeline_config));
    }
    let output = ext::sys::absolute(&args.output)?;
    ext::sys::mkdir(&output)?;

    let pops = Populations::load(&args.populations)?;
    let workflow = Workflow {
        output, vcf, chrom, pipeline_config, tools,
        fst_window_size: args.fst_window_size,
        fst_window_step: args.fst_window_step,
        extra_args: args.extra_args,
    };
    log::debug!("{:?}", workflow);
    Ok((workflow, pops, env))
}

/// Runs the whole workflow, executing external tools as child processes.
pub fn run(args: Args) -> Result<(), Error> {
    let (workflow, pops, env) = prepare(args)?;
    let mut runner = SysRunner::new(env);
    stages::run_all(&workflow, &pops, &mut runner)
}
