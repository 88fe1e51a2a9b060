//! Workflow stages: FST, VCF subsetting, selection pipeline and RSB.

pub mod fst;
pub mod subset;
pub mod selection;
pub mod rsb;

use std::{
    path::PathBuf,
    time::Instant,
};
use colored::Colorize;
use crate::{
    Error,
    ext,
    config::Config,
    pop::Populations,
    runner::Runner,
};

/// External tools, resolved from the configuration.
#[derive(Clone, Debug)]
pub struct Tools {
    /// `vcf-subset` executable.
    pub vcf_subset: PathBuf,
    /// `vcftools` executable.
    pub vcftools: PathBuf,
    /// Selection pipeline, run once per population.
    pub selection_pipeline: PathBuf,
    pub rscript: PathBuf,
    /// R script, that calculates RSB for a pair of populations.
    pub generate_rsb: PathBuf,
}

/// Absent or null entry cannot be located, same as a non-existing path.
fn find_tool(config: &Config, section: &str, option: &str) -> Result<PathBuf, Error> {
    let entry = format!("{}.{}", section, option);
    match config.get(section, option) {
        Some(value) => ext::sys::resolve_exe(&entry, value),
        None => {
            log::error!("{} is not set in the configuration file", entry);
            Err(Error::NoExec(entry, PathBuf::new()))
        }
    }
}

impl Tools {
    /// Locates all external tools. All tools are checked (and failures are logged) before returning the first error.
    pub fn resolve(config: &Config) -> Result<Self, Error> {
        let vcf_subset = find_tool(config, "vcftools", "vcf_subset_executable");
        let selection_pipeline = find_tool(config, "selection_pipeline", "selection_pipeline_executable");
        let vcftools = find_tool(config, "vcftools", "vcf_tools_executable");
        let rscript = find_tool(config, "Rscript", "rscript_executable");
        let generate_rsb = find_tool(config, "Rscript", "generate_rsb");
        Ok(Self {
            vcf_subset: vcf_subset?,
            selection_pipeline: selection_pipeline?,
            vcftools: vcftools?,
            rscript: rscript?,
            generate_rsb: generate_rsb?,
        })
    }
}

/// Settings shared by all stages. All paths are absolute.
#[derive(Clone, Debug)]
pub struct Workflow {
    /// Base output directory.
    pub output: PathBuf,
    /// Input VCF file with all populations.
    pub vcf: PathBuf,
    /// Chromosome label, only used in output names.
    pub chrom: String,
    pub fst_window_size: u32,
    pub fst_window_step: u32,
    /// Configuration file, passed to the selection pipeline.
    pub pipeline_config: PathBuf,
    /// Additional argument, appended to each selection pipeline call.
    pub extra_args: Option<String>,
    pub tools: Tools,
}

/// Runs the stage and reports its running time.
fn timed<T>(title: &str, stage: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    log::info!("{}", title.bold());
    let timer = Instant::now();
    let res = stage()?;
    log::info!("    Finished in {}", ext::fmt::Duration(timer.elapsed()));
    Ok(res)
}

/// Runs all stages in order: FST, VCF subsetting, selection pipeline, RSB.
/// The first error stops the workflow.
pub fn run_all(workflow: &Workflow, pops: &Populations, runner: &mut impl Runner) -> Result<(), Error> {
    let timer = Instant::now();
    timed("Calculating pairwise FST", || fst::run(workflow, pops, &mut *runner))?;
    let subsets = timed("Subsetting VCF file", || subset::run(workflow, pops, &mut *runner))?;
    timed("Running selection pipeline", || selection::run(workflow, &subsets, &mut *runner))?;
    timed("Calculating pairwise RSB", || rsb::run(workflow, pops, &mut *runner))?;
    log::info!("Success! Total time: {}", ext::fmt::Duration(timer.elapsed()));
    Ok(())
}
