//! Cross-population RSB statistic, calculated by an R script from the per-population iHH files.

use std::path::PathBuf;
use crate::{
    Error,
    ext,
    pop::Populations,
    runner::{Cmd, Runner},
};
use super::Workflow;

pub(crate) const TOOL: &str = "rsb_generation";
/// Subdirectory of the output directory.
pub(crate) const DIR: &str = "rsb";

/// iHH file, produced by the selection pipeline for the population.
pub fn ihh_file(workflow: &Workflow, pop: &str) -> PathBuf {
    workflow.output.join(pop).join("results").join(format!("{}chr{}.ihh", pop, workflow.chrom))
}

/// Runs the RSB script for each unordered pair of populations.
pub fn run(workflow: &Workflow, pops: &Populations, runner: &mut impl Runner) -> Result<(), Error> {
    let dir = workflow.output.join(DIR);
    ext::sys::mkdir(&dir)?;
    for name in pops.names() {
        let ihh = ihh_file(workflow, name);
        if !ihh.exists() {
            log::warn!("iHH file {} for population {} does not exist", ext::fmt::path(&ihh), name);
        }
    }

    for (pop1, pop2) in pops.pairs() {
        log::info!("RSB between {} and {}", pop1, pop2);
        let cmd = Cmd::new(TOOL, &workflow.tools.rscript)
            .arg(&workflow.tools.generate_rsb)
            .args(["--pop1", pop1, "--pop1file"]).arg(ihh_file(workflow, pop1))
            .args(["--pop2", pop2, "--pop2file"]).arg(ihh_file(workflow, pop2))
            .args(["--chr", workflow.chrom.as_str()])
            .current_dir(&dir);
        runner.run(&cmd)?;
    }
    Ok(())
}
