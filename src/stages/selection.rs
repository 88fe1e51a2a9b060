//! Running the selection pipeline separately for each population.

use std::path::PathBuf;
use crate::{
    Error,
    ext,
    runner::{Cmd, Runner},
};
use super::Workflow;

pub(crate) const TOOL: &str = "selection_pipeline";

/// Runs the selection pipeline in `<output>/<population>/` for each (population, VCF file) pair.
pub fn run(workflow: &Workflow, subsets: &[(String, PathBuf)], runner: &mut impl Runner) -> Result<(), Error> {
    for (name, vcf) in subsets {
        let dir = workflow.output.join(name);
        ext::sys::mkdir(&dir)?;
        let mut cmd = Cmd::new(TOOL, &workflow.tools.selection_pipeline)
            .args(["-c", workflow.chrom.as_str(), "-i"])
            .arg(vcf)
            .args(["-o", name.as_str(), "--population", name.as_str()])
            .arg("--config-file").arg(&workflow.pipeline_config)
            .current_dir(&dir);
        if let Some(extra) = &workflow.extra_args {
            cmd = cmd.arg(extra);
        }
        log::info!("Selection pipeline for population {}", name);
        runner.run(&cmd)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        runner::testing::{RecordingRunner, args_of},
        stages::tests::{workflow, emulate},
    };

    #[test]
    fn pipeline_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let mut wf = workflow(dir.path());
        let subsets = vec![("CEU".to_owned(), dir.path().join("CEU.vcf")),
            ("YRI".to_owned(), dir.path().join("YRI.vcf"))];
        let mut runner = RecordingRunner::new(emulate);
        run(&wf, &subsets, &mut runner).unwrap();
        assert_eq!(runner.cmds.len(), 2);
        let ceu_vcf = dir.path().join("CEU.vcf").to_string_lossy().into_owned();
        assert_eq!(args_of(&runner.cmds[0]), ["-c", "22", "-i", ceu_vcf.as_str(), "-o", "CEU", "--population", "CEU",
            "--config-file", "/data/pipeline.cfg"]);
        assert_eq!(runner.cmds[1].get_dir().unwrap(), dir.path().join("YRI"));
        assert!(dir.path().join("CEU").is_dir());
        assert!(dir.path().join("YRI").is_dir());

        wf.extra_args = Some("--cores 4 --no-ihs".to_owned());
        let mut runner = RecordingRunner::new(emulate);
        run(&wf, &subsets[..1], &mut runner).unwrap();
        let args = args_of(&runner.cmds[0]);
        assert_eq!(args.len(), 11);
        assert_eq!(args[10], "--cores 4 --no-ihs");
    }
}
