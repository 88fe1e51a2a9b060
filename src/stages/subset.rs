//! Splitting the joint VCF file into one VCF file per population with `vcf-subset`.

use std::path::PathBuf;
use crate::{
    Error,
    pop::Populations,
    runner::{Cmd, Runner},
};
use super::Workflow;

pub(crate) const TOOL: &str = "vcf_subset";

/// Creates `<output>/<population>.vcf` for each population.
/// Returns pairs (population name, output VCF) in the population order.
pub fn run(workflow: &Workflow, pops: &Populations, runner: &mut impl Runner)
    -> Result<Vec<(String, PathBuf)>, Error>
{
    let mut subsets = Vec::with_capacity(pops.len());
    for (name, members) in pops.iter() {
        let vcf_output = workflow.output.join(format!("{}.vcf", name));
        log::info!("Extracting {} samples of population {}", members.len(), name);
        let cmd = Cmd::new(TOOL, &workflow.tools.vcf_subset)
            .args(["-f", "-c"])
            .arg(members.join(","))
            .arg(&workflow.vcf)
            .current_dir(&workflow.output)
            .stdout_to(&vcf_output);
        runner.run(&cmd)?;
        subsets.push((name.to_owned(), vcf_output));
    }
    Ok(subsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        runner::testing::{RecordingRunner, args_of},
        stages::tests::{workflow, populations, emulate},
    };

    #[test]
    fn sample_lists() {
        let dir = tempfile::tempdir().unwrap();
        let wf = workflow(dir.path());
        let pops = populations(&[("popB", &["s9", "s3"]), ("popA", &["s2", "s1", "s10"])]);
        let mut runner = RecordingRunner::new(emulate);
        let subsets = run(&wf, &pops, &mut runner).unwrap();

        assert_eq!(subsets, [("popA".to_owned(), dir.path().join("popA.vcf")),
            ("popB".to_owned(), dir.path().join("popB.vcf"))]);
        assert_eq!(args_of(&runner.cmds[0]), ["-f", "-c", "s2,s1,s10", "/data/joint.vcf"]);
        assert_eq!(args_of(&runner.cmds[1]), ["-f", "-c", "s9,s3", "/data/joint.vcf"]);
        for (cmd, (_, vcf)) in runner.cmds.iter().zip(&subsets) {
            assert_eq!(cmd.get_stdout().unwrap(), vcf);
        }
    }
}
