//! Pairwise Weir & Cockerham FST in sliding windows, calculated by `vcftools`.

use std::{
    fs::{self, File},
    io::{Write, BufWriter},
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::add_path,
    ext::{self, sys::TempFiles},
    pop::Populations,
    runner::{Cmd, Runner},
};
use super::Workflow;

pub(crate) const TOOL: &str = "fst_calculation";
/// Subdirectory of the output directory.
pub(crate) const DIR: &str = "fst";
/// Members of the first population in a pair.
pub(crate) const FIRST_POP: &str = "first_pop.tmp";
/// Members of the second population in a pair.
pub(crate) const SECOND_POP: &str = "second_pop.tmp";
/// `vcftools` always writes windowed FST to this file.
pub(crate) const VCFTOOLS_OUTPUT: &str = "out.windowed.weir.fst";

/// Writes population members, one per line, truncating the file.
fn write_members(filename: &Path, members: &[String]) -> Result<(), Error> {
    let mut f = BufWriter::new(File::create(filename).map_err(add_path!(filename))?);
    for member in members {
        writeln!(f, "{}", member).map_err(add_path!(filename))?;
    }
    f.flush().map_err(add_path!(filename))
}

/// Name of the FST output for a pair of populations.
pub fn output_name(chrom: &str, pop1: &str, pop2: &str) -> String {
    format!("{}{}{}.fst", chrom, pop1, pop2)
}

/// Runs `vcftools` for each unordered pair of populations, and returns the renamed output files.
pub fn run(workflow: &Workflow, pops: &Populations, runner: &mut impl Runner) -> Result<Vec<PathBuf>, Error> {
    let dir = workflow.output.join(DIR);
    ext::sys::mkdir(&dir)?;
    let tmp_files = TempFiles::new(vec![dir.join(FIRST_POP), dir.join(SECOND_POP)]);
    let vcftools_output = dir.join(VCFTOOLS_OUTPUT);

    let window_size = workflow.fst_window_size.to_string();
    let window_step = workflow.fst_window_step.to_string();
    let mut outputs = Vec::new();
    for (i, (pop1, members1)) in pops.iter().enumerate() {
        if i + 1 == pops.len() {
            break;
        }
        write_members(tmp_files.get(0), members1)?;
        let cmd = Cmd::new(TOOL, &workflow.tools.vcftools)
            .args(["--fst-window-size", window_size.as_str(), "--fst-window-step", window_step.as_str(),
                "--weir-fst-pop", FIRST_POP])
            .arg("--vcf").arg(&workflow.vcf)
            .args(["--weir-fst-pop", SECOND_POP])
            .current_dir(&dir);

        for (pop2, members2) in pops.iter().skip(i + 1) {
            write_members(tmp_files.get(1), members2)?;
            log::info!("FST between {} and {}", pop1, pop2);
            runner.run(&cmd)?;
            let output = dir.join(output_name(&workflow.chrom, pop1, pop2));
            fs::rename(&vcftools_output, &output).map_err(add_path!(vcftools_output, output))?;
            outputs.push(output);
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        runner::testing::{RecordingRunner, args_of},
        stages::tests::{workflow, populations, emulate},
    };

    #[test]
    fn all_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let wf = workflow(dir.path());
        let pops = populations(&[("YRI", &["y1", "y2"]), ("CEU", &["c1"]), ("CHB", &["h1", "h2", "h3"]),
            ("JPT", &["j1"])]);
        let mut runner = RecordingRunner::new(emulate);
        let outputs = run(&wf, &pops, &mut runner).unwrap();

        assert_eq!(runner.cmds.len(), 6);
        let fst_dir = dir.path().join(DIR);
        let names: Vec<_> = outputs.iter().map(|path| path.strip_prefix(&fst_dir).unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["22CEUCHB.fst", "22CEUJPT.fst", "22CEUYRI.fst", "22CHBJPT.fst", "22CHBYRI.fst",
            "22JPTYRI.fst"]);
        for path in outputs.iter() {
            assert!(path.is_file());
        }
        // Pair files are overwritten, not appended.
        assert_eq!(fs::read_to_string(fst_dir.join("22CEUYRI.fst")).unwrap(), "c1\n|y1\ny2\n");
        assert_eq!(fs::read_to_string(fst_dir.join("22CHBJPT.fst")).unwrap(), "h1\nh2\nh3\n|j1\n");
        assert_eq!(fs::read_to_string(fst_dir.join("22JPTYRI.fst")).unwrap(), "j1\n|y1\ny2\n");

        // Temporary files are removed once the stage is finished.
        assert!(!fst_dir.join(FIRST_POP).exists());
        assert!(!fst_dir.join(SECOND_POP).exists());
        assert!(!fst_dir.join(VCFTOOLS_OUTPUT).exists());
    }

    #[test]
    fn vcftools_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let mut wf = workflow(dir.path());
        wf.fst_window_size = 5000;
        wf.fst_window_step = 2500;
        let pops = populations(&[("a", &["s1"]), ("b", &["s2"])]);
        let mut runner = RecordingRunner::new(emulate);
        run(&wf, &pops, &mut runner).unwrap();

        let cmd = &runner.cmds[0];
        assert_eq!(cmd.program(), Path::new("/bin/vcftools"));
        assert_eq!(cmd.get_dir().unwrap(), dir.path().join(DIR));
        assert_eq!(args_of(cmd), ["--fst-window-size", "5000", "--fst-window-step", "2500",
            "--weir-fst-pop", "first_pop.tmp", "--vcf", "/data/joint.vcf", "--weir-fst-pop", "second_pop.tmp"]);
    }

    #[test]
    fn single_population() {
        let dir = tempfile::tempdir().unwrap();
        let wf = workflow(dir.path());
        let pops = populations(&[("a", &["s1"])]);
        let mut runner = RecordingRunner::new(emulate);
        assert!(run(&wf, &pops, &mut runner).unwrap().is_empty());
        assert!(runner.cmds.is_empty());
        assert!(dir.path().join(DIR).is_dir());
    }

    #[test]
    fn cleanup_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let wf = workflow(dir.path());
        let pops = populations(&[("a", &["s1"]), ("b", &["s2"])]);
        let mut runner = RecordingRunner::new(|cmd: &Cmd| Err(Error::Launch(cmd.tool(), cmd.to_string(),
            std::io::Error::from(std::io::ErrorKind::NotFound))));
        assert!(run(&wf, &pops, &mut runner).is_err());
        assert!(!dir.path().join(DIR).join(FIRST_POP).exists());
        assert!(!dir.path().join(DIR).join(SECOND_POP).exists());
    }
}
