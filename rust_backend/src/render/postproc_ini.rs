//! Post-processing `.ini` generation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DagError, DagResult};
use crate::models::Season;

/// Per-run values for the post-processing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PostprocIni {
    pub season: Season,
    pub propid: String,
    pub trigger_mjd: f64,
    pub exposures_listfile: String,
    pub bands: String,
}

type Section = (&'static str, Vec<(&'static str, String)>);

fn fixed(pairs: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

impl PostprocIni {
    /// File name the post-processing stage looks for.
    pub fn file_name(&self) -> String {
        format!("postproc_{}.ini", self.season)
    }

    fn sections(&self) -> Vec<Section> {
        vec![
            (
                "general",
                vec![
                    ("season", self.season.to_string()),
                    ("propid", self.propid.clone()),
                    ("triggermjd", format!("{:?}", self.trigger_mjd)),
                    ("ups", "False".to_string()),
                    ("env_setup_file", "./diffimg_setup.sh".to_string()),
                    ("rootdir", "/pnfs/des/persistent/gw".to_string()),
                    ("outdir", "/fake/outdir".to_string()),
                    ("indir", "./".to_string()),
                    ("db", "destest".to_string()),
                    ("schema", "marcelle".to_string()),
                    ("exposures_listfile", self.exposures_listfile.clone()),
                    ("bands", self.bands.clone()),
                    ("GoodSNIDs", "/this/file/does/not/exist".to_string()),
                ],
            ),
            ("plots", fixed(&[("mlscore_cut", "0.7")])),
            (
                "masterlist",
                fixed(&[
                    ("blacklist", "blacklist.txt"),
                    ("filename_1", "MasterExposureList_prelim.fits"),
                    ("filename_2", "MasterExposureList.fits"),
                ]),
            ),
            (
                "checkoutputs",
                fixed(&[
                    ("logfile", "checkoutputs.log"),
                    ("ccdfile", "checkoutputs.csv"),
                    ("goodfile", "goodchecked.list"),
                    ("steplist", "steplist.txt"),
                ]),
            ),
            (
                "GWFORCE",
                fixed(&[("numepochs_min", "0"), ("ncore", "8"), ("writeDB", "True")]),
            ),
            ("HOSTMATCH", fixed(&[("version", "v1.0.1")])),
            (
                "truthtable",
                fixed(&[("filename", "fakes_truth.tab"), ("plusname", "truthplus.tab")]),
            ),
            (
                "GWmakeDataFiles",
                fixed(&[
                    ("format", "snana"),
                    ("numepochs_min", "0"),
                    ("2nite_trigger", "null"),
                ]),
            ),
            (
                "GWmakeDataFiles-real",
                fixed(&[
                    ("outFile_stdout", "makeDataFiles_real.stdout"),
                    ("outDir_data", "LightCurvesReal"),
                    ("combined_fits", "datafiles_combined.fits"),
                ]),
            ),
            (
                "GWmakeDataFiles-fake",
                fixed(&[
                    ("outFile_stdout", "makeDataFiles_fake.stdout"),
                    ("outDir_data", "LightCurvesFake"),
                    ("version", "KBOMAG20ALLSKY"),
                ]),
            ),
        ]
    }

    /// Render as `[section]` headers with `key = value` lines, a blank line
    /// closing every section. Keys keep their case.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        for (name, entries) in self.sections() {
            let _ = writeln!(out, "[{name}]");
            for (key, value) in entries {
                let _ = writeln!(out, "{key} = {value}");
            }
            out.push('\n');
        }
        out
    }

    /// Write `postproc_<season>.ini` into `dir` and return its path.
    pub fn write_to_dir(&self, dir: &Path) -> DagResult<PathBuf> {
        let path = dir.join(self.file_name());
        fs::write(&path, self.render()).map_err(|e| DagError::write(&path, e))?;
        Ok(path)
    }
}
