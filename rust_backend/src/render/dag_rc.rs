//! DAGMaker `.rc` rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DagError, DagResult};
use crate::models::Season;
use crate::selection::TimeWindow;

/// Bands with a `TEFF_CUT_<band>` line, in the order DAGMaker expects them.
const TEFF_CUT_BANDS: [&str; 6] = ["g", "i", "r", "Y", "z", "u"];

/// Fixed DAGMaker settings. Only the season and time window vary per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagTemplate {
    pub rnum: u32,
    pub pnum: u32,
    pub eups_version: String,
    pub write_db: String,
    pub rm_mytemp: bool,
    /// Grid job options for the search and template jobs, without the e-mail flag.
    pub jobsub_opts: String,
    /// Operator contact appended to `JOBSUB_OPTS` as `--email-to=`; omitted when empty.
    pub operator_email: String,
    pub jobsub_opts_se: String,
    pub resources: String,
    pub ignore_calib: bool,
    pub dest_cache: String,
    pub search_opts: String,
    pub temp_opts: String,
    pub schema: String,
    pub teff_cut: f64,
    pub skip_incomplete_se: bool,
    pub do_header_check: u32,
}

impl Default for DagTemplate {
    fn default() -> Self {
        Self {
            rnum: 4,
            pnum: 7,
            eups_version: "gw7".to_string(),
            write_db: "on".to_string(),
            rm_mytemp: true,
            jobsub_opts: "--memory=2500MB --disk=70GB --cpu=1 --expected-lifetime=5h".to_string(),
            operator_email: String::new(),
            jobsub_opts_se: "--memory=3600MB --disk=100GB --cpu=1 --expected-lifetime=5h"
                .to_string(),
            resources: "DEDICATED,OPPORTUNISTIC,OFFSITE".to_string(),
            ignore_calib: true,
            dest_cache: "persistent".to_string(),
            search_opts: "-C".to_string(),
            temp_opts: "-C -t".to_string(),
            schema: "gw".to_string(),
            teff_cut: 0.3,
            skip_incomplete_se: false,
            do_header_check: 1,
        }
    }
}

impl DagTemplate {
    fn jobsub_line(&self) -> String {
        if self.operator_email.is_empty() {
            self.jobsub_opts.clone()
        } else {
            format!("{} --email-to={}", self.jobsub_opts, self.operator_email)
        }
    }

    /// Render the rc text. Same inputs always give the same bytes.
    ///
    /// The text starts with an empty line followed by one `KEY=value` line per
    /// setting, each newline-terminated.
    pub fn render(&self, season: Season, window: &TimeWindow) -> String {
        let mut out = String::from("\n");
        let mut line = |key: &str, value: &dyn std::fmt::Display| {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{key}={value}");
        };

        line("RNUM", &self.rnum);
        line("PNUM", &self.pnum);
        line("SEASON", &season);
        line("DIFFIMG_EUPS_VERSION", &self.eups_version);
        line("WRITEDB", &self.write_db);
        line("RM_MYTEMP", &self.rm_mytemp);
        line("JOBSUB_OPTS", &quoted(&self.jobsub_line()));
        line("JOBSUB_OPTS_SE", &quoted(&self.jobsub_opts_se));
        line("RESOURCES", &quoted(&self.resources));
        line("IGNORECALIB", &self.ignore_calib);
        line("DESTCACHE", &self.dest_cache);
        line("SEARCH_OPTS", &quoted(&self.search_opts));
        line("TEMP_OPTS", &quoted(&self.temp_opts));
        line("SCHEMA", &quoted(&self.schema));
        for band in TEFF_CUT_BANDS {
            line(&format!("TEFF_CUT_{band}"), &self.teff_cut);
        }
        // Debug formatting keeps the decimal point on whole-day windows.
        line("TWINDOW", &format!("{:?}", window.padding_window));
        line("MIN_NITE", &window.min_night);
        line("MAX_NITE", &window.max_night);
        line("SKIP_INCOMPLETE_SE", &self.skip_incomplete_se);
        line("DO_HEADER_CHECK", &self.do_header_check);

        out
    }
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// Render and write the rc file, replacing any existing file.
pub fn write_dag_rc(
    path: &Path,
    template: &DagTemplate,
    season: Season,
    window: &TimeWindow,
) -> DagResult<()> {
    fs::write(path, template.render(season, window)).map_err(|e| DagError::write(path, e))
}
