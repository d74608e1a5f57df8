//! Text artifacts consumed by the downstream pipeline: the DAGMaker rc file,
//! exposure manifests and the post-processing `.ini`.

pub mod dag_rc;
pub mod manifest;
pub mod postproc_ini;

pub use dag_rc::{write_dag_rc, DagTemplate};
pub use manifest::{write_annotated_table, write_exposure_info, write_search_list, ExposureInfoRow};
pub use postproc_ini::PostprocIni;
