#[cfg(test)]
mod tests {
    use crate::db::repository::CatalogError;
    use crate::io::loaders::{parse_id_list, read_id_list, ExposureTableLoader};
    use crate::models::{Band, Night};
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    const CSV_HEADER: &str = "EXPNUM,NITE,MJD,RA,DEC,BAND,EXPTIME,PROPID,OBSTYPE,OBJECT,TEFF";

    /// Helper to create a temp file with the given suffix
    fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut temp_file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_load_csv_basic() {
        let content = format!(
            "{}\n1001,20230101,59945.1,60.1,-30.2,i,90,2023A-0001,object,GW1,0.45\n\
             1002,20230102,59946.1,60.2,-30.1,Y,45,2023A-0001,object,GW1,0.20\n",
            CSV_HEADER
        );
        let file = create_temp_file(".csv", &content);

        let records = ExposureTableLoader::load_from_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].exposure_id, 1001);
        assert_eq!(records[0].night, Night::new(20230101));
        assert_eq!(records[1].band, Band::Y);
        assert!(!records[1].is_search);
    }

    #[test]
    fn test_load_csv_with_search_column() {
        let content = format!(
            "{},SEARCH\n1001,20230101,59945.1,60.1,-30.2,g,90,,object,,0.45,true\n",
            CSV_HEADER
        );
        let file = create_temp_file(".csv", &content);

        let records = ExposureTableLoader::load_from_csv(file.path()).unwrap();
        assert!(records[0].is_search);
        assert!(records[0].propid.is_empty());
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let content = "EXPNUM,NITE,MJD,RA,DEC,BAND,EXPTIME\n1001,20230101,59945.1,60.1,-30.2,g,90\n";
        let file = create_temp_file(".csv", content);

        let result = ExposureTableLoader::load_from_csv(file.path());
        assert!(matches!(result, Err(CatalogError::SchemaError(_))));
    }

    #[test]
    fn test_unlisted_band_loads_as_other() {
        let content = format!(
            "{}\n1001,20230101,59945.1,60.1,-30.2,i,90,,object,,0.45\n\
             1002,20230101,59945.2,60.1,-30.2,N964,90,,object,,0.45\n",
            CSV_HEADER
        );
        let file = create_temp_file(".csv", &content);

        let records = ExposureTableLoader::load_from_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].band, Band::I);
        assert_eq!(records[1].band, Band::Other("N964".to_string()));
    }

    #[test]
    fn test_empty_band_is_schema_error() {
        let content = format!(
            "{}\n1001,20230101,59945.1,60.1,-30.2,,90,,object,,0.45\n",
            CSV_HEADER
        );
        let file = create_temp_file(".csv", &content);

        let result = ExposureTableLoader::load_from_csv(file.path());
        assert!(matches!(result, Err(CatalogError::SchemaError(msg)) if msg.contains("1001")));
    }

    #[test]
    fn test_load_tab_dump() {
        let content = "\
# sample exposures
668439 20170817 57983.4 197.45 -23.38 i 90 2017B-0110 DESGW:_GW170817 0.62 ok True
668440 20170817 57983.41 197.45 -23.38 z 90 2017B-0110 DESGW:_GW170817 0.55 ok False

668500 20170818 57984.4 197.45 -23.38 i 90 2017B-0110 DESGW:_GW170817 0.71 ok True
";
        let file = create_temp_file(".tab", content);

        let records = ExposureTableLoader::load_from_file(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].object, "DESGW:_GW170817");
        assert!(records[0].is_search);
        assert!(!records[1].is_search);
        assert_eq!(records[2].night, Night::new(20170818));
    }

    #[test]
    fn test_tab_wrong_column_count() {
        let result = ExposureTableLoader::parse_tab("668439 20170817 57983.4\n");
        assert!(matches!(result, Err(CatalogError::SchemaError(msg)) if msg.contains("line 1")));
    }

    #[test]
    fn test_tab_invalid_number() {
        let line = "668439 2017-08-17 57983.4 197.45 -23.38 i 90 2017B-0110 obj 0.62 ok True\n";
        let result = ExposureTableLoader::parse_tab(line);
        assert!(matches!(result, Err(CatalogError::SchemaError(msg)) if msg.contains("NITE")));
    }

    #[test]
    fn test_id_list() {
        assert_eq!(parse_id_list("1001\n\n 1002 \n").unwrap(), vec![1001, 1002]);
        assert!(parse_id_list("1001\nabc\n").is_err());

        let file = create_temp_file(".list", "5\n6\n");
        assert_eq!(read_id_list(file.path()).unwrap(), vec![5, 6]);
    }
}
