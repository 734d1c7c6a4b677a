use crate::peer::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    /// `total` or `perPupil`
    #[serde(rename = "displayUnits")]
    pub display_units: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PeerConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "dataSource")]
    pub data_source: FileSource,
    #[serde(rename = "coverageSource")]
    pub coverage_source: Option<FileSource>,
    /// The display name of the district to report on.
    pub district: Option<String>,
    /// The RCDTS code of the district. Takes precedence over the name.
    #[serde(rename = "districtId")]
    pub district_id: Option<String>,
}

pub fn read_config(path: &str) -> PeerResult<PeerConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: PeerConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> PeerResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: PeerConfig =
            serde_json::from_str(r#"{"dataSource": {"filePath": "app_data_wide.csv"}}"#).unwrap();
        assert_eq!(config.data_source.file_path, "app_data_wide.csv");
        assert_eq!(config.data_source.provider, None);
        assert_eq!(config.output_settings, None);
        assert_eq!(config.coverage_source, None);
        assert_eq!(config.district, None);
    }

    #[test]
    fn parses_full_config() {
        let config: PeerConfig = serde_json::from_str(
            r#"{
                "outputSettings": {"reportName": "r", "outputFile": "out.json", "displayUnits": "perPupil"},
                "dataSource": {"provider": "xlsx", "filePath": "d.xlsx", "excelWorksheetName": "Sheet1"},
                "coverageSource": {"provider": "csv", "filePath": "c.csv"},
                "districtId": "010010010260000"
            }"#,
        )
        .unwrap();
        let os = config.output_settings.unwrap();
        assert_eq!(os.display_units.as_deref(), Some("perPupil"));
        assert_eq!(os.output_file.as_deref(), Some("out.json"));
        assert_eq!(
            config.data_source.excel_worksheet_name.as_deref(),
            Some("Sheet1")
        );
        assert_eq!(config.district_id.as_deref(), Some("010010010260000"));
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            read_config("/nonexistent/peer_config.json"),
            Err(PeerError::OpeningFile { .. })
        ));
    }
}
