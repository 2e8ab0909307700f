use std::{fs, io, path::Path};

use tracing::info;

use crate::extract::PluginVersionInfo;

/// Write the collected records to `path` as pretty-printed JSON.
///
/// Parent directories are created as needed. The file is only ever written,
/// never read back.
pub fn write_summary(path: &Path, records: &[PluginVersionInfo]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(records)?;
    fs::write(path, data)?;
    info!(path = %path.display(), count = records.len(), "wrote version summary");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn writes_records_as_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("output_summary.json");
        let records = vec![PluginVersionInfo::new(
            "日本語プラグイン",
            "jp/plugin",
            "2.0.0",
            "2025-03-10T05:31:12Z",
            7,
            "https://marketplace.dify.ai/plugins/jp/plugin",
        )];

        write_summary(&path, &records).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("日本語プラグイン"));
        let back: Vec<PluginVersionInfo> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, records);
    }
}
