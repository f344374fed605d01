// ============================================
// src/settings.rs
// 設定ファイルの構造と読み込みロジック
// ============================================

use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use crate::catalog::SignTypes;
use crate::error::Result;
use crate::quiz::ChoiceCount;
use crate::signs::SIGN_TYPES;

const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "roadsign-quiz.log";

/// 起動時の設定 (読み込み専用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `<dir>/<種類>/<標識>.gif` のフォルダ。無ければ組み込みの標識を使う
    pub asset_dir: Option<PathBuf>,
    pub choices: ChoiceCount,
    /// 標識の種類の一覧
    pub sign_types: Vec<String>,
    /// 最初から無効にしておく種類
    pub disabled_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: None,
            choices: ChoiceCount::default(),
            sign_types: SIGN_TYPES.iter().map(|s| s.to_string()).collect(),
            disabled_types: Vec::new(),
        }
    }
}

impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("jp", "Fukumoto0141", "ROADSIGN_QUIZ")
    }

    // MARK:設定ファイルのパス
    pub fn default_path() -> PathBuf {
        match Self::project_dirs() {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
            None => PathBuf::from(SETTINGS_FILE),
        }
    }

    // MARK:ログファイルのパス (データ用ディレクトリが無ければ作る)
    pub fn default_log_path() -> io::Result<PathBuf> {
        if let Some(dirs) = Self::project_dirs() {
            let data_dir = dirs.data_dir();
            if !data_dir.exists() {
                fs::create_dir_all(data_dir)?;
            }
            return Ok(data_dir.join(LOG_FILE));
        }
        Ok(PathBuf::from(LOG_FILE))
    }

    /// ファイルから読む。失敗はそのまま返す
    pub fn load_from(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// ファイルが無い・壊れている場合はデフォルト
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                info!("settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// 有効/無効を反映した種類の一覧
    pub fn sign_types(&self) -> SignTypes {
        let mut types = SignTypes::new(self.sign_types.iter().cloned());
        for name in &self.disabled_types {
            if !types.set_enabled(name, false) {
                warn!("unknown sign type '{name}' in disabled_types");
            }
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sign_types().enabled().count(), SIGN_TYPES.len());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "choices": 9, "disabled_types": ["School", "Nope"] }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.choices, ChoiceCount::Nine);
        assert_eq!(settings.asset_dir, None);

        let types = settings.sign_types();
        assert!(!types.is_enabled("School"));
        assert!(types.is_enabled("Warning"));
        assert_eq!(types.len(), SIGN_TYPES.len());
    }

    #[test]
    fn bad_choice_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "choices": 4 }"#).unwrap();

        assert!(Settings::load_from(&path).is_err());
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn custom_sign_types_and_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            r#"{ "asset_dir": "/opt/signs", "sign_types": ["Warning", "Work Zone"] }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.asset_dir, Some(PathBuf::from("/opt/signs")));
        let types = settings.sign_types();
        let names: Vec<&str> = types.enabled().collect();
        assert_eq!(names, ["Warning", "Work Zone"]);
    }
}
