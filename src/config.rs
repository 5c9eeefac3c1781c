use crate::error::{HoseMatchError, Result};
use hose_match_common::{MatchConfig, ProductKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hose_threshold: f64,
    pub fitting_threshold: f64,
    pub allow_many_to_one: bool,
    pub parallel: bool,
    /// 組み込み以外に認識させるモデル名
    pub extra_model_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hose_threshold: MatchConfig::for_kind(ProductKind::Hose).threshold,
            fitting_threshold: MatchConfig::for_kind(ProductKind::Fitting).threshold,
            allow_many_to_one: true,
            parallel: false,
            extra_model_names: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| HoseMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("hose-match").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        check_threshold("hose_threshold", self.hose_threshold)?;
        check_threshold("fitting_threshold", self.fitting_threshold)
    }

    pub fn threshold(&self, kind: ProductKind) -> f64 {
        match kind {
            ProductKind::Hose => self.hose_threshold,
            ProductKind::Fitting => self.fitting_threshold,
        }
    }

    pub fn set_threshold(&mut self, kind: ProductKind, value: f64) -> Result<()> {
        match kind {
            ProductKind::Hose => self.hose_threshold = value,
            ProductKind::Fitting => self.fitting_threshold = value,
        }
        self.validate()
    }

    /// モデル名を追加（大文字で保持、重複は無視）
    pub fn add_model_name(&mut self, name: &str) -> bool {
        let name = name.trim().to_uppercase();
        if name.is_empty() || self.extra_model_names.contains(&name) {
            return false;
        }
        self.extra_model_names.push(name);
        true
    }

    /// 照合設定を作成（CLI指定で上書き）
    pub fn match_config(
        &self,
        kind: ProductKind,
        threshold: Option<f64>,
        exclusive: bool,
        parallel: bool,
    ) -> Result<MatchConfig> {
        let threshold = match threshold {
            Some(value) => {
                check_threshold("threshold", value)?;
                value
            }
            None => self.threshold(kind),
        };
        Ok(MatchConfig {
            threshold,
            allow_many_to_one: self.allow_many_to_one && !exclusive,
            parallel: self.parallel || parallel,
        })
    }
}

/// しきい値は 0〜100（NaN は範囲外）
fn check_threshold(name: &str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(HoseMatchError::Config(format!(
            "{} は 0〜100 の範囲で指定してください: {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.threshold(ProductKind::Hose), 30.0);
        assert_eq!(config.threshold(ProductKind::Fitting), 60.0);
        assert!(config.allow_many_to_one);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"parallel": true}"#).unwrap();
        assert!(config.parallel);
        assert_eq!(config.hose_threshold, 30.0);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = Config::default();
        assert!(config.set_threshold(ProductKind::Hose, 120.0).is_err());
        assert!(config.set_threshold(ProductKind::Fitting, 75.0).is_ok());
        assert_eq!(config.fitting_threshold, 75.0);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default();
        let mc = config.match_config(ProductKind::Hose, Some(45.0), true, true).unwrap();
        assert_eq!(mc.threshold, 45.0);
        assert!(!mc.allow_many_to_one);
        assert!(mc.parallel);

        let mc = config.match_config(ProductKind::Fitting, None, false, false).unwrap();
        assert_eq!(mc.threshold, 60.0);
        assert!(mc.allow_many_to_one);
    }

    #[test]
    fn test_cli_threshold_validated() {
        let config = Config::default();
        for bad in [f64::NAN, -1.0, 100.5] {
            let err = config.match_config(ProductKind::Hose, Some(bad), false, false).unwrap_err();
            assert!(matches!(err, HoseMatchError::Config(_)));
        }
        assert!(config.match_config(ProductKind::Hose, Some(100.0), false, false).is_ok());
    }

    #[test]
    fn test_add_model_name() {
        let mut config = Config::default();
        assert!(config.add_model_name(" hydromax "));
        assert!(!config.add_model_name("HYDROMAX"));
        assert_eq!(config.extra_model_names, vec!["HYDROMAX".to_string()]);
    }
}
