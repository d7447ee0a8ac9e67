use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_LANG: &str = "ja-JP";
pub const DEFAULT_CANVAS_PX: u32 = 128;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 80;
pub const ENV_LANG: &str = "EMOTION_VOICE_LANG";
pub const ENV_EXPORT_DIR: &str = "EMOTION_VOICE_EXPORT_DIR";

/// Language tag handed to the speech recognizer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognitionLang(pub String);

impl RecognitionLang {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyLang);
        }
        Ok(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecognitionLang {
    fn default() -> Self {
        Self(DEFAULT_LANG.to_owned())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroCanvas { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_PX,
            height: DEFAULT_CANVAS_PX,
        }
    }
}

/// Delay inserted between two visualizer draws.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameInterval {
    pub millis: u64,
}

impl FrameInterval {
    pub fn new(millis: u64) -> Result<Self, ConfigError> {
        if millis == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        Ok(Self { millis })
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    pub fn frames_per_second(&self) -> f64 {
        1000.0 / self.millis as f64
    }
}

impl Default for FrameInterval {
    fn default() -> Self {
        Self {
            millis: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub lang: RecognitionLang,
    pub canvas: CanvasSize,
    pub frame_interval: FrameInterval,
    pub export_dir: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("recognition language must not be empty")]
    EmptyLang,
    #[error("canvas must be non-empty, got {width}x{height}")]
    ZeroCanvas { width: u32, height: u32 },
    #[error("frame interval must be > 0 ms")]
    ZeroFrameInterval,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

pub fn resolve_lang(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<RecognitionLang, ConfigError> {
    RecognitionLang::new(resolve_string_with_default(
        cli_value,
        ENV_LANG,
        env,
        DEFAULT_LANG,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_LANG, "en-US");
        let lang = resolve_lang(Some("fr-FR".to_owned()), &env).expect("valid lang");
        assert_eq!(lang.as_str(), "fr-FR");
    }

    #[test]
    fn lang_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_LANG, "en-US");
        let lang = resolve_lang(None, &env).expect("valid lang");
        assert_eq!(lang.as_str(), "en-US");
    }

    #[test]
    fn lang_defaults_to_japanese() {
        let lang = resolve_lang(None, &MapEnv::default()).expect("valid lang");
        assert_eq!(lang, RecognitionLang::default());
        assert_eq!(lang.as_str(), "ja-JP");
    }

    #[test]
    fn blank_lang_is_rejected() {
        let env = MapEnv::default().with_var(ENV_LANG, "   ");
        assert_eq!(resolve_lang(None, &env), Err(ConfigError::EmptyLang));
    }

    #[test]
    fn default_cadence_is_twelve_and_a_half_fps() {
        let interval = FrameInterval::default();
        assert_eq!(interval.duration(), Duration::from_millis(80));
        assert!((interval.frames_per_second() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert_eq!(FrameInterval::new(0), Err(ConfigError::ZeroFrameInterval));
        assert_eq!(
            CanvasSize::new(0, 128),
            Err(ConfigError::ZeroCanvas {
                width: 0,
                height: 128
            })
        );
        assert!(CanvasSize::new(64, 64).is_ok());
    }

    #[test]
    fn optional_string_falls_back_to_env() {
        let env = MapEnv::default().with_var(ENV_EXPORT_DIR, "/tmp/out");
        assert_eq!(
            resolve_optional_string(None, ENV_EXPORT_DIR, &env).as_deref(),
            Some("/tmp/out")
        );
        assert_eq!(
            resolve_optional_string(Some("cli".to_owned()), ENV_EXPORT_DIR, &env).as_deref(),
            Some("cli")
        );
        assert_eq!(
            resolve_optional_string(None, ENV_EXPORT_DIR, &MapEnv::default()),
            None
        );
    }
}
