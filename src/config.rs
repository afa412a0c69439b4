use std::env;
use std::fs;
use std::time::Duration;

use crate::clients::web_api_client::DEFAULT_FEED_URL;
use crate::service::loading_gate::DEFAULT_BUSY_HOLD;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub feed_url: String,
    pub busy_hold: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            busy_hold: DEFAULT_BUSY_HOLD,
        }
    }
}

impl SchedulerConfig {
    /// Reads a KEY=VALUE file. Blank lines and `#` comments are skipped,
    /// `export ` prefixes and surrounding quotes are tolerated, unknown
    /// keys are ignored.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut config = Self::default();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            config.apply(key.trim(), unquote(value.trim()))?;
        }
        Ok(config)
    }

    /// Layered lookup: file (when given), then environment variables on
    /// top.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(url) = env::var("FEED_URL") {
            config.apply("FEED_URL", &url)?;
        }
        if let Ok(hold) = env::var("BUSY_HOLD_MS") {
            config.apply("BUSY_HOLD_MS", &hold)?;
        }
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "FEED_URL" => self.feed_url = value.to_string(),
            "BUSY_HOLD_MS" => {
                let millis: u64 = value
                    .parse()
                    .map_err(|_| format!("BUSY_HOLD_MS must be a number, got {}", value))?;
                self.busy_hold = Duration::from_millis(millis);
            }
            _ => {}
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
        || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("schedulerCache_{}", name));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_point_at_demo_feed() {
        let config = SchedulerConfig::default();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.busy_hold, Duration::from_millis(5000));
    }

    #[test]
    fn parses_file_with_comments_and_quotes() {
        let path = write_config(
            "full.conf",
            "# scheduler settings\n\
             export FEED_URL=\"http://localhost:9000/appointments\"\n\
             BUSY_HOLD_MS='250'\n\
             \n\
             UNRELATED=ignored\n",
        );
        let config = SchedulerConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.feed_url, "http://localhost:9000/appointments");
        assert_eq!(config.busy_hold, Duration::from_millis(250));
    }

    #[test]
    fn environment_overrides_file_values() {
        let path = write_config("layered.conf", "FEED_URL=http://file.example/feed\n");
        unsafe {
            env::set_var("FEED_URL", "http://env.example/feed");
        }
        let config = SchedulerConfig::load(path.to_str()).unwrap();
        unsafe {
            env::remove_var("FEED_URL");
        }
        assert_eq!(config.feed_url, "http://env.example/feed");
    }

    #[test]
    fn rejects_lines_without_separator() {
        let path = write_config("broken.conf", "FEED_URL\n");
        let err = SchedulerConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.contains("Invalid config line 1"));
    }

    #[test]
    fn rejects_non_numeric_hold() {
        let path = write_config("hold.conf", "BUSY_HOLD_MS=soon\n");
        let err = SchedulerConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.contains("BUSY_HOLD_MS"));
    }
}
