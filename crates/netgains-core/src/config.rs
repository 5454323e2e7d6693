use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration for the Net Gains core.
#[derive(Clone, Debug)]
pub struct Config {
    // Supabase backend
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub lookup_timeout: Duration,

    // Deep links
    pub invite_link_hosts: Vec<String>,

    // Per-device storage
    pub widget_store_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let supabase_url = env_str("SUPABASE_URL").unwrap_or_default();
        let supabase_anon_key = env_str("SUPABASE_ANON_KEY").unwrap_or_default();

        if supabase_url.trim().is_empty() {
            return Err(Error::Config(
                "SUPABASE_URL environment variable is required".to_string(),
            ));
        }
        if supabase_anon_key.trim().is_empty() {
            return Err(Error::Config(
                "SUPABASE_ANON_KEY environment variable is required".to_string(),
            ));
        }

        let lookup_timeout = Duration::from_millis(env_u64("LOOKUP_TIMEOUT_MS").unwrap_or(10_000));

        let invite_link_hosts = parse_csv(env_str("INVITE_LINK_HOSTS"))
            .unwrap_or_else(|| vec!["netgains.app".to_string(), "www.netgains.app".to_string()]);

        let widget_store_file = env_path("WIDGET_STORE_FILE").unwrap_or_else(|| {
            home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".netgains/widgets.json")
        });

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            lookup_timeout,
            invite_link_hosts,
            widget_store_file,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn parse_csv(v: Option<String>) -> Option<Vec<String>> {
    let v = v?;
    let out = v
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
