use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::endpoints::DEFAULT_BASE_URL;
use crate::error::{Error, Result};

const RC_KEYS: [&str; 4] = ["url", "client_id", "client_secret", "verify"];

#[derive(Debug, Default, PartialEq, Eq)]
struct RcConfig {
    url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    verify: Option<bool>,
}

pub(crate) fn load_config(
    url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| std::env::var("ACTIVPIK_URL").ok());
    let mut client_id = client_id.or_else(|| std::env::var("ACTIVPIK_CLIENT_ID").ok());
    let mut client_secret = client_secret.or_else(|| std::env::var("ACTIVPIK_CLIENT_SECRET").ok());

    let rc_candidates = rc_candidates();
    let mut file_verify: Option<bool> = None;

    if url.is_none() || client_id.is_none() || client_secret.is_none() || verify.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path)?;

                url = url.or(cfg.url);
                client_id = client_id.or(cfg.client_id);
                client_secret = client_secret.or(cfg.client_secret);
                file_verify = cfg.verify;
                break;
            }
        }
    }

    let client_id = client_id.ok_or_else(|| missing("client_id", "ACTIVPIK_CLIENT_ID", &rc_candidates))?;
    let client_secret = client_secret
        .ok_or_else(|| missing("client_secret", "ACTIVPIK_CLIENT_SECRET", &rc_candidates))?;

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        client_id,
        client_secret,
        verify: verify.or(file_verify).unwrap_or(true),
    })
}

fn missing(key: &str, env: &str, rc_candidates: &[PathBuf]) -> Error {
    if rc_candidates.is_empty() {
        return Error::Config(format!("{} (set {} or create .activpikrc)", key, env));
    }
    Error::Config(format!(
        "{} (set {} or put `{}:` in one of: {})",
        key,
        env,
        key,
        rc_candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // `client_secret:` may sit on its own line with the value on the next one.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !starts_with_key(line) {
                set_value(&mut cfg, pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" | "client_id" | "client_secret" => {
                    if v.is_empty() {
                        pending_key = Some(k);
                    } else {
                        set_value(&mut cfg, k, v);
                    }
                }
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                _ => {}
            }
        }
    }

    cfg
}

// Values such as URLs and secrets may contain `:` themselves.
fn starts_with_key(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(k, _)| RC_KEYS.contains(&k.trim()))
}

fn set_value(cfg: &mut RcConfig, key: &str, value: &str) {
    let value = Some(value.to_string());
    match key {
        "url" => cfg.url = value,
        "client_id" => cfg.client_id = value,
        "client_secret" => cfg.client_secret = value,
        _ => {}
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) ACTIVPIK_RC (explicit)
    // 2) ./.activpikrc
    // 3) ~/.activpikrc
    if let Ok(p) = std::env::var("ACTIVPIK_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".activpikrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".activpikrc"));
    }
    v
}
