use std::{net::SocketAddr, str::FromStr};

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub bind_addr: SocketAddr,
	/// Cars per catalogue page.
	pub page_size: usize,
	pub session_ttl_hours: i64,
	pub session_cookie: String,
	pub secure_cookies: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
			page_size: 6,
			session_ttl_hours: 24,
			session_cookie: "sid".to_string(),
			secure_cookies: false,
		}
	}
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	match lookup(key) {
		Some(raw) => raw.trim().parse().with_context(|| format!("parse {}={:?}", key, raw)),
		None => Ok(default),
	}
}

impl Config {
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let defaults = Config::default();
		let config = Config {
			bind_addr: parse_var(&lookup, "BIND_ADDR", defaults.bind_addr)?,
			page_size: parse_var(&lookup, "PAGE_SIZE", defaults.page_size)?,
			session_ttl_hours: parse_var(&lookup, "SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
			session_cookie: lookup("SESSION_COOKIE")
				.filter(|c| !c.trim().is_empty())
				.unwrap_or(defaults.session_cookie),
			secure_cookies: parse_var(&lookup, "SECURE_COOKIES", defaults.secure_cookies)?,
		};
		if config.page_size == 0 {
			bail!("PAGE_SIZE must be at least 1");
		}
		if config.session_ttl_hours < 1 {
			bail!("SESSION_TTL_HOURS must be at least 1");
		}
		Ok(config)
	}

	pub fn session_ttl(&self) -> time::Duration {
		time::Duration::hours(self.session_ttl_hours)
	}
}
