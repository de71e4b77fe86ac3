use std::path::PathBuf;

use folio_core::upload::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::admin::AdminAccount;
use crate::auth::jwt::JwtConfig;

/// Where uploaded images end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// Hosted image service accepting an unsigned multipart upload.
    Remote { url: String, preset: String },
    /// Local directory served back under `public_base_url`.
    Local { dir: PathBuf, public_base_url: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the admin account and JWT secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// The single administrator allowed to manage the catalog.
    pub admin: AdminAccount,
    /// Postgres URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub upload: UploadTarget,
    /// Largest accepted image in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Hosted form endpoint used when SMTP is not configured.
    pub contact_form_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `DATABASE_URL`           | unset (in-memory store) |
    /// | `UPLOAD_URL`             | unset (local uploads)   |
    /// | `UPLOAD_PRESET`          | required with URL       |
    /// | `UPLOAD_DIR`             | `./uploads`             |
    /// | `UPLOAD_PUBLIC_BASE_URL` | `/uploads`              |
    /// | `MAX_UPLOAD_BYTES`       | `10485760`              |
    /// | `CONTACT_FORM_URL`       | unset                   |
    ///
    /// JWT and admin variables are documented on [`JwtConfig::from_env`] and
    /// [`AdminAccount::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let upload = match std::env::var("UPLOAD_URL").ok().filter(|u| !u.is_empty()) {
            Some(url) => UploadTarget::Remote {
                url,
                preset: std::env::var("UPLOAD_PRESET")
                    .expect("UPLOAD_PRESET must be set when UPLOAD_URL is set"),
            },
            None => UploadTarget::Local {
                dir: std::env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| "./uploads".into())
                    .into(),
                public_base_url: std::env::var("UPLOAD_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "/uploads".into()),
            },
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            admin: AdminAccount::from_env(),
            database_url: std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            upload,
            max_upload_bytes,
            contact_form_url: std::env::var("CONTACT_FORM_URL")
                .ok()
                .filter(|u| !u.is_empty()),
        }
    }
}
