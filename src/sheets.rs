use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::models::Result;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const OAUTH_SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

/// Range cleared on a full run before matches are appended, mirroring the
/// shared-sheet convention of headers on row 1 and data from row 2.
const CLEAR_RANGE: &str = "A2:Z1000";

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Minimal Google Sheets v4 client over a service-account key. Every method
/// propagates errors; a run that cannot reach its sheet has no fallback, so
/// misconfiguration here is meant to fail loudly.
pub struct SheetsClient {
    http: Client,
    key: ServiceAccountKey,
    sheet_id: String,
}

impl SheetsClient {
    pub fn from_key_file(path: &str, sheet_id: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read service account key {}: {}", path, e))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| format!("malformed service account key {}: {}", path, e))?;
        Ok(Self {
            http: Client::new(),
            key,
            sheet_id: sheet_id.to_string(),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: OAUTH_SCOPES.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };
        let jwt = encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?,
        )?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("token exchange failed: {}", response.status()).into());
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/{}/values/{}{}",
            SHEETS_API,
            self.sheet_id,
            range.replace(' ', "%20"),
            suffix
        )
    }

    /// Create the worksheet if the spreadsheet does not have it yet.
    pub async fn ensure_worksheet(&self, title: &str) -> Result<()> {
        let token = self.access_token().await?;
        let url = format!("{}/{}?fields=sheets.properties", SHEETS_API, self.sheet_id);
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        if !response.status().is_success() {
            return Err(format!("cannot open spreadsheet: {}", response.status()).into());
        }
        let body: serde_json::Value = response.json().await?;
        let exists = body["sheets"]
            .as_array()
            .map(|sheets| {
                sheets
                    .iter()
                    .any(|s| s["properties"]["title"].as_str() == Some(title))
            })
            .unwrap_or(false);
        if exists {
            debug!("Worksheet {:?} already exists", title);
            return Ok(());
        }

        info!("Creating worksheet {:?}", title);
        let url = format!("{}/{}:batchUpdate", SHEETS_API, self.sheet_id);
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": 100, "columnCount": 20 }
                    }
                }
            }]
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("addSheet failed: {}", response.status()).into());
        }
        Ok(())
    }

    /// Clear the data rows (A2:Z1000), leaving the header row alone.
    pub async fn clear_rows(&self, title: &str) -> Result<()> {
        let token = self.access_token().await?;
        let range = format!("'{}'!{}", title, CLEAR_RANGE);
        let url = self.values_url(&range, ":clear");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("clear failed: {}", response.status()).into());
        }
        info!("Cleared worksheet {:?} rows 2-1000", title);
        Ok(())
    }

    /// Overwrite the data block starting at A2 with the full deduped run.
    pub async fn update_rows(&self, title: &str, rows: &[Vec<String>]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let token = self.access_token().await?;
        let range = format!("'{}'!A2", title);
        let url = self.values_url(&range, "?valueInputOption=RAW");
        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("update failed: {}", response.status()).into());
        }
        info!("Uploaded {} rows to worksheet {:?}", rows.len(), title);
        Ok(())
    }

    /// Append one row after the current data, used for per-match mirroring
    /// while the crawl is still running.
    pub async fn append_row(&self, title: &str, row: &[String]) -> Result<()> {
        let token = self.access_token().await?;
        let range = format!("'{}'!A1", title);
        let url = self.values_url(
            &range,
            ":append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("append failed: {}", response.status()).into());
        }
        Ok(())
    }
}
