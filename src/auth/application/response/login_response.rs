use serde::Deserialize;

/// Body of `POST /access/ticket`. Some PVE releases answer a rejected login
/// with `200` and `"data": null`, hence the `Option`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub data: Option<LoginTicket>,
}

#[derive(Debug, Deserialize)]
pub struct LoginTicket {
    pub ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    pub csrf_token: String,
    #[serde(default)]
    pub username: Option<String>,
}
